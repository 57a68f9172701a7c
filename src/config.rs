//! Command-line and environment configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use clap::builder::FalseyValueParser;
use tracing::debug;

use crate::ai::TranslatorConfig;
use crate::ai::client::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::error::PolicyError;
use crate::security::SafetyPolicy;
use crate::shell::{ExecutionConfig, default_shell};
use crate::shell::executor::DEFAULT_MAX_OUTPUT_BYTES;
use crate::utils::logger::default_log_dir;

/// Load `.env` from the working directory into the process environment.
/// Variables that are already set are left alone; a missing file is not an
/// error.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    load_dotenv_from(Path::new(".env"))
}

fn load_dotenv_from(path: &Path) -> Result<(), dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "rusty-cmd", version, about = "Natural-language shell commands with a safety gate")]
pub struct Config {
    /// API key for the OpenAI-compatible service
    #[arg(long, env = "AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible service [default: https://api.openai.com/v1]
    #[arg(long, env = "AI_API_BASE")]
    pub api_base: Option<String>,

    /// Older name for `--api-base`, still read from `AI_API_URL`
    #[arg(long, env = "AI_API_URL", hide = true)]
    pub api_url: Option<String>,

    /// Model name
    #[arg(long, env = "AI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Translation request timeout in seconds
    #[arg(long, env = "API_TIMEOUT", default_value_t = 30)]
    pub api_timeout: u64,

    /// Command execution timeout in seconds
    #[arg(
        long,
        env = "COMMAND_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub command_timeout: u64,

    /// Deny a confirmation left unanswered for this many seconds
    #[arg(long, env = "CONFIRM_TIMEOUT", value_parser = clap::value_parser!(u64).range(1..))]
    pub confirm_timeout: Option<u64>,

    /// Shell used to run commands [default: $SHELL, else /bin/sh]
    #[arg(long, env = "RUSTY_CMD_SHELL")]
    pub shell: Option<String>,

    /// TOML file with `keywords` and/or `patterns` lists
    #[arg(long, env = "SAFETY_POLICY")]
    pub policy: Option<PathBuf>,

    /// Sensitive keyword; replaces the default keyword list
    #[arg(long = "keyword", env = "SENSITIVE_KEYWORDS", value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Dangerous regex pattern; replaces the default pattern list
    #[arg(long = "pattern")]
    pub patterns: Vec<String>,

    /// Directory for log files [default: logs/ next to the executable]
    #[arg(long, env = "RUSTY_CMD_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,
}

impl Config {
    pub fn translator(&self) -> TranslatorConfig {
        TranslatorConfig {
            api_key: self.api_key.clone(),
            api_base: self
                .api_base
                .clone()
                .or_else(|| self.api_url.clone())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.api_timeout),
        }
    }

    pub fn execution(&self) -> ExecutionConfig {
        ExecutionConfig {
            shell: self
                .shell
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_shell),
            timeout: Duration::from_secs(self.command_timeout),
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }

    pub fn safety_policy(&self) -> Result<SafetyPolicy, PolicyError> {
        SafetyPolicy::resolve(self.policy.as_deref(), &self.keywords, &self.patterns)
    }

    pub fn confirm_timeout(&self) -> Option<Duration> {
        self.confirm_timeout.map(Duration::from_secs)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let argv = std::iter::once("rusty-cmd").chain(args.iter().copied());
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_command_timeout_flag() {
        let config = parse(&["--command-timeout", "5"]);
        assert_eq!(config.execution().timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_command_timeout_rejected() {
        let res = Config::try_parse_from(["rusty-cmd", "--command-timeout", "0"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_keywords_split_on_commas() {
        let config = parse(&["--keyword", "shred,wipefs", "--keyword", "dd"]);
        assert_eq!(config.keywords, vec!["shred", "wipefs", "dd"]);

        let policy = config.safety_policy().unwrap();
        assert_eq!(policy.keywords().collect::<Vec<_>>(), vec!["shred", "wipefs", "dd"]);
    }

    #[test]
    fn test_invalid_pattern_is_policy_error() {
        let config = parse(&["--pattern", "rm\\s+("]);
        assert!(matches!(
            config.safety_policy(),
            Err(PolicyError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_explicit_shell_and_confirm_timeout() {
        let config = parse(&["--shell", "/bin/bash", "--confirm-timeout", "10"]);
        assert_eq!(config.execution().shell, "/bin/bash");
        assert_eq!(config.confirm_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_translator_config() {
        let config = parse(&["--api-key", "sk-test", "--model", "gpt-4o", "--api-timeout", "12"]);
        let translator = config.translator();
        assert_eq!(translator.api_key.as_deref(), Some("sk-test"));
        assert_eq!(translator.model, "gpt-4o");
        assert_eq!(translator.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_api_url_is_accepted_as_base() {
        let config = parse(&["--api-url", "http://localhost:8080/v1"]);
        assert_eq!(config.translator().api_base, "http://localhost:8080/v1");

        let config = parse(&[
            "--api-url",
            "http://old.example/v1",
            "--api-base",
            "http://new.example/v1",
        ]);
        assert_eq!(config.translator().api_base, "http://new.example/v1");
    }

    #[test]
    fn test_dotenv_file_feeds_the_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "RUSTY_CMD_TEST_DOTENV_MODEL=model-from-dotenv\n").unwrap();

        load_dotenv_from(&path).unwrap();
        assert_eq!(
            std::env::var("RUSTY_CMD_TEST_DOTENV_MODEL").as_deref(),
            Ok("model-from-dotenv")
        );
    }

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dotenv_from(&dir.path().join(".env")).is_ok());
    }

    #[test]
    fn test_explicit_log_dir() {
        let config = parse(&["--log-dir", "/tmp/rusty-cmd-logs"]);
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/rusty-cmd-logs"));
    }
}
