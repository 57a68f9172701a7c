//! Error types shared across the crate.
//!
//! Only [`PolicyError`] ever reaches the application boundary. Execution and
//! translation failures are folded into `ExecutionResult` and `Translation`
//! values by the components that produce them.

use std::time::Duration;

/// Malformed safety policy. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// A keyword was empty after trimming; it would match every command.
    #[error("sensitive keyword list contains an empty entry")]
    EmptyKeyword,

    /// A pattern was empty; it would match every command.
    #[error("dangerous pattern list contains an empty entry")]
    EmptyPattern,

    /// A pattern failed to compile.
    #[error("invalid dangerous pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The policy file could not be read.
    #[error("failed to read policy file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The policy file is not valid TOML for a policy.
    #[error("invalid policy file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Why an attempted execution did not run to a normal exit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("Command execution timed out (exceeded {} seconds)", .limit.as_secs())]
    Timeout { limit: Duration },

    #[error("Failed to launch shell `{shell}`: {reason}")]
    Launch { shell: String, reason: String },

    #[error("Command execution interrupted")]
    Interrupted,

    #[error("Error occurred while executing command: {0}")]
    Unexpected(String),
}

/// Failure talking to the translation service.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("AI service not configured. Please set the AI_API_KEY environment variable.")]
    NotConfigured,

    #[error("API request timeout (exceeded {} seconds)", .0.as_secs())]
    Timeout(Duration),

    #[error("AI service error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("Malformed tool call from AI service: {0}")]
    MalformedToolCall(String),

    #[error("AI service returned an empty response")]
    EmptyResponse,
}
