//! Safety policy data: the sensitive keyword set and dangerous pattern list.
//!
//! The policy is configuration, not code. It starts from the built-in lists
//! below and can be replaced, list by list, from a TOML policy file or from
//! the command line / environment.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::PolicyError;

/// Keywords that flag a command as sensitive when found anywhere in it.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    // deletion
    "rm", "delete", "remove",
    // move / copy may silently overwrite
    "mv", "move", "cp", "copy",
    // permissions
    "chmod", "chown",
    // privilege escalation
    "sudo", "su",
    // disk level
    "dd", "format", "mkfs",
    // power control
    "shutdown", "reboot", "halt",
    // process termination
    "kill", "killall",
    // network downloads
    "curl", "wget",
    "git push --force",
    // destructive database operations
    "drop", "truncate",
    // redirection
    ">", ">>",
    "uninstall", "purge",
];

/// Higher-risk command shapes, matched against the lower-cased command.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"rm\s+-rf",  // recursive delete
    r"rm\s+.*\*", // wildcard delete
    r">\s+/",     // redirect to filesystem root
    r"sudo\s+rm", // delete with privilege escalation
];

/// Compiled, validated policy consulted by the classifier.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    keywords: Vec<String>,
    patterns: Vec<Regex>,
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            patterns: DEFAULT_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }
}

impl SafetyPolicy {
    /// Build a policy from raw lists, rejecting entries that would make the
    /// classifier meaningless or that do not compile.
    pub fn new<K, P>(keywords: K, patterns: P) -> Result<Self, PolicyError>
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| {
                let k = k.as_ref().trim().to_lowercase();
                if k.is_empty() {
                    Err(PolicyError::EmptyKeyword)
                } else {
                    Ok(k)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                if p.trim().is_empty() {
                    return Err(PolicyError::EmptyPattern);
                }
                Regex::new(p).map_err(|source| PolicyError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { keywords, patterns })
    }

    /// Resolve the effective policy. Later sources replace earlier ones list
    /// by list: built-in defaults, then the policy file, then explicit lists.
    pub fn resolve(
        file: Option<&Path>,
        keywords: &[String],
        patterns: &[String],
    ) -> Result<Self, PolicyError> {
        let from_file = match file {
            Some(path) => PolicyFile::load(path)?,
            None => PolicyFile::default(),
        };

        let keywords: Vec<String> = if !keywords.is_empty() {
            keywords.to_vec()
        } else if let Some(k) = from_file.keywords {
            k
        } else {
            DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
        };

        let patterns: Vec<String> = if !patterns.is_empty() {
            patterns.to_vec()
        } else if let Some(p) = from_file.patterns {
            p
        } else {
            DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
        };

        Self::new(keywords, patterns)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &Regex> {
        self.patterns.iter()
    }
}

/// On-disk policy overrides. Absent lists keep the defaults.
///
/// ```toml
/// keywords = ["rm", "sudo", "terraform destroy"]
/// patterns = ['rm\s+-rf']
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFile {
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
}

impl PolicyFile {
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let raw = fs::read_to_string(path).map_err(|source| PolicyError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| PolicyError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
