//! Keyword and pattern based command classification.
//!
//! Deliberately heuristic: a command is sensitive if its lower-cased text
//! contains any policy keyword, or matches any policy pattern. There is no
//! parsing of the command line.

use std::fmt;

use super::{Classification, SafetyPolicy};

/// The first policy rule that flagged a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedRule {
    Keyword(String),
    Pattern(String),
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchedRule::Keyword(k) => write!(f, "contains sensitive keyword '{}'", k),
            MatchedRule::Pattern(p) => write!(f, "matches dangerous pattern '{}'", p),
        }
    }
}

/// Classify a command against the policy.
pub fn classify(command: &str, policy: &SafetyPolicy) -> Classification {
    if classify_with_reason(command, policy).is_some() {
        Classification::Sensitive
    } else {
        Classification::Safe
    }
}

/// Same as [`classify`], but reports which rule matched.
///
/// Returns `None` for safe commands. Keywords are checked before patterns.
pub fn classify_with_reason(command: &str, policy: &SafetyPolicy) -> Option<MatchedRule> {
    let lowered = command.trim().to_lowercase();

    if let Some(keyword) = policy.keywords().find(|k| lowered.contains(k)) {
        return Some(MatchedRule::Keyword(keyword.to_string()));
    }

    policy
        .patterns()
        .find(|re| re.is_match(&lowered))
        .map(|re| MatchedRule::Pattern(re.as_str().to_string()))
}
