use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Host-provided configuration. Loading and storage belong to the host; the
/// engine only consumes the values.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Glob patterns selecting step-definition files, resolved against
    /// `root` unless absolute.
    #[serde(default = "default_step_paths")]
    pub step_paths: Vec<String>,

    /// Words trimmed from the front of a scenario line before full-line
    /// navigation matching.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Workspace root for relative patterns.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            step_paths: default_step_paths(),
            keywords: default_keywords(),
            root: None,
        }
    }
}

fn default_step_paths() -> Vec<String> {
    vec!["features/steps/*.py".to_string()]
}

fn default_keywords() -> Vec<String> {
    ["given", "when", "then", "and", "but"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
