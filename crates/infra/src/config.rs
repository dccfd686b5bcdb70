//! Engine configuration, read from the environment.

use std::path::PathBuf;

pub const SNAPSHOT_PATH_VAR: &str = "STOCKFLOW_SNAPSHOT_PATH";
pub const STRICT_REFERENCES_VAR: &str = "STOCKFLOW_STRICT_REFERENCES";

const DEFAULT_SNAPSHOT_PATH: &str = "stockflow-state.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Where `JsonFileSnapshotStore` keeps the engine state.
    pub snapshot_path: PathBuf,
    /// Reject transitions whose consumption names a material that does not
    /// exist, instead of skipping the entry with a warning.
    pub strict_references: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            strict_references: false,
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let snapshot_path = lookup(SNAPSHOT_PATH_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.snapshot_path);

        let strict_references = match lookup(STRICT_REFERENCES_VAR) {
            None => defaults.strict_references,
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    var = STRICT_REFERENCES_VAR,
                    value = %raw,
                    "unrecognised boolean; using default"
                );
                defaults.strict_references
            }),
        };

        Self {
            snapshot_path,
            strict_references,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(SyncConfig::from_lookup(lookup(&[])), SyncConfig::default());
    }

    #[test]
    fn reads_path_and_flag() {
        let config = SyncConfig::from_lookup(lookup(&[
            (SNAPSHOT_PATH_VAR, "/var/lib/stockflow/state.json"),
            (STRICT_REFERENCES_VAR, "TRUE"),
        ]));
        assert_eq!(config.snapshot_path, PathBuf::from("/var/lib/stockflow/state.json"));
        assert!(config.strict_references);
    }

    #[test]
    fn unparseable_flag_falls_back_to_default() {
        let config = SyncConfig::from_lookup(lookup(&[(STRICT_REFERENCES_VAR, "maybe")]));
        assert!(!config.strict_references);
    }
}
