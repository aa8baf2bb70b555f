use serde_derive::{Deserialize, Serialize};

pub const DEFAULT_PROMPT: &str = "mvcc-cli";

/// Persisted CLI settings, loaded with `confy` from an explicit path given
/// on the command line and merged with defaults for anything the file
/// doesn't set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigLoad {
    /// Prompt shown in the REPL.
    pub prompt: Option<String>,

    /// Isolation level new transactions use when `begin` is given no
    /// explicit level: one of `read-uncommitted`, `read-committed`,
    /// `repeatable-read`, `snapshot`, `serializable`.
    pub default_isolation: Option<String>,

    /// Show timing/row-affected output after each command. Only applies
    /// in interactive mode.
    pub show_stats: Option<bool>,
}

impl Default for ConfigLoad {
    fn default() -> Self {
        ConfigLoad {
            prompt: Some(DEFAULT_PROMPT.to_string()),
            default_isolation: Some("read-committed".to_string()),
            show_stats: Some(false),
        }
    }
}

impl ConfigLoad {
    /// Loads config from `path`, falling back to defaults if the file is
    /// absent or unreadable.
    pub fn load(path: &str) -> Self {
        match confy::load_path(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("failed to load config from {path}: {err}, using defaults");
                ConfigLoad::default()
            }
        }
    }

    /// Applies a `.cmd_name cmd_value` control command issued from the REPL.
    pub fn inject_cmd(&mut self, cmd_name: &str, cmd_value: &str) -> anyhow::Result<()> {
        match cmd_name {
            "show_stats" => self.show_stats = Some(cmd_value.parse()?),
            "default_isolation" => self.default_isolation = Some(cmd_value.to_string()),
            "prompt" => self.prompt = Some(cmd_value.to_string()),
            _ => anyhow::bail!("unknown setting: {cmd_name}"),
        }
        Ok(())
    }

    pub fn terminal_update(&mut self) {
        self.show_stats = Some(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_read_committed() {
        let cfg = ConfigLoad::default();
        assert_eq!(cfg.default_isolation.as_deref(), Some("read-committed"));
    }

    #[test]
    fn inject_cmd_updates_known_settings() {
        let mut cfg = ConfigLoad::default();
        cfg.inject_cmd("show_stats", "true").unwrap();
        assert_eq!(cfg.show_stats, Some(true));
    }

    #[test]
    fn inject_cmd_rejects_unknown_settings() {
        let mut cfg = ConfigLoad::default();
        assert!(cfg.inject_cmd("bogus", "1").is_err());
    }
}
