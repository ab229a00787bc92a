use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::pipeline::CountStrategy;
use crate::render::DEFAULT_MAP_PATH;

pub const DEFAULT_LOG_FILE: &str = "logs/stop_frequency.log";
pub const DEFAULT_PARALLEL_ROWS: usize = 200_000;

/// Settings taken from the environment (and `.env`, loaded by the binary).
///
/// | Variable                       | Default                    |
/// |--------------------------------|----------------------------|
/// | `LOG_FILE_PATH`                | `logs/stop_frequency.log`  |
/// | `STOP_FREQUENCY_MAP`           | `Output/map.html`          |
/// | `STOP_FREQUENCY_PARALLEL_ROWS` | `200000`                   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_file_path: PathBuf,
    pub map_path: PathBuf,
    /// Stop-time row count above which visits are counted in parallel.
    pub parallel_rows: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let parallel_rows = match lookup("STOP_FREQUENCY_PARALLEL_ROWS") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("STOP_FREQUENCY_PARALLEL_ROWS is not a count: {v}"))?,
            None => DEFAULT_PARALLEL_ROWS,
        };

        Ok(Self {
            log_file_path: lookup("LOG_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                .into(),
            map_path: lookup("STOP_FREQUENCY_MAP")
                .unwrap_or_else(|| DEFAULT_MAP_PATH.to_string())
                .into(),
            parallel_rows,
        })
    }

    pub fn count_strategy(&self) -> CountStrategy {
        CountStrategy::Auto {
            parallel_rows: self.parallel_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.log_file_path, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(settings.map_path, PathBuf::from("Output/map.html"));
        assert_eq!(
            settings.count_strategy(),
            CountStrategy::Auto {
                parallel_rows: DEFAULT_PARALLEL_ROWS
            }
        );
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("LOG_FILE_PATH", "/tmp/run.log"),
            ("STOP_FREQUENCY_MAP", "maps/friday.html"),
            ("STOP_FREQUENCY_PARALLEL_ROWS", " 5000 "),
        ]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.log_file_path, PathBuf::from("/tmp/run.log"));
        assert_eq!(settings.map_path, PathBuf::from("maps/friday.html"));
        assert_eq!(settings.parallel_rows, 5000);
    }

    #[test]
    fn test_bad_parallel_rows() {
        let result = Settings::from_lookup(|k| {
            (k == "STOP_FREQUENCY_PARALLEL_ROWS").then(|| "lots".to_string())
        });
        assert!(result.is_err());
    }
}
