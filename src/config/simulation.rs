use serde::Deserialize;
use std::path::Path;

/// Runtime settings for the paced simulation loop. Engine tunables live
/// in their own file, referenced by `engine_config`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f32,
    /// 0 runs until interrupted.
    #[serde(default)]
    pub max_ticks: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Print a population summary every N ticks.
    #[serde(default = "default_stats_interval")]
    pub stats_interval: u32,
    /// When set, rendered frames are written here as PPM images.
    #[serde(default)]
    pub frame_directory: Option<String>,
    #[serde(default = "default_frame_interval")]
    pub frame_interval: u32,
    /// Rendered pixels per grid cell.
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    #[serde(default = "default_engine_config")]
    pub engine_config: String,
}

fn default_tick_rate() -> f32 {
    4.0
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_stats_interval() -> u32 {
    100
}
fn default_frame_interval() -> u32 {
    10
}
fn default_cell_size() -> u32 {
    4
}
fn default_engine_config() -> String {
    "engine.toml".to_string()
}

impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.tick_rate_hz <= 0.0 {
            errors.push(format!(
                "tick_rate_hz must be > 0.0, got {}. Example: tick_rate_hz = 4.0",
                self.tick_rate_hz
            ));
        }
        if self.stats_interval == 0 {
            errors.push(format!(
                "stats_interval must be > 0, got {}. Example: stats_interval = 100",
                self.stats_interval
            ));
        }
        if self.frame_interval == 0 {
            errors.push(format!(
                "frame_interval must be > 0, got {}. Example: frame_interval = 10",
                self.frame_interval
            ));
        }
        if self.cell_size == 0 {
            errors.push(format!(
                "cell_size must be > 0, got {}. Example: cell_size = 4",
                self.cell_size
            ));
        }
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn test_path() -> PathBuf {
        PathBuf::from("test-config.toml")
    }

    #[test]
    fn valid_config_loads_all_fields() {
        let toml = r#"
            tick_rate_hz = 8.0
            max_ticks = 500
            log_level = "debug"
            stats_interval = 50
            frame_directory = "./frames"
            frame_interval = 5
            cell_size = 2
            engine_config = "./my-engine.toml"
        "#;
        let config = SimulationConfig::from_toml_str(toml, &test_path()).unwrap();
        assert_eq!(config.tick_rate_hz, 8.0);
        assert_eq!(config.max_ticks, 500);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.stats_interval, 50);
        assert_eq!(config.frame_directory.as_deref(), Some("./frames"));
        assert_eq!(config.frame_interval, 5);
        assert_eq!(config.cell_size, 2);
        assert_eq!(config.engine_config, "./my-engine.toml");
    }

    #[test]
    fn defaults_applied_for_empty_config() {
        let config = SimulationConfig::from_toml_str("", &test_path()).unwrap();
        assert_eq!(config.tick_rate_hz, 4.0);
        assert_eq!(config.max_ticks, 0);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.stats_interval, 100);
        assert!(config.frame_directory.is_none());
        assert_eq!(config.frame_interval, 10);
        assert_eq!(config.cell_size, 4);
        assert_eq!(config.engine_config, "engine.toml");
    }

    #[test]
    fn invalid_tick_rate_rejected() {
        let err = SimulationConfig::from_toml_str("tick_rate_hz = 0.0", &test_path()).unwrap_err();
        assert!(err.contains("tick_rate_hz"));
    }

    #[test]
    fn invalid_log_level_rejected() {
        let err =
            SimulationConfig::from_toml_str(r#"log_level = "loud""#, &test_path()).unwrap_err();
        assert!(err.contains("log_level"));
    }

    #[test]
    fn multiple_errors_reported_together() {
        let toml = "tick_rate_hz = -1.0\nstats_interval = 0\ncell_size = 0";
        let err = SimulationConfig::from_toml_str(toml, &test_path()).unwrap_err();
        assert!(err.contains("tick_rate_hz"));
        assert!(err.contains("stats_interval"));
        assert!(err.contains("cell_size"));
    }

    #[test]
    fn from_file_loads_valid_config() {
        let mut tmp = NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(tmp, "tick_rate_hz = 2.0").unwrap();
        let config = SimulationConfig::from_file(tmp.path()).unwrap();
        assert_eq!(config.tick_rate_hz, 2.0);
    }

    #[test]
    fn from_file_missing_file_error() {
        let err = SimulationConfig::from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(err.contains("Cannot read"));
    }
}
