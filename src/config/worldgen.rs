use serde::Deserialize;
use std::path::Path;

/// Parameters used to procedurally generate a world.
/// Kept on the world afterwards so a run can report its actual seed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationParams {
    /// 0 picks a random seed; the resolved value is stored on the world.
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    /// Fraction of the ground layer covered by meadow patches.
    #[serde(default = "default_meadow_coverage")]
    pub meadow_coverage: f64,
    /// Noise frequency for patch shapes; higher means smaller patches.
    #[serde(default = "default_patch_scale")]
    pub patch_scale: f64,
    /// Per-meadow-slot chance of seeding a grazer.
    #[serde(default = "default_grazer_density")]
    pub grazer_density: f64,
    /// Per-bare-slot chance of seeding a predator.
    #[serde(default = "default_predator_density")]
    pub predator_density: f64,
}

fn default_width() -> i32 {
    120
}
fn default_height() -> i32 {
    120
}
fn default_meadow_coverage() -> f64 {
    0.45
}
fn default_patch_scale() -> f64 {
    0.08
}
fn default_grazer_density() -> f64 {
    0.04
}
fn default_predator_density() -> f64 {
    0.01
}

impl Default for GenerationParams {
    fn default() -> Self {
        toml::from_str("").expect("empty config populates every default")
    }
}

impl GenerationParams {
    /// Load generation parameters from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        let params: Self = toml::from_str(&content)
            .map_err(|e| format!("Invalid TOML in {}: {}", path.display(), e))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if self.width < 8 || self.height < 8 {
            errors.push(format!(
                "grid must be at least 8x8 cells, got {}x{}",
                self.width, self.height
            ));
        }
        if !(0.0..=1.0).contains(&self.meadow_coverage) {
            errors.push(format!(
                "meadow_coverage must be 0.0-1.0, got {}",
                self.meadow_coverage
            ));
        }
        if self.patch_scale <= 0.0 {
            errors.push(format!(
                "patch_scale must be > 0.0, got {}",
                self.patch_scale
            ));
        }
        if !(0.0..=1.0).contains(&self.grazer_density) {
            errors.push(format!(
                "grazer_density must be 0.0-1.0, got {}",
                self.grazer_density
            ));
        }
        if !(0.0..=1.0).contains(&self.predator_density) {
            errors.push(format!(
                "predator_density must be 0.0-1.0, got {}",
                self.predator_density
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

    fn test_path() -> PathBuf {
        PathBuf::from("test-worldgen.toml")
    }

    fn from_str(content: &str) -> Result<GenerationParams, String> {
        let params: GenerationParams =
            toml::from_str(content).map_err(|e| e.to_string())?;
        params.validate()?;
        Ok(params)
    }

    #[test]
    fn defaults_form_a_valid_world() {
        let params = GenerationParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.seed, 0);
        assert_eq!((params.width, params.height), (120, 120));
    }

    #[test]
    fn tiny_grid_rejected() {
        let err = from_str("width = 4\nheight = 4").unwrap_err();
        assert!(err.contains("8x8"));
    }

    #[test]
    fn coverage_out_of_range_rejected() {
        let err = from_str("meadow_coverage = 1.5").unwrap_err();
        assert!(err.contains("meadow_coverage"));
    }

    #[test]
    fn density_out_of_range_rejected() {
        let err = from_str("grazer_density = -0.1").unwrap_err();
        assert!(err.contains("grazer_density"));
    }

    #[test]
    fn from_file_missing_file_error() {
        let err =
            GenerationParams::from_file(&test_path().join("missing")).unwrap_err();
        assert!(err.contains("Cannot read"));
    }
}
