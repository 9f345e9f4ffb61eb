use serde::Deserialize;
use std::path::Path;

/// Every tunable the ecosystem engine consumes, collected into one value
/// passed at construction. Nothing in the engine reads ambient state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Mandatory per-tick energy decay, charged before any decision.
    #[serde(default = "default_respiration_cost")]
    pub respiration_cost: f64,
    /// Recurring penalty for standing on ground that does not support
    /// the species.
    #[serde(default = "default_incompatibility_cost")]
    pub incompatibility_cost: f64,
    #[serde(default = "default_birth_cost")]
    pub birth_cost: f64,
    #[serde(default = "default_move_cost")]
    pub move_cost: f64,
    #[serde(default = "default_predate_cost")]
    pub predate_cost: f64,
    #[serde(default = "default_graze_return")]
    pub graze_return: f64,
    #[serde(default = "default_graze_jitter")]
    pub graze_jitter: f64,
    /// Fraction of the prey's strength transferred on a kill.
    #[serde(default = "default_predate_return")]
    pub predate_return: f64,
    #[serde(default = "default_predate_jitter")]
    pub predate_jitter: f64,
    #[serde(default = "default_max_strength")]
    pub max_strength: f64,
    /// Age at which the mortality curve reaches certainty.
    #[serde(default = "default_mortality_horizon")]
    pub mortality_horizon: f64,
    #[serde(default = "default_scan_radius")]
    pub scan_radius: i32,
    /// Per-step probability that a neighborhood scan stops once all its
    /// sought candidates are present.
    #[serde(default = "default_scan_stop_prob")]
    pub scan_stop_prob: f64,
    /// Movement bound per tick; doubles as the predator strike range.
    #[serde(default = "default_max_move_distance")]
    pub max_move_distance: f64,
    /// Neighbor density (occupants per scan-radius squared) above which
    /// the overcrowding penalty may apply.
    #[serde(default = "default_overcrowding_density")]
    pub overcrowding_density: f64,
    #[serde(default = "default_overcrowding_prob")]
    pub overcrowding_prob: f64,
    #[serde(default = "default_overcrowding_cost")]
    pub overcrowding_cost: f64,
    /// Color distance below which two grazers count as breeding partners.
    #[serde(default = "default_mate_color_distance")]
    pub mate_color_distance: f64,
    /// Bound on the per-tick drift of a grazer's active color channel.
    #[serde(default = "default_color_drift_max")]
    pub color_drift_max: f64,
    /// Chance per tick of a grazer permanently switching its active
    /// channel, gated to the lower part of the grid.
    #[serde(default = "default_speciation_prob")]
    pub speciation_prob: f64,
    #[serde(default = "default_speciation_min_y")]
    pub speciation_min_y: i32,
    /// Column gate for a child inheriting its partner's color.
    #[serde(default = "default_partner_color_min_x")]
    pub partner_color_min_x: i32,
    #[serde(default = "default_grazer_initial_strength")]
    pub grazer_initial_strength: f64,
    #[serde(default = "default_predator_initial_strength")]
    pub predator_initial_strength: f64,
    /// Chance a strictly stronger attacker still loses.
    #[serde(default = "default_combat_stronger_fail_prob")]
    pub combat_stronger_fail_prob: f64,
    /// Chance an equal-strength attacker wins.
    #[serde(default = "default_combat_equal_win_prob")]
    pub combat_equal_win_prob: f64,
    /// Chance a strictly weaker attacker wins.
    #[serde(default = "default_combat_weaker_win_prob")]
    pub combat_weaker_win_prob: f64,
}

fn default_respiration_cost() -> f64 {
    0.01
}
fn default_incompatibility_cost() -> f64 {
    0.4
}
fn default_birth_cost() -> f64 {
    0.5
}
fn default_move_cost() -> f64 {
    0.02
}
fn default_predate_cost() -> f64 {
    0.05
}
fn default_graze_return() -> f64 {
    0.04
}
fn default_graze_jitter() -> f64 {
    0.01
}
fn default_predate_return() -> f64 {
    0.5
}
fn default_predate_jitter() -> f64 {
    0.1
}
fn default_max_strength() -> f64 {
    3.0
}
fn default_mortality_horizon() -> f64 {
    120.0
}
fn default_scan_radius() -> i32 {
    4
}
fn default_scan_stop_prob() -> f64 {
    0.1
}
fn default_max_move_distance() -> f64 {
    3.0
}
fn default_overcrowding_density() -> f64 {
    0.5
}
fn default_overcrowding_prob() -> f64 {
    0.4
}
fn default_overcrowding_cost() -> f64 {
    0.25
}
fn default_mate_color_distance() -> f64 {
    0.2
}
fn default_color_drift_max() -> f64 {
    10.0
}
fn default_speciation_prob() -> f64 {
    0.01
}
fn default_speciation_min_y() -> i32 {
    80
}
fn default_partner_color_min_x() -> i32 {
    50
}
fn default_grazer_initial_strength() -> f64 {
    1.0
}
fn default_predator_initial_strength() -> f64 {
    1.2
}
fn default_combat_stronger_fail_prob() -> f64 {
    0.1
}
fn default_combat_equal_win_prob() -> f64 {
    0.5
}
fn default_combat_weaker_win_prob() -> f64 {
    0.1
}

impl Default for EngineConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty config populates every default")
    }
}

impl EngineConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, source_path: &Path) -> Result<Self, String> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| format!("{}: {}", source_path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("respiration_cost", self.respiration_cost),
            ("incompatibility_cost", self.incompatibility_cost),
            ("birth_cost", self.birth_cost),
            ("move_cost", self.move_cost),
            ("predate_cost", self.predate_cost),
        ] {
            if value < 0.0 {
                errors.push(format!("{} must be >= 0.0, got {}", name, value));
            }
        }

        if self.max_strength <= 0.0 {
            errors.push(format!(
                "max_strength must be > 0.0, got {}",
                self.max_strength
            ));
        }
        if self.mortality_horizon <= 0.0 {
            errors.push(format!(
                "mortality_horizon must be > 0.0, got {}",
                self.mortality_horizon
            ));
        }
        if self.scan_radius < 1 {
            errors.push(format!("scan_radius must be >= 1, got {}", self.scan_radius));
        }
        if self.max_move_distance <= 0.0 {
            errors.push(format!(
                "max_move_distance must be > 0.0, got {}",
                self.max_move_distance
            ));
        }

        if self.graze_jitter < 0.0 || self.graze_jitter > self.graze_return {
            errors.push(format!(
                "graze_jitter must be in [0.0, graze_return], got {} (graze_return = {})",
                self.graze_jitter, self.graze_return
            ));
        }
        if self.predate_jitter < 0.0 || self.predate_jitter > self.predate_return {
            errors.push(format!(
                "predate_jitter must be in [0.0, predate_return], got {} (predate_return = {})",
                self.predate_jitter, self.predate_return
            ));
        }
        if self.color_drift_max < 0.0 {
            errors.push(format!(
                "color_drift_max must be >= 0.0, got {}",
                self.color_drift_max
            ));
        }

        for (name, value) in [
            ("scan_stop_prob", self.scan_stop_prob),
            ("overcrowding_prob", self.overcrowding_prob),
            ("speciation_prob", self.speciation_prob),
            ("combat_stronger_fail_prob", self.combat_stronger_fail_prob),
            ("combat_equal_win_prob", self.combat_equal_win_prob),
            ("combat_weaker_win_prob", self.combat_weaker_win_prob),
            ("mate_color_distance", self.mate_color_distance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{} must be 0.0-1.0, got {}", name, value));
            }
        }

        for (name, value) in [
            ("grazer_initial_strength", self.grazer_initial_strength),
            ("predator_initial_strength", self.predator_initial_strength),
        ] {
            if value <= 0.0 || value > self.max_strength {
                errors.push(format!(
                    "{} must be in (0.0, max_strength], got {} (max_strength = {})",
                    name, value, self.max_strength
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}
