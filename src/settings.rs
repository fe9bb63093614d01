use crate::error::SimError;
use crate::grid::MIN_DIMENSION;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Initialization-time simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Trees in the x direction, border included (min 3)
    pub width: usize,
    /// Trees in the y direction, border included (min 3)
    pub height: usize,
    /// Percent chance (0-100) that one burning neighbour ignites a tree per tick
    pub burn_chance: u8,
    /// Milliseconds between ticks while playing
    pub interval_ms: u64,
    /// Pixel width of the rendered surface used for image export
    pub surface_width: u32,
    /// Pixel height of the rendered surface used for image export
    pub surface_height: u32,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            burn_chance: 50,
            interval_ms: 100,
            surface_width: 300,
            surface_height: 300,
            seed: None,
        }
    }
}

impl SimulationSettings {
    /// Reject settings the simulation cannot start with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(SimError::InvalidConfiguration {
                width: self.width,
                height: self.height,
            });
        }
        if self.burn_chance > 100 {
            return Err(SimError::InvalidBurnChance(self.burn_chance));
        }
        Ok(())
    }

    /// Tick interval, never shorter than a millisecond
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_constants() {
        let settings = SimulationSettings::default();
        assert_eq!((settings.width, settings.height), (20, 20));
        assert_eq!(settings.burn_chance, 50);
        assert_eq!(settings.interval(), Duration::from_millis(100));
        assert_eq!((settings.surface_width, settings.surface_height), (300, 300));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_small_grids() {
        let settings = SimulationSettings {
            width: 3,
            height: 2,
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SimError::InvalidConfiguration { width: 3, height: 2 })
        );
    }

    #[test]
    fn test_validate_rejects_burn_chance_over_100() {
        let settings = SimulationSettings {
            burn_chance: 101,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(SimError::InvalidBurnChance(101)));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let settings = SimulationSettings {
            interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(settings.interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: SimulationSettings = serde_json::from_str(r#"{"burn_chance": 80}"#).unwrap();
        assert_eq!(settings.burn_chance, 80);
        assert_eq!(settings.width, 20);
        assert_eq!(settings.seed, None);
    }
}
