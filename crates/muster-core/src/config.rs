//! # Lifecycle Configuration
//!
//! Tunable thresholds for the rule table and the simulator. Defaults
//! match the standard husbandry calendar; every value can be overridden
//! per call to support testing and regional variation.

use serde::{Deserialize, Serialize};

// =============================================================================
// DEFAULTS
// =============================================================================

/// Default gestation length before calving is expected, in days.
pub const DEFAULT_GESTATION_DAYS: u32 = 280;

/// Default wait in the breeding pool before a breeding event, in days.
pub const DEFAULT_BREEDING_WAIT_DAYS: u32 = 30;

/// Default delay between a breeding event and the confirmation test,
/// in days.
pub const DEFAULT_CONFIRMATION_DELAY_DAYS: u32 = 45;

/// Default probability that a confirmation test comes back pregnant.
pub const DEFAULT_CONFIRMATION_PROBABILITY: f64 = 0.5;

/// Default nursing period before the calf is weaned, in days.
pub const DEFAULT_WEANING_AGE_DAYS: u32 = 120;

// =============================================================================
// CONFIG
// =============================================================================

/// Sampling granularity of the lifecycle simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// One step per calendar day.
    #[default]
    Daily,
    /// One step on the start date, then on the first of each month.
    Monthly,
}

/// Parameters for stage classification and lifecycle simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Gestation length in days.
    pub gestation_days: u32,

    /// Days an animal waits in the breeding pool before a breeding
    /// event occurs.
    pub breeding_wait_days: u32,

    /// Days after a breeding event before the pregnancy confirmation
    /// test is performed.
    pub confirmation_delay_days: u32,

    /// Probability in `[0, 1]` that the confirmation test succeeds.
    pub confirmation_probability: f64,

    /// Nursing period in days; beyond it the calf is weaned and the dam
    /// returns to the breeding pool.
    pub weaning_age_days: u32,

    /// Simulation sampling granularity.
    pub granularity: Granularity,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            gestation_days: DEFAULT_GESTATION_DAYS,
            breeding_wait_days: DEFAULT_BREEDING_WAIT_DAYS,
            confirmation_delay_days: DEFAULT_CONFIRMATION_DELAY_DAYS,
            confirmation_probability: DEFAULT_CONFIRMATION_PROBABILITY,
            weaning_age_days: DEFAULT_WEANING_AGE_DAYS,
            granularity: Granularity::Daily,
        }
    }
}

impl LifecycleConfig {
    /// Create a config with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the gestation length.
    #[must_use]
    pub fn with_gestation_days(mut self, days: u32) -> Self {
        self.gestation_days = days;
        self
    }

    /// Override the confirmation probability, clamped into `[0, 1]`.
    #[must_use]
    pub fn with_confirmation_probability(mut self, probability: f64) -> Self {
        self.confirmation_probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            DEFAULT_CONFIRMATION_PROBABILITY
        };
        self
    }

    /// Override the sampling granularity.
    #[must_use]
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_husbandry_calendar() {
        let config = LifecycleConfig::default();
        assert_eq!(config.gestation_days, 280);
        assert_eq!(config.breeding_wait_days, 30);
        assert_eq!(config.confirmation_delay_days, 45);
        assert_eq!(config.weaning_age_days, 120);
        assert_eq!(config.granularity, Granularity::Daily);
    }

    #[test]
    fn probability_is_clamped() {
        let config = LifecycleConfig::new().with_confirmation_probability(1.5);
        assert_eq!(config.confirmation_probability, 1.0);

        let config = LifecycleConfig::new().with_confirmation_probability(-0.2);
        assert_eq!(config.confirmation_probability, 0.0);

        let config = LifecycleConfig::new().with_confirmation_probability(f64::NAN);
        assert_eq!(
            config.confirmation_probability,
            DEFAULT_CONFIRMATION_PROBABILITY
        );
    }

    #[test]
    fn builder_overrides_compose() {
        let config = LifecycleConfig::new()
            .with_gestation_days(283)
            .with_granularity(Granularity::Monthly);
        assert_eq!(config.gestation_days, 283);
        assert_eq!(config.granularity, Granularity::Monthly);
    }
}
