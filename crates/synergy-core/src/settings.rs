//! Tunable thresholds for the analytics engine.
//!
//! Loaded from the `[analytics]` section of the application config. Every
//! field has a default so a partial section is fine.

use serde::{Deserialize, Serialize};

use crate::analytics::classification::ClassificationRules;
use crate::error::ValidationError;

/// Engine thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Maximum related products returned.
    pub related_limit: usize,
    /// Trailing window for sales velocity, in days.
    pub velocity_window_days: u32,
    /// Below this many days of supply a lot is critical.
    pub critical_days_of_supply: f64,
    /// Above this many days of supply a lot is overstocked.
    pub overstock_days_of_supply: f64,
    /// Lots expiring within this many days are critical.
    pub expiry_warning_days: i64,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        AnalyticsSettings {
            related_limit: crate::RELATED_PRODUCTS_LIMIT,
            velocity_window_days: crate::VELOCITY_WINDOW_DAYS,
            critical_days_of_supply: crate::CRITICAL_DAYS_OF_SUPPLY,
            overstock_days_of_supply: crate::OVERSTOCK_DAYS_OF_SUPPLY,
            expiry_warning_days: crate::EXPIRY_WARNING_DAYS,
        }
    }
}

impl AnalyticsSettings {
    /// Rejects settings the engine cannot work with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.related_limit == 0 {
            return Err(ValidationError::OutOfRange {
                field: "related_limit".to_string(),
                min: 1,
                max: i64::MAX,
            });
        }
        if !(1..=crate::MAX_WINDOW_DAYS).contains(&i64::from(self.velocity_window_days)) {
            return Err(ValidationError::OutOfRange {
                field: "velocity_window_days".to_string(),
                min: 1,
                max: crate::MAX_WINDOW_DAYS,
            });
        }
        if !(0..=crate::MAX_WINDOW_DAYS).contains(&self.expiry_warning_days) {
            return Err(ValidationError::OutOfRange {
                field: "expiry_warning_days".to_string(),
                min: 0,
                max: crate::MAX_WINDOW_DAYS,
            });
        }
        if !(self.critical_days_of_supply <= self.overstock_days_of_supply) {
            return Err(ValidationError::InvalidFormat {
                field: "critical_days_of_supply".to_string(),
                reason: format!(
                    "{} must not exceed overstock_days_of_supply ({})",
                    self.critical_days_of_supply, self.overstock_days_of_supply
                ),
            });
        }
        Ok(())
    }

    /// Classifier thresholds.
    pub fn classification_rules(&self) -> ClassificationRules {
        ClassificationRules {
            critical_days_of_supply: self.critical_days_of_supply,
            overstock_days_of_supply: self.overstock_days_of_supply,
            expiry_warning_days: self.expiry_warning_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AnalyticsSettings::default();
        assert_eq!(settings.related_limit, 5);
        assert_eq!(settings.velocity_window_days, 365);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.classification_rules(), ClassificationRules::default());
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let settings: AnalyticsSettings =
            serde_json::from_str(r#"{"related_limit": 3}"#).unwrap();
        assert_eq!(settings.related_limit, 3);
        assert_eq!(settings.expiry_warning_days, 90);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let settings = AnalyticsSettings {
            critical_days_of_supply: 40.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = AnalyticsSettings {
            related_limit: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_caps_day_windows() {
        let settings = AnalyticsSettings {
            velocity_window_days: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::OutOfRange { ref field, max: crate::MAX_WINDOW_DAYS, .. })
                if field == "velocity_window_days"
        ));

        let settings = AnalyticsSettings {
            expiry_warning_days: i64::MAX,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "expiry_warning_days"
        ));

        let settings = AnalyticsSettings {
            velocity_window_days: crate::MAX_WINDOW_DAYS as u32,
            expiry_warning_days: crate::MAX_WINDOW_DAYS,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }
}
