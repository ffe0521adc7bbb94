//! Configuration validation.
//!
//! Validates all config fields before a simulation runs.

use crate::domain::error::DcasimError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_CONTRIBUTION: f64 = 1000.0;
pub const DEFAULT_TARGET_DAY: i64 = 26;
pub const DEFAULT_MULTIPLIER: f64 = 3.0;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    validate_contribution(config)?;
    validate_target_day(config)?;
    validate_multiplier(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(DcasimError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_contribution(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    let value = config.get_double("simulation", "contribution", DEFAULT_CONTRIBUTION);
    if !value.is_finite() || value <= 0.0 {
        return Err(DcasimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "contribution".to_string(),
            reason: "contribution must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_target_day(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    let value = config.get_int("simulation", "target_day", DEFAULT_TARGET_DAY);
    if !(1..=31).contains(&value) {
        return Err(DcasimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "target_day".to_string(),
            reason: "target_day must be between 1 and 31".to_string(),
        });
    }
    Ok(())
}

fn validate_multiplier(config: &dyn ConfigPort) -> Result<(), DcasimError> {
    // Sign is unconstrained; a negative multiplier models an inverse product.
    let value = config.get_double("leverage", "multiplier", DEFAULT_MULTIPLIER);
    if !value.is_finite() {
        return Err(DcasimError::ConfigInvalid {
            section: "leverage".to_string(),
            key: "multiplier".to_string(),
            reason: "multiplier must be a finite number".to_string(),
        });
    }
    Ok(())
}

fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, DcasimError> {
    match config.get_string("data", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DcasimError::ConfigInvalid {
                section: "data".to_string(),
                key: key.to_string(),
                reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
            }),
    }
}
