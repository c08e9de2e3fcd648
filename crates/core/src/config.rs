use thiserror::Error;
use vaulta_protocol::SnapConfig;

/// Longest snap duration or delay accepted, in seconds.
pub const MAX_SNAP_SECONDS: f64 = 10.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid snap config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Parse and validate a snap config document. Missing fields take their
/// defaults.
pub fn parse_snap_config(data: &[u8]) -> Result<SnapConfig, ConfigError> {
    let config: SnapConfig = serde_json::from_slice(data)?;
    validate_snap_config(&config)?;
    Ok(config)
}

pub fn validate_snap_config(config: &SnapConfig) -> Result<(), ConfigError> {
    let non_negative = |field, value: f64| {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange { field, value })
        }
    };
    let seconds = |field, value: f64| {
        non_negative(field, value)?;
        if value <= MAX_SNAP_SECONDS {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange { field, value })
        }
    };
    non_negative("buffer", config.buffer)?;
    seconds("delay", config.delay)?;
    seconds("duration.min", config.duration.min)?;
    seconds("duration.max", config.duration.max)?;
    if config.duration.max < config.duration.min {
        return Err(ConfigError::OutOfRange {
            field: "duration.max",
            value: config.duration.max,
        });
    }
    if !(config.full_duration_distance.is_finite() && config.full_duration_distance > 0.0) {
        return Err(ConfigError::OutOfRange {
            field: "full_duration_distance",
            value: config.full_duration_distance,
        });
    }
    Ok(())
}
