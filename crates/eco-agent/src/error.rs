use thiserror::Error;

/// Invalid stats, tuning, or navigation geometry. The runtime refuses to start.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be finite")]
    NotFinite { field: &'static str },

    #[error("`child_scale` must be in (0, 1], got {0}")]
    ChildScale(f32),

    #[error("entity {0} has no position in the navigation service")]
    NotNavigable(u64),
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}
