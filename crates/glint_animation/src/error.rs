//! Error types for glint_animation

use thiserror::Error;

use crate::property::EffectCategory;

/// Reasons an effect or timer request is rejected
///
/// Every rejection is non-fatal: the request is skipped, a warning is logged,
/// and the caller receives one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    /// The element is inactive or disabled
    #[error("can't run {operation} on {element}, it is disabled")]
    Inactive {
        operation: &'static str,
        element: String,
    },

    /// `glow` on an element that is already glowing
    #[error("can't run glow on {element}, it is already glowing")]
    AlreadyGlowing { element: String },

    /// `stop_glowing` on an element that is not glowing
    #[error("can't run stop_glowing on {element}, it is not glowing")]
    NotGlowing { element: String },

    /// The element doesn't carry the animated property (font size on non-text)
    #[error("can't run {operation} on {element}, it has no {category}")]
    MissingProperty {
        operation: &'static str,
        element: String,
        category: EffectCategory,
    },

    /// Negative or non-finite duration
    #[error("invalid duration for {operation}: {duration}")]
    InvalidDuration {
        operation: &'static str,
        duration: f32,
    },

    /// Extending a timer that already completed or was stopped
    #[error("timer on {element} has already finished")]
    TimerFinished { element: String },

    /// The scheduler behind a handle has been dropped
    #[error("effect scheduler has been dropped")]
    SchedulerDropped,
}

/// Result type for effect operations
pub type Result<T> = std::result::Result<T, EffectError>;

/// Log a rejected request and hand the error back
pub(crate) fn reject<T>(err: EffectError) -> Result<T> {
    tracing::warn!("{}", err);
    Err(err)
}

/// Durations must be finite and non-negative; zero completes on the next tick
pub(crate) fn check_duration(operation: &'static str, duration: f32) -> Result<()> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(())
    } else {
        reject(EffectError::InvalidDuration {
            operation,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_element() {
        let err = EffectError::Inactive {
            operation: "fade_in",
            element: "title".into(),
        };
        assert_eq!(err.to_string(), "can't run fade_in on title, it is disabled");

        let err = EffectError::MissingProperty {
            operation: "set_font_size",
            element: "box".into(),
            category: EffectCategory::FontSize,
        };
        assert_eq!(
            err.to_string(),
            "can't run set_font_size on box, it has no font-size"
        );
    }

    #[test]
    fn test_check_duration() {
        assert!(check_duration("fade", 0.0).is_ok());
        assert!(check_duration("fade", 2.5).is_ok());
        assert!(matches!(
            check_duration("fade", -1.0),
            Err(EffectError::InvalidDuration { .. })
        ));
        assert!(check_duration("fade", f32::NAN).is_err());
        assert!(check_duration("fade", f32::INFINITY).is_err());
    }

    #[test]
    fn test_reject_logs_warning() {
        let logs = crate::test_util::capture_logs(|| {
            let result: Result<()> = reject(EffectError::NotGlowing {
                element: "badge".into(),
            });
            assert!(result.is_err());
        });

        let warnings = crate::test_util::warnings(&logs);
        assert_eq!(warnings.len(), 1, "{logs}");
        assert!(warnings[0].contains("can't run stop_glowing on badge, it is not glowing"));
    }
}
