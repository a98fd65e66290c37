//! Game-specific error types.
//!
//! Every failure the rover core can detect is recovered locally by the
//! component that detects it (fallback archetype, empty leaderboard, placeholder
//! sprite, inline name error).  These types carry the diagnostic to the log
//! line or the UI; none of them ends a run.

use std::fmt;

/// Top-level error enum for the rover game.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// An archetype id did not match any entry in the roster.
    UnknownArchetype {
        /// The id that was requested.
        id: String,
    },

    /// A difficulty label was not one of `easy`, `medium`, `hard`.
    UnknownDifficulty {
        /// The label that was requested.
        label: String,
    },

    /// A leaderboard name failed validation.  Shown inline on the name-entry screen.
    InvalidName {
        /// Human-readable reason.
        reason: String,
    },

    /// Reading or writing the score store failed.
    Storage {
        /// What was being attempted, with the underlying I/O message.
        context: String,
    },

    /// A TOML document (config or score store) could not be encoded or decoded.
    Serialization {
        /// Underlying parser / encoder message.
        message: String,
    },

    /// A rover sprite generator produced no usable geometry.
    SpriteGeneration {
        /// Archetype whose generator failed.
        archetype: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A configuration constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownArchetype { id } => write!(f, "unknown rover archetype '{}'", id),
            GameError::UnknownDifficulty { label } => {
                write!(f, "unknown difficulty '{}' (expected easy, medium or hard)", label)
            }
            GameError::InvalidName { reason } => write!(f, "invalid name: {}", reason),
            GameError::Storage { context } => write!(f, "score store failure: {}", context),
            GameError::Serialization { message } => {
                write!(f, "encoding failure: {}", message)
            }
            GameError::SpriteGeneration { archetype, reason } => {
                write!(f, "sprite generation failed for '{}': {}", archetype, reason)
            }
            GameError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` lies in `(0.0, 1.0]`.
///
/// Used for multipliers that scale a per-tick probability or speed.
pub fn validate_unit_multiplier(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(GameError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, 1.0]",
        })
    }
}

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> GameResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GameError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if the hot threshold would leave no room for the coolant floor.
///
/// The coolant floor is `threshold - 5`, which must stay above the neutral midpoint
/// or the coolant would fight natural regulation.
pub fn validate_hot_threshold(value: f32) -> GameResult<()> {
    if value > 55.0 && value < 100.0 {
        Ok(())
    } else {
        Err(GameError::UnsafeConstant {
            name: "TEMP_HOT_THRESHOLD",
            value,
            safe_range: "(55.0, 100.0)",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_value() {
        let err = GameError::UnknownArchetype {
            id: "Zeppelin".to_string(),
        };
        assert!(err.to_string().contains("Zeppelin"));
    }

    #[test]
    fn unit_multiplier_rejects_zero_and_above_one() {
        assert!(validate_unit_multiplier("rate", 0.0).is_err());
        assert!(validate_unit_multiplier("rate", 1.2).is_err());
        assert!(validate_unit_multiplier("rate", f32::NAN).is_err());
        assert!(validate_unit_multiplier("rate", 0.75).is_ok());
    }

    #[test]
    fn hot_threshold_must_leave_coolant_headroom() {
        assert!(validate_hot_threshold(75.0).is_ok());
        assert!(validate_hot_threshold(50.0).is_err());
        assert!(validate_hot_threshold(100.0).is_err());
    }
}
