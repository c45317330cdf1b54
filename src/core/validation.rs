//! Input validation for series pricing
//!
//! Every check runs before the simulator; once inputs pass, the
//! computation cannot fail.

use thiserror::Error;

use super::series::{SeriesFormat, SeriesState, TeamNames};

/// Validation failures reported to the caller
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("Invalid odds for {quote}: {value} (must be a number greater than 1)")]
    InvalidOdds { quote: &'static str, value: f64 },

    #[error("The series is already over. Winner: {winner}")]
    SeriesAlreadyDecided { winner: String },

    #[error("Invalid series state: {0}")]
    InvalidSeriesState(String),

    #[error("Unsupported series format: best of {0} (expected 3, 5 or 7)")]
    UnsupportedFormat(i64),

    #[error("Invalid margin: {0} (must be a finite number >= 0)")]
    InvalidMargin(f64),
}

pub fn validate_odds(quote: &'static str, odds: f64) -> Result<(), SeriesError> {
    if !odds.is_finite() || odds <= 1.0 {
        return Err(SeriesError::InvalidOdds { quote, value: odds });
    }
    Ok(())
}

pub fn validate_margin(margin: f64) -> Result<(), SeriesError> {
    if !margin.is_finite() || margin < 0.0 {
        return Err(SeriesError::InvalidMargin(margin));
    }
    Ok(())
}

/// Validate already-played counters and build the simulator's start state
///
/// Counters arrive signed so that negative adapter input can be reported
/// instead of wrapping. A decided series is reported before any other
/// inconsistency.
pub fn validate_series_state(
    format: SeriesFormat,
    wins_a: i64,
    wins_b: i64,
    breaks: i64,
    names: &TeamNames,
) -> Result<SeriesState, SeriesError> {
    let wins_needed = i64::from(format.wins_needed());

    if wins_a >= wins_needed || wins_b >= wins_needed {
        let winner = if wins_a >= wins_needed {
            &names.a
        } else {
            &names.b
        };
        return Err(SeriesError::SeriesAlreadyDecided {
            winner: winner.clone(),
        });
    }

    if wins_a < 0 || wins_b < 0 {
        return Err(SeriesError::InvalidSeriesState(format!(
            "win counts must be non-negative, got {}-{}",
            wins_a, wins_b
        )));
    }

    if breaks < 0 {
        return Err(SeriesError::InvalidSeriesState(format!(
            "breaks must be non-negative, got {}",
            breaks
        )));
    }

    if breaks > wins_a + wins_b {
        return Err(SeriesError::InvalidSeriesState(format!(
            "{} breaks recorded but only {} games played",
            breaks,
            wins_a + wins_b
        )));
    }

    // All three are below wins_needed (<= 4), so the narrowing is lossless
    Ok(SeriesState {
        wins_a: wins_a as u8,
        wins_b: wins_b as u8,
        breaks: breaks as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_odds_valid() {
        assert!(validate_odds("q", 1.01).is_ok());
        assert!(validate_odds("q", 2.0).is_ok());
        assert!(validate_odds("q", 150.0).is_ok());
    }

    #[test]
    fn test_validate_odds_invalid() {
        assert!(validate_odds("q", 1.0).is_err());
        assert!(validate_odds("q", 0.0).is_err());
        assert!(validate_odds("q", -3.0).is_err());
        assert!(validate_odds("q", f64::NAN).is_err());
        assert!(validate_odds("q", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_margin() {
        assert!(validate_margin(0.0).is_ok());
        assert!(validate_margin(0.08).is_ok());
        assert!(validate_margin(-0.01).is_err());
        assert!(validate_margin(f64::INFINITY).is_err());
    }

    #[test]
    fn test_state_valid() {
        let state =
            validate_series_state(SeriesFormat::BestOf5, 2, 1, 1, &TeamNames::default()).unwrap();
        assert_eq!(state.wins_a, 2);
        assert_eq!(state.wins_b, 1);
        assert_eq!(state.breaks, 1);
        assert_eq!(state.games_played(), 3);
    }

    #[test]
    fn test_state_decided_names_winner() {
        let names = TeamNames::new("Oilers", "Panthers");

        let err = validate_series_state(SeriesFormat::BestOf7, 4, 2, 0, &names).unwrap_err();
        assert_eq!(
            err,
            SeriesError::SeriesAlreadyDecided {
                winner: "Oilers".to_string()
            }
        );

        let err = validate_series_state(SeriesFormat::BestOf3, 0, 2, 0, &names).unwrap_err();
        assert!(err.to_string().contains("Winner: Panthers"));
    }

    #[test]
    fn test_state_negative_counts() {
        let names = TeamNames::default();
        assert!(matches!(
            validate_series_state(SeriesFormat::BestOf5, -1, 0, 0, &names),
            Err(SeriesError::InvalidSeriesState(_))
        ));
        assert!(matches!(
            validate_series_state(SeriesFormat::BestOf5, 0, -2, 0, &names),
            Err(SeriesError::InvalidSeriesState(_))
        ));
        assert!(matches!(
            validate_series_state(SeriesFormat::BestOf5, 1, 0, -1, &names),
            Err(SeriesError::InvalidSeriesState(_))
        ));
    }

    #[test]
    fn test_state_too_many_breaks() {
        let err = validate_series_state(SeriesFormat::BestOf5, 1, 1, 3, &TeamNames::default())
            .unwrap_err();
        assert!(matches!(err, SeriesError::InvalidSeriesState(_)));
        assert!(err.to_string().contains("3 breaks"));
    }

    #[test]
    fn test_error_display() {
        let err = SeriesError::UnsupportedFormat(4);
        assert!(err.to_string().contains("best of 4"));
    }
}
