//! Odds Normalization
//!
//! Removes the bookmaker margin from two-way decimal odds quotes.
//!
//! For a two-way market with decimal odds `x` and `y`:
//!     implied_x = 1 / x
//!     implied_y = 1 / y
//!     p_x = implied_x / (implied_x + implied_y)
//!
//! The rescaled probabilities of each market sum to exactly 1.

use serde::{Deserialize, Serialize};

use super::series::Team;
use super::validation::{validate_margin, validate_odds, SeriesError};

/// The four decimal odds quoted for a series, one two-way market per venue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VenueOdds {
    /// Team A winning at venue A
    pub a_home: f64,
    /// Team B winning at venue A
    pub b_away: f64,
    /// Team A winning at venue B
    pub a_away: f64,
    /// Team B winning at venue B
    pub b_home: f64,
}

impl VenueOdds {
    pub fn new(a_home: f64, b_away: f64, a_away: f64, b_home: f64) -> Self {
        Self {
            a_home,
            b_away,
            a_away,
            b_home,
        }
    }

    /// Check every quote is a finite number greater than 1
    pub fn validate(&self) -> Result<(), SeriesError> {
        validate_odds("team A at venue A", self.a_home)?;
        validate_odds("team B at venue A", self.b_away)?;
        validate_odds("team A at venue B", self.a_away)?;
        validate_odds("team B at venue B", self.b_home)?;
        Ok(())
    }

    /// Margin-free probabilities of team A winning at each venue
    pub fn normalize(&self) -> Result<VenueProbabilities, SeriesError> {
        self.validate()?;

        Ok(VenueProbabilities {
            team_a_wins_at_a: fair_probability(self.a_home, self.b_away),
            team_a_wins_at_b: fair_probability(self.a_away, self.b_home),
        })
    }

    /// Bookmaker overround of the venue A market (sum of implied - 1)
    pub fn overround_at_a(&self) -> f64 {
        overround(self.a_home, self.b_away)
    }

    /// Bookmaker overround of the venue B market (sum of implied - 1)
    pub fn overround_at_b(&self) -> f64 {
        overround(self.a_away, self.b_home)
    }
}

/// Venue-conditioned single-game win probabilities for team A
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VenueProbabilities {
    pub team_a_wins_at_a: f64,
    pub team_a_wins_at_b: f64,
}

impl VenueProbabilities {
    /// Probability that team A wins a game hosted by `home`
    pub fn team_a_wins_hosted_by(&self, home: Team) -> f64 {
        match home {
            Team::A => self.team_a_wins_at_a,
            Team::B => self.team_a_wins_at_b,
        }
    }
}

fn fair_probability(odds: f64, opposing_odds: f64) -> f64 {
    let implied = 1.0 / odds;
    let implied_opposing = 1.0 / opposing_odds;
    implied / (implied + implied_opposing)
}

fn overround(odds: f64, opposing_odds: f64) -> f64 {
    1.0 / odds + 1.0 / opposing_odds - 1.0
}

/// Convert a true probability to decimal odds with a margin applied
///
/// # Arguments
/// * `probability` - True probability (0-1)
/// * `margin` - Bookmaker margin as a decimal (0.05 = 5%)
///
/// # Returns
/// `None` when the probability is not positive
///
/// # Examples
/// ```
/// use series_odds::core::odds::probability_to_odds;
/// let odds = probability_to_odds(0.5, 0.0).unwrap();
/// assert!((odds - 2.0).abs() < 1e-12);
/// assert!(probability_to_odds(0.0, 0.05).is_none());
/// ```
pub fn probability_to_odds(probability: f64, margin: f64) -> Option<f64> {
    if probability <= 0.0 {
        return None;
    }

    let implied = probability * (1.0 + margin);
    Some(1.0 / implied)
}

/// Recover the true probability from odds priced with `margin`
pub fn odds_to_probability(odds: f64, margin: f64) -> f64 {
    1.0 / odds / (1.0 + margin)
}

/// Convert a margin given in percent (5.0 = 5%) into a validated decimal
pub fn margin_from_percent(margin_pct: f64) -> Result<f64, SeriesError> {
    let margin = margin_pct / 100.0;
    validate_margin(margin)?;
    Ok(margin)
}
