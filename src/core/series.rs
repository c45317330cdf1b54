//! Series Simulation
//!
//! Enumerates every way the remaining games of a best-of-N series can
//! unfold. Each game is a binary branch (team A or team B wins) weighted by
//! the venue-conditioned probability of the scheduled host, so the leaves
//! of the walk partition the probability mass exactly.
//!
//! A "break" is a game won by the away side of that slot.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::odds::VenueProbabilities;
use super::validation::{validate_series_state, SeriesError};

/// One side of the series; a venue is named after the team it hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

/// Display names for the two teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNames {
    pub a: String,
    pub b: String,
}

impl TeamNames {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Fall back to the default label for a missing or blank name
    pub fn from_optional(a: Option<&str>, b: Option<&str>) -> Self {
        let pick = |name: Option<&str>, default: &str| match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => default.to_string(),
        };
        Self {
            a: pick(a, "Team A"),
            b: pick(b, "Team B"),
        }
    }

    pub fn name(&self, team: Team) -> &str {
        match team {
            Team::A => &self.a,
            Team::B => &self.b,
        }
    }
}

impl Default for TeamNames {
    fn default() -> Self {
        Self::new("Team A", "Team B")
    }
}

/// Supported best-of-N formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum SeriesFormat {
    BestOf3,
    BestOf5,
    BestOf7,
}

impl SeriesFormat {
    /// Number of games in the full series
    pub fn games(self) -> u8 {
        match self {
            SeriesFormat::BestOf3 => 3,
            SeriesFormat::BestOf5 => 5,
            SeriesFormat::BestOf7 => 7,
        }
    }

    /// Wins required to take the series: ceil(games / 2)
    pub fn wins_needed(self) -> u8 {
        self.games().div_ceil(2)
    }

    /// Host of each game slot, in playing order
    pub fn schedule(self) -> &'static [Team] {
        use Team::{A, B};
        match self {
            SeriesFormat::BestOf3 => &[A, A, B],
            SeriesFormat::BestOf5 => &[A, A, B, B, A],
            SeriesFormat::BestOf7 => &[A, A, B, B, A, B, A],
        }
    }

    /// Host of a 1-indexed game slot
    pub fn host_of(self, slot: u8) -> Option<Team> {
        let index = usize::from(slot).checked_sub(1)?;
        self.schedule().get(index).copied()
    }
}

impl TryFrom<i64> for SeriesFormat {
    type Error = SeriesError;

    fn try_from(games: i64) -> Result<Self, Self::Error> {
        match games {
            3 => Ok(SeriesFormat::BestOf3),
            5 => Ok(SeriesFormat::BestOf5),
            7 => Ok(SeriesFormat::BestOf7),
            other => Err(SeriesError::UnsupportedFormat(other)),
        }
    }
}

impl From<SeriesFormat> for u8 {
    fn from(format: SeriesFormat) -> u8 {
        format.games()
    }
}

impl fmt::Display for SeriesFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Best of {}", self.games())
    }
}

/// Games already played before the simulation starts
///
/// Built through [`SeriesState::new`] or
/// [`validate_series_state`](super::validation::validate_series_state) so
/// that the series is still live and the break count is consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeriesState {
    pub wins_a: u8,
    pub wins_b: u8,
    pub breaks: u8,
}

impl SeriesState {
    pub fn new(
        format: SeriesFormat,
        wins_a: u8,
        wins_b: u8,
        breaks: u8,
    ) -> Result<Self, SeriesError> {
        validate_series_state(
            format,
            i64::from(wins_a),
            i64::from(wins_b),
            i64::from(breaks),
            &TeamNames::default(),
        )
    }

    pub fn games_played(&self) -> u8 {
        self.wins_a.saturating_add(self.wins_b)
    }
}

/// One fully resolved completion of the series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalOutcome {
    pub wins_a: u8,
    pub wins_b: u8,
    pub games_played: u8,
    pub probability: f64,
    pub breaks: u8,
}

impl TerminalOutcome {
    /// Series winner, given the wins needed by the format
    pub fn winner(&self, wins_needed: u8) -> Team {
        if self.wins_a == wins_needed {
            Team::A
        } else {
            Team::B
        }
    }

    /// Series margin from team A's side (negative when B won)
    pub fn margin_a(&self) -> i32 {
        i32::from(self.wins_a) - i32::from(self.wins_b)
    }

    pub fn score_label(&self) -> String {
        format!("{}-{}", self.wins_a, self.wins_b)
    }
}

/// Enumerate every terminal outcome reachable from `state`
///
/// Outcomes are produced depth-first with the "team A wins" branch explored
/// first, so the order is deterministic. Probabilities sum to 1.
///
/// # Examples
/// ```
/// use series_odds::core::odds::VenueProbabilities;
/// use series_odds::core::series::{simulate_series, SeriesFormat, SeriesState};
///
/// let probs = VenueProbabilities { team_a_wins_at_a: 0.6, team_a_wins_at_b: 0.4 };
/// let outcomes = simulate_series(&probs, SeriesFormat::BestOf3, &SeriesState::default());
/// let total: f64 = outcomes.iter().map(|o| o.probability).sum();
/// assert!((total - 1.0).abs() < 1e-9);
/// ```
pub fn simulate_series(
    probs: &VenueProbabilities,
    format: SeriesFormat,
    state: &SeriesState,
) -> Vec<TerminalOutcome> {
    let walk = Walk {
        probs,
        format,
        wins_needed: format.wins_needed(),
    };

    let remaining = format.games().saturating_sub(state.games_played());
    let mut outcomes = Vec::with_capacity(1usize << remaining);

    walk.descend(
        state.wins_a,
        state.wins_b,
        state.games_played().saturating_add(1),
        1.0,
        state.breaks,
        &mut outcomes,
    );

    debug!(
        format = format.games(),
        wins_a = state.wins_a,
        wins_b = state.wins_b,
        leaves = outcomes.len(),
        "series simulated"
    );

    outcomes
}

/// Fixed inputs of one enumeration
struct Walk<'a> {
    probs: &'a VenueProbabilities,
    format: SeriesFormat,
    wins_needed: u8,
}

impl Walk<'_> {
    fn descend(
        &self,
        wins_a: u8,
        wins_b: u8,
        slot: u8,
        path_probability: f64,
        breaks: u8,
        outcomes: &mut Vec<TerminalOutcome>,
    ) {
        if wins_a == self.wins_needed || wins_b == self.wins_needed {
            outcomes.push(TerminalOutcome {
                wins_a,
                wins_b,
                games_played: slot - 1,
                probability: path_probability,
                breaks,
            });
            return;
        }

        // Unreachable for a live state: the schedule always has enough slots
        let Some(home) = self.format.host_of(slot) else {
            return;
        };

        let p_a = self.probs.team_a_wins_hosted_by(home);
        let away_win = |winner: Team| breaks.saturating_add(u8::from(winner != home));

        self.descend(
            wins_a + 1,
            wins_b,
            slot + 1,
            path_probability * p_a,
            away_win(Team::A),
            outcomes,
        );
        self.descend(
            wins_a,
            wins_b + 1,
            slot + 1,
            path_probability * (1.0 - p_a),
            away_win(Team::B),
            outcomes,
        );
    }
}
