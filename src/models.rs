use serde::{Deserialize, Serialize};

use crate::core::{
    MarketTable, SeriesFormat, SeriesMarkets, SeriesState, TeamNames, VenueOdds,
    VenueProbabilities,
};

/// Series pricing request
///
/// Counters are signed so that negative input is reported as an invalid
/// state rather than rejected by the decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub odds_a_home: f64,
    pub odds_b_away: f64,
    pub odds_a_away: f64,
    pub odds_b_home: f64,
    pub series_format: i64,
    #[serde(default)]
    pub current_wins_a: i64,
    #[serde(default)]
    pub current_wins_b: i64,
    #[serde(default)]
    pub breaks_so_far: i64,
    /// Margin applied to display odds, in percent (5.0 = 5%)
    #[serde(default)]
    pub margin_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_a: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_b: Option<String>,
}

impl SeriesRequest {
    /// Request for a series that has not started, with no display margin
    pub fn new(odds: VenueOdds, series_format: i64) -> Self {
        Self {
            odds_a_home: odds.a_home,
            odds_b_away: odds.b_away,
            odds_a_away: odds.a_away,
            odds_b_home: odds.b_home,
            series_format,
            current_wins_a: 0,
            current_wins_b: 0,
            breaks_so_far: 0,
            margin_pct: 0.0,
            team_a: None,
            team_b: None,
        }
    }

    pub fn odds(&self) -> VenueOdds {
        VenueOdds::new(
            self.odds_a_home,
            self.odds_b_away,
            self.odds_a_away,
            self.odds_b_home,
        )
    }

    pub fn team_names(&self) -> TeamNames {
        TeamNames::from_optional(self.team_a.as_deref(), self.team_b.as_deref())
    }
}

/// Full result of pricing one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub teams: TeamNames,
    pub format: SeriesFormat,
    pub wins_needed: u8,
    pub state: SeriesState,
    pub probabilities: VenueProbabilities,
    pub overround_at_a: f64,
    pub overround_at_b: f64,
    /// Display margin as a decimal (0.05 = 5%)
    pub margin: f64,
    pub markets: SeriesMarkets,
}

impl SeriesReport {
    /// Non-empty markets with display odds attached
    pub fn priced_markets(&self) -> Vec<PricedMarket> {
        self.markets
            .tables()
            .into_iter()
            .filter(|table| !table.is_empty())
            .map(|table| PricedMarket::from_table(table, self.margin))
            .collect()
    }
}

/// Market entry with display odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedEntry {
    pub label: String,
    pub probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odds: Option<f64>,
}

/// Market table with display odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedMarket {
    pub title: String,
    pub entries: Vec<PricedEntry>,
}

impl PricedMarket {
    pub fn from_table(table: &MarketTable, margin: f64) -> Self {
        Self {
            title: table.title.clone(),
            entries: table
                .iter()
                .map(|e| PricedEntry {
                    label: e.label.clone(),
                    probability: e.probability,
                    odds: e.odds(margin),
                })
                .collect(),
        }
    }
}

/// Series pricing response
#[derive(Debug, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub teams: TeamNames,
    pub series_format: SeriesFormat,
    pub wins_needed: u8,
    pub probabilities: VenueProbabilities,
    pub margin: f64,
    pub markets: Vec<PricedMarket>,
}

impl From<&SeriesReport> for SeriesResponse {
    fn from(report: &SeriesReport) -> Self {
        Self {
            teams: report.teams.clone(),
            series_format: report.format,
            wins_needed: report.wins_needed,
            probabilities: report.probabilities,
            margin: report.margin,
            markets: report.priced_markets(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
