//! Core pricing modules

pub mod markets;
pub mod odds;
pub mod series;
pub mod validation;

// Re-export commonly used types
pub use markets::{aggregate_markets, MarketEntry, MarketTable, SeriesMarkets};
pub use odds::{probability_to_odds, VenueOdds, VenueProbabilities};
pub use series::{simulate_series, SeriesFormat, SeriesState, Team, TeamNames, TerminalOutcome};
pub use validation::SeriesError;
