//! Series Odds - best-of-N series pricing from venue odds
//!
//! This library provides:
//! - Margin removal for the two venue-conditioned two-way quotes
//! - Exhaustive enumeration of the remaining games of a best of 3, 5 or 7
//! - Series winner, correct score, exact games, over/under games,
//!   total breaks and series handicap markets
//! - Display odds with a configurable margin
//!
//! # Example
//!
//! ```no_run
//! use series_odds::core::VenueOdds;
//! use series_odds::{compute_series, SeriesRequest};
//!
//! let mut request = SeriesRequest::new(VenueOdds::new(1.65, 2.3, 2.4, 1.6), 7);
//! request.current_wins_a = 2;
//! request.current_wins_b = 1;
//! request.breaks_so_far = 1;
//!
//! let report = compute_series(&request).unwrap();
//! for entry in report.markets.correct_score.iter() {
//!     println!("{}: {:.2}%", entry.label, entry.probability * 100.0);
//! }
//! ```

pub mod core;
pub mod models;
pub mod pricer;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    MarketTable, SeriesError, SeriesFormat, SeriesMarkets, SeriesState, Team, TeamNames,
    TerminalOutcome, VenueOdds, VenueProbabilities,
};
pub use models::{PricedMarket, SeriesReport, SeriesRequest, SeriesResponse};
pub use pricer::compute_series;
