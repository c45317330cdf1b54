use tracing::info;

use crate::core::odds::margin_from_percent;
use crate::core::validation::validate_series_state;
use crate::core::{aggregate_markets, simulate_series, SeriesError, SeriesFormat};
use crate::models::{SeriesReport, SeriesRequest};

/// Price every series market for a request
///
/// Validation runs in a fixed order (odds, format, series state, margin)
/// and nothing is simulated unless all of it passes.
///
/// # Examples
/// ```
/// use series_odds::core::VenueOdds;
/// use series_odds::{compute_series, SeriesRequest};
///
/// let request = SeriesRequest::new(VenueOdds::new(2.0, 2.0, 2.0, 2.0), 5);
/// let report = compute_series(&request).unwrap();
/// assert!((report.markets.winner.get("Team A").unwrap() - 0.5).abs() < 1e-9);
/// ```
pub fn compute_series(request: &SeriesRequest) -> Result<SeriesReport, SeriesError> {
    let odds = request.odds();
    let probabilities = odds.normalize()?;

    let format = SeriesFormat::try_from(request.series_format)?;
    let teams = request.team_names();
    let state = validate_series_state(
        format,
        request.current_wins_a,
        request.current_wins_b,
        request.breaks_so_far,
        &teams,
    )?;
    let margin = margin_from_percent(request.margin_pct)?;

    let outcomes = simulate_series(&probabilities, format, &state);
    let markets = aggregate_markets(&outcomes, format, &teams);

    info!(
        format = format.games(),
        a_at_a = probabilities.team_a_wins_at_a,
        a_at_b = probabilities.team_a_wins_at_b,
        outcomes = outcomes.len(),
        "series priced"
    );

    Ok(SeriesReport {
        teams,
        format,
        wins_needed: format.wins_needed(),
        state,
        probabilities,
        overround_at_a: odds.overround_at_a(),
        overround_at_b: odds.overround_at_b(),
        margin,
        markets,
    })
}
