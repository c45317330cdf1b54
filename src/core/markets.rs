//! Market Aggregation
//!
//! Folds the weighted terminal outcomes of a series into market tables.
//! Every table is built from its own accumulator and owns its entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::odds::probability_to_odds;
use super::series::{SeriesFormat, Team, TeamNames, TerminalOutcome};

/// Lines priced closer to certainty than this are not surfaced
pub const DEGENERATE_EPSILON: f64 = 0.0001;

/// A single priced outcome of a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    pub label: String,
    pub probability: f64,
}

impl MarketEntry {
    pub fn new(label: impl Into<String>, probability: f64) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }

    /// Decimal odds for display, with `margin` applied
    pub fn odds(&self, margin: f64) -> Option<f64> {
        probability_to_odds(self.probability, margin)
    }
}

/// Ordered outcome label -> probability table for one market
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketTable {
    pub title: String,
    pub entries: Vec<MarketEntry>,
}

impl MarketTable {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, probability: f64) {
        self.entries.push(MarketEntry::new(label, probability));
    }

    /// Probability of the entry with the given label
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.probability)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarketEntry> {
        self.entries.iter()
    }
}

/// All markets derived from one series distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMarkets {
    pub winner: MarketTable,
    pub correct_score: MarketTable,
    pub exact_games: MarketTable,
    pub over_under_games: MarketTable,
    pub total_breaks: MarketTable,
    pub handicap: MarketTable,
}

impl SeriesMarkets {
    /// Tables in presentation order
    pub fn tables(&self) -> [&MarketTable; 6] {
        [
            &self.winner,
            &self.correct_score,
            &self.exact_games,
            &self.over_under_games,
            &self.total_breaks,
            &self.handicap,
        ]
    }
}

/// Build every market table from the terminal outcomes of a series
pub fn aggregate_markets(
    outcomes: &[TerminalOutcome],
    format: SeriesFormat,
    names: &TeamNames,
) -> SeriesMarkets {
    let wins_needed = format.wins_needed();

    let mut winner = [0.0f64; 2];
    // First-seen order, so equal probabilities keep the order they were reached in
    let mut scores: Vec<(String, f64)> = Vec::new();
    let mut games: BTreeMap<u8, f64> = BTreeMap::new();
    let mut breaks: BTreeMap<u8, f64> = BTreeMap::new();

    for outcome in outcomes {
        let slot = match outcome.winner(wins_needed) {
            Team::A => 0,
            Team::B => 1,
        };
        winner[slot] += outcome.probability;
        let label = outcome.score_label();
        match scores.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, probability)) => *probability += outcome.probability,
            None => scores.push((label, outcome.probability)),
        }
        *games.entry(outcome.games_played).or_default() += outcome.probability;
        *breaks.entry(outcome.breaks).or_default() += outcome.probability;
    }

    let mut winner_table = MarketTable::new("Series Winner");
    winner_table.push(names.name(Team::A), winner[0]);
    winner_table.push(names.name(Team::B), winner[1]);

    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut correct_score = MarketTable::new("Final Score");
    for (label, probability) in scores {
        correct_score.push(label, probability);
    }

    let mut exact_games = MarketTable::new("Exact Number of Games");
    for (&count, &probability) in &games {
        exact_games.push(format!("{} Games", count), probability);
    }

    let over_under_games = over_under_table(&games, format);

    let mut total_breaks = MarketTable::new("Total Number of Breaks");
    for (&count, &probability) in &breaks {
        total_breaks.push(format!("{} Breaks", count), probability);
    }

    let handicap = handicap_table(outcomes, format, names);

    debug!(
        outcomes = outcomes.len(),
        scores = correct_score.len(),
        over_under = over_under_games.len(),
        handicap = handicap.len(),
        "markets aggregated"
    );

    SeriesMarkets {
        winner: winner_table,
        correct_score,
        exact_games,
        over_under_games,
        total_breaks,
        handicap,
    }
}

fn is_tradeable(probability: f64) -> bool {
    probability > DEGENERATE_EPSILON && probability < 1.0 - DEGENERATE_EPSILON
}

/// Probability that more than `threshold` games are played
pub fn over_probability(games: &BTreeMap<u8, f64>, threshold: f64) -> f64 {
    games
        .iter()
        .filter(|&(&count, _)| f64::from(count) > threshold)
        .map(|(_, &p)| p)
        .sum()
}

fn over_under_table(games: &BTreeMap<u8, f64>, format: SeriesFormat) -> MarketTable {
    let mut table = MarketTable::new("Total Games (Over/Under)");

    // A single possible length leaves nothing to trade
    if games.len() < 2 {
        return table;
    }
    let Some(&min_games) = games.keys().next() else {
        return table;
    };

    for count in min_games..format.games() {
        let threshold = f64::from(count) + 0.5;
        let over = over_probability(games, threshold);
        if is_tradeable(over) {
            table.push(format!("Over {:.1} Games", threshold), over);
            table.push(format!("Under {:.1} Games", threshold), 1.0 - over);
        }
    }

    table
}

/// Candidate handicap lines for a format: ±0.5 up to ±(games / 2), ascending
pub fn handicap_lines(format: SeriesFormat) -> Vec<f64> {
    let top = format.wins_needed();
    let positive: Vec<f64> = (0..top).map(|k| f64::from(k) + 0.5).collect();

    positive
        .iter()
        .rev()
        .map(|&line| -line)
        .chain(positive.iter().copied())
        .collect()
}

/// Probability that `team` beats the series margin threshold `line`
///
/// For team A this is P(wins_a - wins_b > line); team B is symmetric.
pub fn cover_probability(outcomes: &[TerminalOutcome], team: Team, line: f64) -> f64 {
    outcomes
        .iter()
        .filter(|o| {
            let margin = match team {
                Team::A => o.margin_a(),
                Team::B => -o.margin_a(),
            };
            f64::from(margin) > line
        })
        .map(|o| o.probability)
        .sum()
}

fn handicap_table(
    outcomes: &[TerminalOutcome],
    format: SeriesFormat,
    names: &TeamNames,
) -> MarketTable {
    let mut table = MarketTable::new("Series Handicap");

    for line in handicap_lines(format) {
        for team in [Team::A, Team::B] {
            let probability = cover_probability(outcomes, team, line);
            if is_tradeable(probability) {
                table.push(format!("{} {:+.1}", names.name(team), line), probability);
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::odds::VenueProbabilities;
    use crate::core::series::{simulate_series, SeriesState};

    fn markets_for(
        a_at_a: f64,
        a_at_b: f64,
        format: SeriesFormat,
        state: SeriesState,
    ) -> (Vec<TerminalOutcome>, SeriesMarkets) {
        let probs = VenueProbabilities {
            team_a_wins_at_a: a_at_a,
            team_a_wins_at_b: a_at_b,
        };
        let outcomes = simulate_series(&probs, format, &state);
        let markets = aggregate_markets(&outcomes, format, &TeamNames::default());
        (outcomes, markets)
    }

    #[test]
    fn test_tables_sum_to_one() {
        for format in [SeriesFormat::BestOf3, SeriesFormat::BestOf5, SeriesFormat::BestOf7] {
            let (_, markets) = markets_for(0.58, 0.47, format, SeriesState::default());
            assert!((markets.winner.total() - 1.0).abs() < 1e-9);
            assert!((markets.correct_score.total() - 1.0).abs() < 1e-9);
            assert!((markets.exact_games.total() - 1.0).abs() < 1e-9);
            assert!((markets.total_breaks.total() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_winner_has_two_entries() {
        let (_, markets) = markets_for(0.99, 0.99, SeriesFormat::BestOf3, SeriesState::default());
        assert_eq!(markets.winner.len(), 2);
        assert_eq!(markets.winner.entries[0].label, "Team A");
        assert_eq!(markets.winner.entries[1].label, "Team B");
    }

    #[test]
    fn test_even_best_of_five() {
        let (_, markets) = markets_for(0.5, 0.5, SeriesFormat::BestOf5, SeriesState::default());

        assert!((markets.winner.get("Team A").unwrap() - 0.5).abs() < 1e-9);
        assert!((markets.winner.get("Team B").unwrap() - 0.5).abs() < 1e-9);

        // 3-0: 1/8, 3-1: 3/16, 3-2: 6/32
        assert!((markets.correct_score.get("3-0").unwrap() - 0.125).abs() < 1e-12);
        assert!((markets.correct_score.get("3-1").unwrap() - 0.1875).abs() < 1e-12);
        assert!((markets.correct_score.get("3-2").unwrap() - 0.1875).abs() < 1e-12);
        assert!((markets.correct_score.get("0-3").unwrap() - 0.125).abs() < 1e-12);
        assert!(markets.correct_score.get("1-3").unwrap() > 0.0);
        assert_eq!(markets.correct_score.len(), 6);

        assert!((markets.exact_games.get("3 Games").unwrap() - 0.25).abs() < 1e-12);
        assert!((markets.exact_games.get("4 Games").unwrap() - 0.375).abs() < 1e-12);
        assert!((markets.exact_games.get("5 Games").unwrap() - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_correct_score_sorted_descending() {
        let (_, markets) = markets_for(0.7, 0.45, SeriesFormat::BestOf7, SeriesState::default());
        let probs: Vec<f64> = markets.correct_score.iter().map(|e| e.probability).collect();
        for pair in probs.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_correct_score_ties_keep_first_seen_order() {
        let (_, markets) = markets_for(0.5, 0.5, SeriesFormat::BestOf5, SeriesState::default());
        let labels: Vec<&str> = markets.correct_score.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["3-1", "3-2", "2-3", "1-3", "3-0", "0-3"]);
    }

    #[test]
    fn test_count_tables_sorted_ascending() {
        let (_, markets) = markets_for(0.7, 0.45, SeriesFormat::BestOf7, SeriesState::default());

        let labels: Vec<&str> = markets.exact_games.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["4 Games", "5 Games", "6 Games", "7 Games"]);

        let counts: Vec<u32> = markets
            .total_breaks
            .iter()
            .map(|e| e.label.split(' ').next().unwrap().parse().unwrap())
            .collect();
        for pair in counts.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_over_under_lines() {
        let (_, markets) = markets_for(0.5, 0.5, SeriesFormat::BestOf5, SeriesState::default());
        let table = &markets.over_under_games;

        let labels: Vec<&str> = table.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Over 3.5 Games",
                "Under 3.5 Games",
                "Over 4.5 Games",
                "Under 4.5 Games"
            ]
        );
        assert!((table.get("Over 3.5 Games").unwrap() - 0.75).abs() < 1e-12);
        assert!((table.get("Under 4.5 Games").unwrap() - 0.625).abs() < 1e-12);

        for pair in table.entries.chunks(2) {
            assert!((pair[0].probability + pair[1].probability - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_over_under_empty_when_length_fixed() {
        let state = SeriesState::new(SeriesFormat::BestOf5, 2, 2, 0).unwrap();
        let (_, markets) = markets_for(0.6, 0.4, SeriesFormat::BestOf5, state);
        assert_eq!(markets.exact_games.len(), 1);
        assert!(markets.over_under_games.is_empty());
    }

    #[test]
    fn test_over_under_suppresses_degenerate_lines() {
        // A near-certain to sweep: every over line collapses
        let (_, markets) =
            markets_for(0.999_99, 0.999_99, SeriesFormat::BestOf3, SeriesState::default());
        assert!(markets.over_under_games.is_empty());
        assert!(markets.handicap.iter().all(|e| is_tradeable(e.probability)));
    }

    #[test]
    fn test_handicap_lines() {
        assert_eq!(handicap_lines(SeriesFormat::BestOf3), vec![-1.5, -0.5, 0.5, 1.5]);
        assert_eq!(
            handicap_lines(SeriesFormat::BestOf7),
            vec![-3.5, -2.5, -1.5, -0.5, 0.5, 1.5, 2.5, 3.5]
        );
    }

    #[test]
    fn test_handicap_monotonic_and_consistent() {
        let (outcomes, _) = markets_for(0.62, 0.48, SeriesFormat::BestOf7, SeriesState::default());
        let lines = handicap_lines(SeriesFormat::BestOf7);

        for team in [Team::A, Team::B] {
            let probs: Vec<f64> = lines
                .iter()
                .map(|&h| cover_probability(&outcomes, team, h))
                .collect();
            for pair in probs.windows(2) {
                assert!(pair[0] >= pair[1] - 1e-12);
            }
        }

        // Half-point lines cannot push: the two sides of a line partition the mass
        for &h in &lines {
            let a = cover_probability(&outcomes, Team::A, h);
            let b = cover_probability(&outcomes, Team::B, -h);
            assert!((a + b - 1.0).abs() < 1e-9, "line {h}");
            if h > 0.0 {
                assert!(a + cover_probability(&outcomes, Team::B, h) <= 1.0 + 1e-12);
            }
        }
    }

    #[test]
    fn test_handicap_labels() {
        let (outcomes, markets) =
            markets_for(0.6, 0.5, SeriesFormat::BestOf3, SeriesState::default());

        // Entries are keyed by the margin threshold: A winning 2-0 is A beating +1.5
        let sweep = markets.correct_score.get("2-0").unwrap();
        assert!((markets.handicap.get("Team A +1.5").unwrap() - sweep).abs() < 1e-12);

        let a_minus = cover_probability(&outcomes, Team::A, -1.5);
        assert!((markets.handicap.get("Team A -1.5").unwrap() - a_minus).abs() < 1e-12);
        assert!((a_minus - (1.0 - markets.correct_score.get("0-2").unwrap())).abs() < 1e-12);

        // Lines equal to the series winner market are still surfaced
        let a_wins = markets.winner.get("Team A").unwrap();
        assert!((markets.handicap.get("Team A +0.5").unwrap() - a_wins).abs() < 1e-12);

        let b_sweep = markets.correct_score.get("0-2").unwrap();
        assert!((markets.handicap.get("Team B +1.5").unwrap() - b_sweep).abs() < 1e-12);
    }

    #[test]
    fn test_handicap_even_best_of_five() {
        let (_, markets) = markets_for(0.5, 0.5, SeriesFormat::BestOf5, SeriesState::default());

        // P(margin > 1.5) = P(3-0) + P(3-1) = 0.125 + 0.1875
        assert!((markets.handicap.get("Team A +1.5").unwrap() - 0.3125).abs() < 1e-12);
        assert!((markets.handicap.get("Team A -1.5").unwrap() - 0.6875).abs() < 1e-12);
    }

    #[test]
    fn test_entry_odds() {
        let entry = MarketEntry::new("Team A", 0.5);
        assert!((entry.odds(0.0).unwrap() - 2.0).abs() < 1e-12);
        assert!(MarketEntry::new("x", 0.0).odds(0.05).is_none());
    }

    #[test]
    fn test_table_lookup() {
        let mut table = MarketTable::new("t");
        table.push("a", 0.25);
        table.push("b", 0.75);
        assert_eq!(table.get("b"), Some(0.75));
        assert_eq!(table.get("c"), None);
        assert_eq!(table.len(), 2);
    }
}
