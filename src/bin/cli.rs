//! Series Odds CLI - Command-line interface for best-of-N series pricing

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use series_odds::core::VenueOdds;
use series_odds::{compute_series, PricedMarket, SeriesReport, SeriesRequest, SeriesResponse};

#[derive(Parser)]
#[command(name = "series-odds")]
#[command(author, version, about = "Best-of-N series pricing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price every market of a series
    Price {
        /// Odds for team A winning at venue A
        #[arg(long)]
        a_home: f64,

        /// Odds for team B winning at venue A
        #[arg(long)]
        b_away: f64,

        /// Odds for team A winning at venue B
        #[arg(long)]
        a_away: f64,

        /// Odds for team B winning at venue B
        #[arg(long)]
        b_home: f64,

        /// Series length (3, 5 or 7)
        #[arg(short, long, default_value = "5")]
        format: i64,

        /// Games already won by team A
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        wins_a: i64,

        /// Games already won by team B
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        wins_b: i64,

        /// Breaks (away wins) already recorded
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        breaks: i64,

        /// Margin applied to displayed odds, in percent
        #[arg(short, long, default_value = "0")]
        margin: f64,

        /// Team A name
        #[arg(long)]
        team_a: Option<String>,

        /// Team B name
        #[arg(long)]
        team_b: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show margin-free venue probabilities for four odds
    Normalize {
        /// Odds for team A winning at venue A
        #[arg(long)]
        a_home: f64,

        /// Odds for team B winning at venue A
        #[arg(long)]
        b_away: f64,

        /// Odds for team A winning at venue B
        #[arg(long)]
        a_away: f64,

        /// Odds for team B winning at venue B
        #[arg(long)]
        b_home: f64,
    },
}

/// Level used when RUST_LOG is unset or unparsable
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if cli.interactive {
        println!("{}", "Series Odds CLI".cyan().bold());
        println!();
        run_interactive()?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Price {
                a_home,
                b_away,
                a_away,
                b_home,
                format,
                wins_a,
                wins_b,
                breaks,
                margin,
                team_a,
                team_b,
                json,
            } => {
                let request = SeriesRequest {
                    odds_a_home: a_home,
                    odds_b_away: b_away,
                    odds_a_away: a_away,
                    odds_b_home: b_home,
                    series_format: format,
                    current_wins_a: wins_a,
                    current_wins_b: wins_b,
                    breaks_so_far: breaks,
                    margin_pct: margin,
                    team_a,
                    team_b,
                };
                price_series(&request, json)?;
            }
            Commands::Normalize {
                a_home,
                b_away,
                a_away,
                b_home,
            } => {
                normalize_odds(VenueOdds::new(a_home, b_away, a_away, b_home))?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn price_series(request: &SeriesRequest, json: bool) -> Result<()> {
    let report = compute_series(request).context("Failed to price series")?;

    if json {
        let body = serde_json::to_string_pretty(&SeriesResponse::from(&report))
            .context("Failed to serialize result")?;
        println!("{}", body);
        return Ok(());
    }

    print_summary(&report);
    for market in report.priced_markets() {
        print_market(&market);
    }

    Ok(())
}

fn normalize_odds(odds: VenueOdds) -> Result<()> {
    let probs = odds.normalize().context("Failed to normalize odds")?;

    println!("{}", "Venue Probabilities:".yellow().bold());
    println!(
        "{:<10} {:>10} {:>10} {:>10}",
        "Venue", "Team A", "Team B", "Overround"
    );
    println!("{}", "-".repeat(44));
    println!(
        "{:<10} {:>9.2}% {:>9.2}% {:>9.2}%",
        "A",
        probs.team_a_wins_at_a * 100.0,
        (1.0 - probs.team_a_wins_at_a) * 100.0,
        odds.overround_at_a() * 100.0
    );
    println!(
        "{:<10} {:>9.2}% {:>9.2}% {:>9.2}%",
        "B",
        probs.team_a_wins_at_b * 100.0,
        (1.0 - probs.team_a_wins_at_b) * 100.0,
        odds.overround_at_b() * 100.0
    );

    Ok(())
}

fn print_summary(report: &SeriesReport) {
    println!(
        "{}: {} vs {} / {} / {}-{}",
        "Pricing".green(),
        report.teams.a,
        report.teams.b,
        report.format,
        report.state.wins_a,
        report.state.wins_b
    );
    println!(
        "P({} wins at venue A) = {:.2}%, P({} wins at venue B) = {:.2}%",
        report.teams.a,
        report.probabilities.team_a_wins_at_a * 100.0,
        report.teams.a,
        report.probabilities.team_a_wins_at_b * 100.0
    );
    if report.margin > 0.0 {
        println!("Display margin: {:.2}%", report.margin * 100.0);
    }
    println!();
}

fn print_market(market: &PricedMarket) {
    println!("{}", market.title.yellow().bold());
    println!("{:<24} {:>12} {:>8}", "Outcome", "Probability", "Odds");
    println!("{}", "-".repeat(46));

    for entry in &market.entries {
        let odds = entry
            .odds
            .map(|o| format!("{:.2}", o))
            .unwrap_or_else(|| "—".to_string());
        println!(
            "{:<24} {:>11.2}% {:>8}",
            entry.label,
            entry.probability * 100.0,
            odds
        );
    }
    println!();
}

fn run_interactive() -> Result<()> {
    let theme = ColorfulTheme::default();

    loop {
        let options = vec!["Price a series", "Normalize odds", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let team_a: String = Input::with_theme(&theme)
                    .with_prompt("Team A name")
                    .default("Team A".to_string())
                    .interact_text()?;
                let team_b: String = Input::with_theme(&theme)
                    .with_prompt("Team B name")
                    .default("Team B".to_string())
                    .interact_text()?;

                let formats = ["3", "5", "7"];
                let format = Select::with_theme(&theme)
                    .with_prompt("Best of")
                    .items(&formats)
                    .default(1)
                    .interact()?;

                let odds = prompt_odds(&theme)?;

                let wins_a: i64 = Input::with_theme(&theme)
                    .with_prompt("Games already won by team A")
                    .default(0)
                    .interact_text()?;
                let wins_b: i64 = Input::with_theme(&theme)
                    .with_prompt("Games already won by team B")
                    .default(0)
                    .interact_text()?;
                let breaks: i64 = Input::with_theme(&theme)
                    .with_prompt("Breaks so far")
                    .default(0)
                    .interact_text()?;
                let margin: f64 = Input::with_theme(&theme)
                    .with_prompt("Display margin (%)")
                    .default(0.0)
                    .interact_text()?;

                let mut request = SeriesRequest::new(odds, 3 + 2 * format as i64);
                request.current_wins_a = wins_a;
                request.current_wins_b = wins_b;
                request.breaks_so_far = breaks;
                request.margin_pct = margin;
                request.team_a = Some(team_a);
                request.team_b = Some(team_b);

                println!();
                // Keep the session alive on bad input
                if let Err(e) = price_series(&request, false) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            1 => {
                let odds = prompt_odds(&theme)?;
                println!();
                if let Err(e) = normalize_odds(odds) {
                    println!("{} {:#}", "Error:".red(), e);
                }
                println!();
            }
            2 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

fn prompt_odds(theme: &ColorfulTheme) -> Result<VenueOdds> {
    let a_home: f64 = Input::with_theme(theme)
        .with_prompt("Odds: team A at venue A")
        .interact_text()?;
    let b_away: f64 = Input::with_theme(theme)
        .with_prompt("Odds: team B at venue A")
        .interact_text()?;
    let a_away: f64 = Input::with_theme(theme)
        .with_prompt("Odds: team A at venue B")
        .interact_text()?;
    let b_home: f64 = Input::with_theme(theme)
        .with_prompt("Odds: team B at venue B")
        .interact_text()?;

    Ok(VenueOdds::new(a_home, b_away, a_away, b_home))
}
