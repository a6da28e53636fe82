//! Bet Tracker CLI - log, settle and review bets from the terminal

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use std::path::PathBuf;

use bet_tracker::core::{apply_boost, implied_probability, settle, to_decimal_odds};
use bet_tracker::dashboard::{history, Dashboard};
use bet_tracker::data::legs::parse_free_text;
use bet_tracker::models::parse_bet_date;
use bet_tracker::{AppConfig, AuthGate, Bet, BetResult, BetStore, NewBet};

#[cfg(feature = "schedule")]
use bet_tracker::schedule::{ScheduleClient, TeamSchedule};
#[cfg(feature = "schedule")]
use indicatif::{ProgressBar, ProgressStyle};

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "bet-tracker")]
#[command(author, version, about = "Shared sports-betting ledger CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to config file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Edit password (prompted for when omitted)
    #[arg(long)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a new bet
    Add {
        /// Game label, e.g. "Caps vs Rangers"
        #[arg(short, long)]
        game: String,

        /// American odds as offered (e.g. -110, +150)
        #[arg(short, long, allow_hyphen_values = true)]
        odds: i32,

        /// Stake
        #[arg(short, long)]
        amount: f64,

        /// Bet date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Legs, comma separated
        #[arg(short, long, default_value = "")]
        legs: String,

        /// Profit boost multiplier (0 = none)
        #[arg(short, long, default_value = "0")]
        boost: f64,

        /// Result (pending, win, loss, void)
        #[arg(short, long, default_value = "pending")]
        result: String,
    },

    /// Set or correct the result of a logged bet
    Settle {
        /// Bet index as shown by `list`
        index: usize,

        /// Result (pending, win, loss, void)
        result: String,
    },

    /// Show bet history, newest first
    List {
        /// Number of bets to show
        #[arg(long, default_value = "20")]
        top: usize,

        /// Only show pending bets
        #[arg(long)]
        pending: bool,
    },

    /// Show totals, record, profit shares and metrics
    Summary,

    /// Show the team's recent and upcoming games
    #[cfg(feature = "schedule")]
    Schedule,

    /// Odds and boost calculator (no ledger access)
    Check {
        /// American odds
        #[arg(short, long, allow_hyphen_values = true)]
        odds: i32,

        /// Stake
        #[arg(short, long, default_value = "100")]
        amount: f64,

        /// Profit boost multiplier
        #[arg(short, long, default_value = "0")]
        boost: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
        .init();

    let cli = Cli::parse();

    println!("{}", format!("Bet Tracker CLI v{}", env!("CARGO_PKG_VERSION")).cyan().bold());
    println!();

    if cli.interactive {
        let config = load_config(&cli)?;
        run_interactive(&config, cli.password.clone())?;
        return Ok(());
    }

    let Some(command) = cli.command.as_ref() else {
        println!("Use --help for usage information or --interactive for interactive mode.");
        return Ok(());
    };

    match command {
        Commands::Check { odds, amount, boost } => {
            check_odds(*odds, *amount, *boost)?;
        }
        Commands::Add {
            game,
            odds,
            amount,
            date,
            legs,
            boost,
            result,
        } => {
            let config = load_config(&cli)?;
            authorize(&config, cli.password.clone())?;

            let date = match date {
                Some(raw) => parse_bet_date(raw)?,
                None => Local::now().date_naive(),
            };
            let new_bet = NewBet {
                date,
                game: game.clone(),
                legs: parse_free_text(legs),
                odds: *odds,
                initial_odds: None,
                boost: *boost,
                amount: *amount,
                result: result.parse()?,
            };
            add_bet(&store(&config), new_bet)?;
        }
        Commands::Settle { index, result } => {
            let config = load_config(&cli)?;
            authorize(&config, cli.password.clone())?;
            settle_bet(&store(&config), *index, result.parse()?)?;
        }
        Commands::List { top, pending } => {
            let config = load_config(&cli)?;
            list_bets(&store(&config), *top, *pending)?;
        }
        Commands::Summary => {
            let config = load_config(&cli)?;
            show_summary(&config)?;
        }
        #[cfg(feature = "schedule")]
        Commands::Schedule => {
            let config = load_config(&cli)?;
            show_schedule(&config)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))
}

fn store(config: &AppConfig) -> BetStore {
    BetStore::new(&config.storage.data_file)
}

/// Check the edit password, prompting when it was not given
fn authorize(config: &AppConfig, password: Option<String>) -> Result<()> {
    let gate = AuthGate::from_config(config);

    let password = match password {
        Some(p) => p,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Edit password")
            .interact()?,
    };

    if !gate.check_password(&password) {
        bail!("Incorrect password");
    }
    Ok(())
}

fn color_result(result: BetResult) -> ColoredString {
    match result {
        BetResult::Win => result.as_str().green(),
        BetResult::Loss => result.as_str().red(),
        BetResult::Void => result.as_str().dimmed(),
        BetResult::Pending => result.as_str().yellow(),
    }
}

fn color_money(value: f64) -> ColoredString {
    let text = format!("{:+.2}", value);
    if value > 0.0 {
        text.green()
    } else if value < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

fn format_odds(odds: i32) -> String {
    format!("{:+}", odds)
}

fn print_bet(index: usize, bet: &Bet) {
    let odds = if bet.is_boosted() {
        format!("{} ({})", format_odds(bet.odds), format_odds(bet.initial_odds))
    } else {
        format_odds(bet.odds)
    };

    println!(
        "{:>4} {:<10} {:<28} {:>14} {:>9.2} {:>8} {:>10}",
        index,
        bet.date,
        truncate(&bet.game, 28),
        odds,
        bet.amount,
        color_result(bet.result),
        color_money(bet.profit)
    );
    if !bet.legs.is_empty() {
        println!("{:>16}{}", "", bet.legs.join(" / ").dimmed());
    }
}

fn check_odds(odds: i32, amount: f64, boost: f64) -> Result<()> {
    let decimal = to_decimal_odds(odds)?;
    let implied = implied_probability(odds)?;

    println!("{}", "Odds check:".yellow().bold());
    println!("  American:     {}", format_odds(odds));
    println!("  Decimal:      {:.3}", decimal);
    println!("  Implied prob: {:.1}%", implied * 100.0);
    println!(
        "  To win:       {:.2} on {:.2}",
        settle(odds, amount, BetResult::Win)?,
        amount
    );

    if boost > 0.0 {
        let boosted = apply_boost(odds, boost)?;
        println!();
        println!("{} x{}", "Boosted".green().bold(), boost);
        println!("  American:     {}", format_odds(boosted));
        println!("  Decimal:      {:.3}", to_decimal_odds(boosted)?);
        println!(
            "  To win:       {:.2} on {:.2}",
            settle(boosted, amount, BetResult::Win)?,
            amount
        );
    }

    Ok(())
}

fn add_bet(store: &BetStore, new_bet: NewBet) -> Result<()> {
    let bet = store
        .append(new_bet)
        .with_context(|| format!("Failed to save bet to {:?}", store.path()))?;

    println!("{}", "Bet saved.".green());
    print_bet(store.load_or_empty().len().saturating_sub(1), &bet);
    Ok(())
}

fn settle_bet(store: &BetStore, index: usize, result: BetResult) -> Result<()> {
    let bet = store
        .update_result(index, result)
        .with_context(|| format!("Failed to settle bet {}", index))?;

    println!("{} bet {} as {}", "Settled".green(), index, color_result(bet.result));
    print_bet(index, &bet);
    Ok(())
}

fn list_bets(store: &BetStore, top: usize, pending_only: bool) -> Result<()> {
    let bets = store
        .load()
        .with_context(|| format!("Failed to load ledger from {:?}", store.path()))?;

    let rows: Vec<_> = history(&bets)
        .into_iter()
        .filter(|b| !pending_only || !b.bet.result.is_settled())
        .take(top)
        .collect();

    if rows.is_empty() {
        println!("{}", "No bets found.".yellow());
        return Ok(());
    }

    println!(
        "{:>4} {:<10} {:<28} {:>14} {:>9} {:>8} {:>10}",
        "#", "Date", "Game", "Odds", "Amount", "Result", "Profit"
    );
    println!("{}", "-".repeat(90));
    for row in &rows {
        print_bet(row.index, &row.bet);
    }
    println!();
    println!("Showing {} of {} bets", rows.len(), bets.len());

    Ok(())
}

fn show_summary(config: &AppConfig) -> Result<()> {
    let bets = store(config).load_or_empty();
    let dash = Dashboard::build(&bets, &config.participants);

    println!("{}", "Summary:".yellow().bold());
    println!("  Bets:         {}", dash.summary.total_bets);
    println!("  Record:       {}", dash.summary.record_display);
    println!("  Pending:      {}", dash.summary.record.pending);
    println!("  Total profit: {}", color_money(dash.summary.total_profit));
    println!();

    println!("{}", "Profit shares:".yellow().bold());
    println!("{:<16} {:>6} {:>10}", "Name", "Units", "Share");
    println!("{}", "-".repeat(34));
    for share in &dash.shares {
        println!(
            "{:<16} {:>6} {:>10}",
            truncate(&share.name, 16),
            share.units,
            color_money(share.share)
        );
    }
    println!();

    let m = &dash.metrics;
    println!("{}", "Metrics (settled win/loss bets):".yellow().bold());
    println!("  Hit rate:      {:.1}%", m.hit_rate * 100.0);
    println!("  Staked:        {:.2}", m.total_staked);
    println!("  ROI:           {:.1}%", m.roi * 100.0);
    match m.profit_factor {
        Some(pf) => println!("  Profit factor: {:.2}", pf),
        None => println!("  Profit factor: {}", "no losses".green()),
    }
    println!("  Avg odds:      {:.3} (decimal)", m.avg_odds);
    println!("  Max drawdown:  {:.2}", m.max_drawdown);

    if let Some(last) = dash.series.last() {
        println!();
        println!(
            "Bankroll curve: {} days, {} through {}",
            dash.series.len(),
            color_money(last.cumulative_profit),
            last.date
        );
    }

    Ok(())
}

#[cfg(feature = "schedule")]
fn show_schedule(config: &AppConfig) -> Result<()> {
    let client = ScheduleClient::new(config.schedule.clone())
        .context("Failed to create schedule client")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Fetching schedule...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let schedule = runtime.block_on(client.fetch_schedule_or_empty());

    pb.finish_and_clear();
    print_schedule(&schedule);
    Ok(())
}

#[cfg(feature = "schedule")]
fn print_schedule(schedule: &TeamSchedule) {
    if let Some(ref warning) = schedule.warning {
        println!("{} {}", "!".yellow(), warning.yellow());
        println!();
    }

    println!("{}", "Recent results:".yellow().bold());
    if schedule.recent.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for game in &schedule.recent {
        println!(
            "  {}  {} vs {}  {}",
            game.start_time.format("%Y-%m-%d"),
            game.home,
            game.away,
            game.scoreline().bold()
        );
    }
    println!();

    println!("{}", "Upcoming:".yellow().bold());
    if schedule.upcoming.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for game in &schedule.upcoming {
        println!(
            "  {}  {} vs {}",
            game.start_time.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            game.home,
            game.away
        );
    }
}

fn run_interactive(config: &AppConfig, password: Option<String>) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let theme = ColorfulTheme::default();
    let ledger = store(config);
    let mut unlocked = false;
    let mut password = password;

    loop {
        let options = vec![
            "Show summary",
            "List bets",
            "Add a bet",
            "Settle a bet",
            "Check odds",
            "Quit",
        ];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        // Editing needs the password once per session
        if matches!(selection, 2 | 3) && !unlocked {
            match authorize(config, password.take()) {
                Ok(()) => unlocked = true,
                Err(e) => {
                    println!("{}", e.to_string().red());
                    println!();
                    continue;
                }
            }
        }

        println!();
        let outcome = match selection {
            0 => show_summary(config),
            1 => list_bets(&ledger, 20, false),
            2 => prompt_new_bet(&theme).and_then(|bet| add_bet(&ledger, bet)),
            3 => prompt_settle(&theme, &ledger),
            4 => prompt_check(&theme),
            _ => {
                println!("Goodbye!");
                break;
            }
        };

        // Bad input should not end the session
        if let Err(e) = outcome {
            println!("{} {:#}", "Error:".red().bold(), e);
        }
        println!();
    }

    Ok(())
}

fn prompt_new_bet(theme: &ColorfulTheme) -> Result<NewBet> {
    let today = Local::now().date_naive().to_string();
    let date: String = Input::with_theme(theme)
        .with_prompt("Date (YYYY-MM-DD)")
        .default(today)
        .interact_text()?;
    let date: NaiveDate = parse_bet_date(&date)?;

    let game: String = Input::with_theme(theme).with_prompt("Game").interact_text()?;

    let legs: String = Input::with_theme(theme)
        .with_prompt("Legs (comma separated)")
        .allow_empty(true)
        .interact_text()?;

    let odds: i32 = Input::with_theme(theme)
        .with_prompt("American odds")
        .interact_text()?;

    let amount: f64 = Input::with_theme(theme)
        .with_prompt("Amount")
        .interact_text()?;

    let boost: f64 = Input::with_theme(theme)
        .with_prompt("Boost multiplier (0 = none)")
        .default(0.0)
        .interact_text()?;

    let results = BetResult::all();
    let labels: Vec<&str> = results.iter().map(|r| r.as_str()).collect();
    let result = Select::with_theme(theme)
        .with_prompt("Result")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(NewBet {
        date,
        game,
        legs: parse_free_text(&legs),
        odds,
        initial_odds: None,
        boost,
        amount,
        result: results[result],
    })
}

fn prompt_settle(theme: &ColorfulTheme, ledger: &BetStore) -> Result<()> {
    let bets = ledger.load_or_empty();
    if bets.is_empty() {
        println!("{}", "No bets to settle.".yellow());
        return Ok(());
    }

    let rows = history(&bets);
    let labels: Vec<String> = rows
        .iter()
        .map(|row| {
            format!(
                "#{} {} {} {} {:.2} [{}]",
                row.index,
                row.bet.date,
                row.bet.game,
                format_odds(row.bet.odds),
                row.bet.amount,
                row.bet.result
            )
        })
        .collect();

    let choice = Select::with_theme(theme)
        .with_prompt("Which bet?")
        .items(&labels)
        .default(0)
        .interact()?;

    let results = BetResult::all();
    let result_labels: Vec<&str> = results.iter().map(|r| r.as_str()).collect();
    let result = Select::with_theme(theme)
        .with_prompt("Result")
        .items(&result_labels)
        .default(1)
        .interact()?;

    settle_bet(ledger, rows[choice].index, results[result])
}

fn prompt_check(theme: &ColorfulTheme) -> Result<()> {
    let odds: i32 = Input::with_theme(theme)
        .with_prompt("American odds")
        .interact_text()?;
    let boost: f64 = Input::with_theme(theme)
        .with_prompt("Boost multiplier (0 = none)")
        .default(0.0)
        .interact_text()?;

    println!();
    check_odds(odds, 100.0, boost)
}

/// Truncate string to max display width
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
