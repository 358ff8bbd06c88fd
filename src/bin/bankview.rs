//! CLI binary for browsing a bank account's transaction history.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bankview_rs::aggregate::{Bucket, CategoryTotals};
use bankview_rs::calendar::{MonthKey, ViewerZone};
use bankview_rs::classify::Perspective;
use bankview_rs::client::BankBlockingClient;
use bankview_rs::error::BankViewError;
use bankview_rs::export::export_to_path;
use bankview_rs::format::{format_long_date, format_table_date, format_usd};
use bankview_rs::history::TableRow;
use bankview_rs::models::{AccountNumber, Category, Decimal, NaiveDate, TypeFilter};
use bankview_rs::session::{HistorySession, LoadStatus};
use bankview_rs::source::BlockingTransactionSource;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Environment variable name for the API bearer token.
const TOKEN_ENV: &str = "BANKVIEW_TOKEN";

/// Environment variable name for the API base URL.
const API_URL_ENV: &str = "BANKVIEW_API_URL";

/// Environment variable name for the viewer's time zone.
const TIMEZONE_ENV: &str = "BANKVIEW_TIMEZONE";

/// Bank transaction history CLI: charts-as-tables, history, and export.
#[derive(Debug, Parser)]
#[command(name = "bankview", version, about)]
struct Cli {
    /// API base URL (overrides BANKVIEW_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// IANA time zone for calendar days, or "local" (overrides BANKVIEW_TIMEZONE).
    #[arg(long, global = true, value_name = "ZONE")]
    timezone: Option<String>,
    /// Viewer account number (skips the account lookup).
    #[arg(long, global = true, value_name = "NUMBER")]
    account: Option<String>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Totals per day and category.
    Daily,
    /// Totals per month, or per day within one month.
    Monthly {
        /// Month to break down by day (YYYY-MM).
        #[arg(long, value_parser = parse_month)]
        month: Option<MonthKey>,
    },
    /// Totals per category for one day (default: today).
    Snapshot {
        /// Day to show (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Paginated transaction table.
    History {
        /// Type filter: all, deposit, withdrawal or transfer.
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        filter: TypeFilter,
        /// Page to show (1-based).
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Write every transaction to a CSV file.
    Export {
        /// Destination file.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// List the years that have transactions.
    Years,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a month string in `YYYY-MM` format for clap.
fn parse_month(s: &str) -> Result<MonthKey, String> {
    s.parse::<MonthKey>().map_err(|err| format!("{err}"))
}

/// Parses a history filter for clap.
fn parse_filter(s: &str) -> Result<TypeFilter, String> {
    s.parse::<TypeFilter>().map_err(|err| format!("{err}"))
}

/// Reads a non-empty environment variable.
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|val| !val.is_empty())
}

/// Prints a missing-setting error with a `.env` hint.
fn report_missing(name: &str, what: &str) -> io::Result<()> {
    let mut err = io::stderr().lock();
    writeln!(
        err,
        "{} {} environment variable is not set",
        "error:".red().bold(),
        name.bold()
    )?;
    writeln!(
        err,
        "  {} create a .env file with {}=<{what}>",
        "hint:".cyan(),
        name
    )
}

/// Prints an error line to stderr.
fn report_error(message: &str) -> io::Result<()> {
    writeln!(io::stderr().lock(), "{} {message}", "error:".red().bold())
}

/// Resolves the viewer's perspective from flags and environment.
fn resolve_perspective(cli: &Cli) -> io::Result<Option<Perspective>> {
    let zone_name = cli.timezone.clone().or_else(|| read_env(TIMEZONE_ENV));
    let zone = match zone_name.as_deref().map(str::parse::<ViewerZone>) {
        None => ViewerZone::System,
        Some(Ok(zone)) => zone,
        Some(Err(err)) => {
            report_error(&err.to_string())?;
            return Ok(None);
        }
    };
    let account = cli.account.as_deref().map(AccountNumber::from);
    Ok(Some(Perspective::new(account, zone)))
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let Some(token) = read_env(TOKEN_ENV) else {
        report_missing(TOKEN_ENV, "your_token")?;
        return Ok(ExitCode::FAILURE);
    };
    let Some(base_url) = cli.api_url.clone().or_else(|| read_env(API_URL_ENV)) else {
        report_missing(API_URL_ENV, "api_base_url")?;
        return Ok(ExitCode::FAILURE);
    };
    let Some(perspective) = resolve_perspective(&cli)? else {
        return Ok(ExitCode::FAILURE);
    };

    let client = match BankBlockingClient::builder()
        .token(token)
        .base_url(base_url)
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            report_error(&format!("failed to build client: {err}"))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut session = HistorySession::new(perspective);
    dispatch(&client, &mut session, cli.command)
}

/// Loads the history, then dispatches to the subcommand handler.
fn dispatch<S: BlockingTransactionSource>(
    source: &S,
    session: &mut HistorySession,
    command: Command,
) -> io::Result<ExitCode> {
    if !load(source, session)? {
        return Ok(ExitCode::FAILURE);
    }
    match command {
        Command::Daily => cmd_daily(session),
        Command::Monthly { month } => cmd_monthly(session, month),
        Command::Snapshot { date } => cmd_snapshot(session, date),
        Command::History { filter, page } => cmd_history(session, filter, page),
        Command::Export { output } => cmd_export(session, &output),
        Command::Years => cmd_years(session),
    }
}

/// Fetches the history into `session`, reporting a failure.
///
/// Returns `Ok(false)` if the fetch failed (error already printed).
fn load<S: BlockingTransactionSource>(
    source: &S,
    session: &mut HistorySession,
) -> io::Result<bool> {
    let spinner = make_spinner("Loading transactions...");
    let status = session.refresh_blocking(source);
    spinner.finish_and_clear();

    if status == LoadStatus::Failed {
        let notice = session.notice().unwrap_or("unable to load transactions");
        report_error(notice)?;
        return Ok(false);
    }
    Ok(true)
}

/// Executes the `daily` subcommand.
fn cmd_daily(session: &HistorySession) -> io::Result<ExitCode> {
    print_buckets_table("Daily Totals", &session.daily_breakdown(), |day| {
        format_table_date(*day)
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `monthly` subcommand.
fn cmd_monthly(session: &HistorySession, month: Option<MonthKey>) -> io::Result<ExitCode> {
    match month {
        Some(month) => print_buckets_table(
            &month.label(),
            &session.daily_breakdown_for_month(month),
            |day| format_long_date(*day),
        )?,
        None => print_buckets_table(
            "Monthly Totals",
            &session.monthly_breakdown(),
            |month_key| month_key.label(),
        )?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `snapshot` subcommand.
fn cmd_snapshot(session: &HistorySession, date: Option<NaiveDate>) -> io::Result<ExitCode> {
    let day = date.unwrap_or_else(|| session.perspective().zone.today());
    let totals = session.date_snapshot(Some(day));
    print_snapshot(day, &totals)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `history` subcommand.
fn cmd_history(
    session: &mut HistorySession,
    filter: TypeFilter,
    page: usize,
) -> io::Result<ExitCode> {
    session.set_filter(filter);
    let pages = session.page_count();
    if page != 1 && !session.go_to_page(page) {
        report_error(&format!("page {page} is out of range (1-{})", pages.max(1)))?;
        return Ok(ExitCode::FAILURE);
    }
    print_history_table(&session.rows(), session.view().current_page(), pages)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `export` subcommand.
fn cmd_export(session: &HistorySession, output: &Path) -> io::Result<ExitCode> {
    match export_to_path(session.records(), output) {
        Ok(rows) => {
            writeln!(
                io::stdout().lock(),
                "{} {}",
                "Export complete!".green().bold(),
                format_args!("({rows} transactions written to {})", output.display()).dimmed()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(BankViewError::NothingToExport) => {
            report_error("No transactions available to export.")?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            report_error(&format!("export failed: {err}"))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes the `years` subcommand.
fn cmd_years(session: &HistorySession) -> io::Result<ExitCode> {
    let mut out = io::stdout().lock();
    let years = session.years();
    if years.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
    }
    for year in years {
        writeln!(out, "{year}")?;
    }
    Ok(ExitCode::SUCCESS)
}

// ── Output formatting ────────────────────────────────────────────────

/// Table colour for a category.
const fn category_color(category: Category) -> Color {
    match category {
        Category::Deposit => Color::Green,
        Category::Withdrawal => Color::Red,
        Category::Transfer => Color::Blue,
        Category::Credit => Color::Yellow,
    }
}

/// Amount cell, dimmed when zero.
fn amount_cell(category: Category, amount: Decimal) -> Cell {
    if amount > Decimal::ZERO {
        Cell::new(format_usd(amount)).fg(category_color(category))
    } else {
        Cell::new(format_usd(amount)).fg(Color::DarkGrey)
    }
}

/// Prints one row per bucket with a column per category.
fn print_buckets_table<K>(
    title: &str,
    buckets: &[Bucket<K>],
    label: fn(&K) -> String,
) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if buckets.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    let mut header = vec![Cell::new("Period").fg(Color::Cyan)];
    header.extend(
        Category::ALL
            .iter()
            .map(|category| Cell::new(category.label()).fg(Color::Cyan)),
    );
    _ = table.set_header(header);

    for bucket in buckets {
        let mut row = vec![Cell::new(label(&bucket.key))];
        row.extend(
            bucket
                .totals
                .pairs()
                .map(|(category, amount)| amount_cell(category, amount)),
        );
        _ = table.add_row(row);
    }

    writeln!(
        out,
        "{} {}",
        title.green().bold(),
        format_args!("({})", buckets.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the per-category totals of one day.
fn print_snapshot(day: NaiveDate, totals: &CategoryTotals) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", format_long_date(day).green().bold())?;
    writeln!(out)?;
    if totals.is_empty() {
        writeln!(out, "{}", "No transaction available for this date".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
    ]);
    for (category, amount) in totals.pairs() {
        _ = table.add_row(vec![
            Cell::new(category.label()),
            amount_cell(category, amount),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints one page of the history table.
fn print_history_table(rows: &[TableRow], page: usize, pages: usize) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if rows.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("From").fg(Color::Cyan),
        Cell::new("To").fg(Color::Cyan),
    ]);

    for row in rows {
        let status_cell = Category::ALL
            .iter()
            .find(|category| category.label() == row.status)
            .map_or_else(
                || Cell::new(row.status).fg(Color::DarkGrey),
                |&category| Cell::new(row.status).fg(category_color(category)),
            );
        _ = table.add_row(vec![
            Cell::new(&row.id),
            Cell::new(&row.date),
            status_cell,
            Cell::new(&row.amount),
            Cell::new(&row.source),
            Cell::new(&row.target),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!("(page {page} of {pages})").dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Creates a spinner with the given message.
fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(core::time::Duration::from_millis(80));
    spinner
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // stderr itself may be gone; nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
