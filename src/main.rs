// Jar Stack - command line entry point
// Import jars, export PDF reports, manage invitations and reminders.

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use jarstack::format::{format_money, format_percent};
use jarstack::reminders::{day_name, parse_day, ReminderTime};
use jarstack::{
    apply_settings, count_jars, export_full_report, export_jar_report, get_all_jars, get_jar,
    import_records, insert_jars, load_jars_json, load_records_csv, load_settings,
    next_fire_after, pending_invitations, plan_notifications, respond, send_invite,
    setup_database, AppConfig, InMemoryScheduler, InvitationStatus,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Savings jars: reports, reminders and shared jars
#[derive(Parser)]
#[command(name = "jarstack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Database file (overrides the configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import jars from a JSON array
    Import {
        /// Path to the jars JSON file
        file: PathBuf,
    },

    /// Import transaction records from CSV (jar_id,type,amount,date)
    ImportRecords {
        /// Path to the records CSV file
        file: PathBuf,
    },

    /// List stored jars
    List,

    /// Export a PDF report (all jars, or one with --jar)
    Report {
        /// Only report on this jar
        #[arg(short, long)]
        jar: Option<i64>,

        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Invite someone to contribute to a jar
    Invite {
        #[arg(long)]
        jar: i64,

        /// Inviting user id
        #[arg(long)]
        from: String,

        #[arg(long)]
        email: String,
    },

    /// Show pending invitations for a user
    Invitations {
        #[arg(long)]
        user: String,

        #[arg(long)]
        email: String,
    },

    /// Accept or decline an invitation
    Respond {
        id: String,

        /// accept | decline
        answer: String,

        #[arg(long)]
        user: String,
    },

    /// Show or change reminder settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Print the planned reminders with their next fire time
    Reminders,

    /// Terminal UI (default)
    Ui,
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Set {
        /// Comma separated day names, e.g. Monday,Friday
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<String>>,

        /// HH:MM
        #[arg(long)]
        time: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialise tracing
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    info!(db = %config.database_path.display(), "Configuration loaded");

    let conn = open_database(&config.database_path)?;

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Import { file } => run_import(&conn, &file),
        Commands::ImportRecords { file } => run_import_records(&conn, &file),
        Commands::List => run_list(&conn),
        Commands::Report { jar, out } => {
            let out = out.unwrap_or_else(|| config.output_dir.clone());
            run_report(&conn, jar, &out)
        }
        Commands::Invite { jar, from, email } => {
            let invitation = send_invite(&conn, jar, &from, &email)?;
            println!("✉️  Invitation {} sent to {}", invitation.id, invitation.invitee_email);
            Ok(())
        }
        Commands::Invitations { user, email } => run_invitations(&conn, &user, &email),
        Commands::Respond { id, answer, user } => {
            let status: InvitationStatus = answer.parse().map_err(anyhow::Error::msg)?;
            let invitation = respond(&conn, &id, &user, status)?;
            println!("✓ Invitation {} {}", invitation.id, invitation.status);
            Ok(())
        }
        Commands::Settings { action: SettingsAction::Show } => run_settings_show(&conn),
        Commands::Settings {
            action: SettingsAction::Set { days, time },
        } => run_settings_set(&conn, days, time),
        Commands::Reminders => run_reminders(&conn),
        Commands::Ui => run_ui_mode(&conn, &config),
    }
}

fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

fn run_import(conn: &Connection, file: &Path) -> Result<()> {
    println!("📂 Loading jars from {}...", file.display());
    let jars = load_jars_json(file)?;
    println!("✓ Loaded {} jars", jars.len());

    let new_records = insert_jars(conn, &jars)?;
    let count = count_jars(conn)?;

    println!("💾 Stored {} new records", new_records);
    println!("✓ Database contains {} jars", count);
    Ok(())
}

fn run_import_records(conn: &Connection, file: &Path) -> Result<()> {
    println!("📂 Loading records from {}...", file.display());
    let rows = load_records_csv(file)?;

    let (inserted, duplicates) = import_records(conn, &rows)?;
    println!("✓ Inserted {} records", inserted);
    if duplicates > 0 {
        println!("✓ Duplicates skipped: {}", duplicates);
    }
    Ok(())
}

fn run_list(conn: &Connection) -> Result<()> {
    let jars = get_all_jars(conn)?;
    if jars.is_empty() {
        println!("No jars yet. Run: jarstack import <file.json>");
        return Ok(());
    }

    println!("{:>4}  {:<28} {:>8} {:>14} {:>14} {:>6}", "ID", "Name", "Progress", "Saved", "Target", "Streak");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for jar in &jars {
        let currency = jar.currency_symbol();
        println!(
            "{:>4}  {:<28} {:>7}% {:>14} {:>14} {:>6}",
            jar.id,
            jar.name,
            format_percent(jar.progress_percent()),
            format_money(currency, jar.saved),
            format_money(currency, jar.target),
            jar.streak
        );
    }
    Ok(())
}

fn run_report(conn: &Connection, jar_id: Option<i64>, out: &Path) -> Result<()> {
    let now = Utc::now();

    let report = match jar_id {
        Some(id) => {
            let jar = get_jar(conn, id)?.ok_or_else(|| jarstack::JarError::JarNotFound { id })?;
            export_jar_report(&jar, &now)?
        }
        None => {
            let jars = get_all_jars(conn)?;
            export_full_report(&jars, &now)?
        }
    };

    let path = report.save_to(out)?;
    println!("📄 Report saved: {} ({} pages)", path.display(), report.page_count);
    Ok(())
}

fn run_invitations(conn: &Connection, user: &str, email: &str) -> Result<()> {
    let invitations = pending_invitations(conn, user, email)?;
    if invitations.is_empty() {
        println!("No pending invitations");
        return Ok(());
    }

    for invitation in &invitations {
        println!(
            "✉️  {}  {} (jar {}) from {}",
            invitation.id, invitation.jar_name, invitation.jar_id, invitation.inviter_email
        );
    }
    Ok(())
}

fn run_settings_show(conn: &Connection) -> Result<()> {
    let settings = load_settings(conn)?;
    println!("Days: {}", settings.day_names().join(", "));
    println!("Time: {}", settings.time);
    Ok(())
}

fn run_settings_set(conn: &Connection, days: Option<Vec<String>>, time: Option<String>) -> Result<()> {
    let mut settings = load_settings(conn)?;

    if let Some(days) = days {
        settings.days = days
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(|name| parse_day(name))
            .collect::<jarstack::Result<Vec<_>>>()?;
    }
    if let Some(time) = time {
        settings.time = ReminderTime::parse(&time)?;
    }

    let mut scheduler = InMemoryScheduler::new();
    let plan = apply_settings(conn, &mut scheduler, &settings)?;

    println!("{}", settings_saved_message(plan.len(), &settings.time));
    println!("   Run: jarstack reminders  to see the next fire times");
    Ok(())
}

/// Settings are stored and the plan computed; delivery is up to the device.
fn settings_saved_message(planned: usize, time: &ReminderTime) -> String {
    format!("✓ Settings saved; {} reminders planned at {}", planned, time)
}

fn run_reminders(conn: &Connection) -> Result<()> {
    let settings = load_settings(conn)?;
    let now = Utc::now();

    for notification in plan_notifications(&settings) {
        let day = notification.day().map(day_name).unwrap_or("?");
        match next_fire_after(&notification, now) {
            Some(at) => println!("🔔 #{} {} {:02}:{:02} UTC  next: {}", notification.id, day, notification.hour, notification.minute, at.to_rfc3339()),
            None => println!("🔔 #{} {} {:02}:{:02} UTC", notification.id, day, notification.hour, notification.minute),
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(conn: &Connection, config: &AppConfig) -> Result<()> {
    println!("🖥️  Loading jars...\n");

    let jars = get_all_jars(conn)?;
    println!("✓ Loaded {} jars\n", jars.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(jars, config.output_dir.clone());
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_conn: &Connection, _config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin jarstack-server --features server");
    std::process::exit(1);
}
