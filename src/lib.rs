// Jar Stack - Core Library
// Savings jars, PDF reports, reminders and invitations, shared by the CLI,
// the terminal UI and the API server.

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod format;
pub mod invitations;
pub mod reminders;
pub mod report;

// Re-export commonly used types
pub use config::{AppConfig, ServerConfig};
pub use db::{
    Event, RecordImport,
    setup_database, load_jars_json, load_records_csv,
    insert_jar, insert_jars, get_all_jars, get_jar, count_jars,
    add_record, import_records, upsert_profile,
    insert_event, get_events_for_entity,
};
pub use entities::{
    Jar, JarNote, TransactionRecord, RecordKind, ContributionPlan,
    Invitation, InvitationStatus, PendingInvitation,
};
pub use error::{JarError, Result};
pub use invitations::{send_invite, pending_invitations, respond, get_invitation};
pub use reminders::{
    NotificationSettings, ReminderTime, ScheduledNotification,
    NotificationScheduler, InMemoryScheduler,
    apply_settings, load_settings, plan_notifications, next_fire_after,
};
pub use report::{
    ReportFile, Document,
    export_full_report, export_jar_report,
    export_full_report_now, export_jar_report_now,
    layout_full_report, layout_jar_report,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
