use crate::entities::{Jar, JarNote, RecordKind, TransactionRecord};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

/// Event for the audit trail: every write to a jar, invitation or setting
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

/// One CSV row of `jar_id,type,amount,date`
#[derive(Debug, Clone, Deserialize)]
pub struct RecordImport {
    pub jar_id: i64,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// Deduplication key for a transaction record.
/// Identity is the per-jar record id; this hash only catches repeated imports.
pub fn record_hash(jar_id: i64, kind: RecordKind, amount: f64, date: &DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}{}{}{}", jar_id, kind.as_str(), amount, date.to_rfc3339()));
    format!("{:x}", hasher.finalize())
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Jars and their children
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS jars (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            target REAL NOT NULL,
            saved REAL NOT NULL DEFAULT 0,
            withdrawn REAL NOT NULL DEFAULT 0,
            streak INTEGER NOT NULL DEFAULT 0,
            currency TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS jar_notes (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            id INTEGER NOT NULL,
            jar_id INTEGER NOT NULL REFERENCES jars(id),
            text TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS jar_records (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            id INTEGER NOT NULL,
            jar_id INTEGER NOT NULL REFERENCES jars(id),
            idempotency_hash TEXT UNIQUE NOT NULL,
            kind TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Sharing: profiles and invitations
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS jar_invitations (
            id TEXT PRIMARY KEY,
            jar_id INTEGER NOT NULL REFERENCES jars(id),
            inviter_id TEXT NOT NULL,
            invitee_email TEXT NOT NULL,
            invitee_id TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Key/value preferences (reminder settings)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_notes_jar ON jar_notes(jar_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_records_jar ON jar_records(jar_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_invitations_email ON jar_invitations(invitee_email, status)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// File loaders
// ============================================================================

/// Load jars from a JSON array in the app's wire format.
pub fn load_jars_json(path: &Path) -> Result<Vec<Jar>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read jar file {}", path.display()))?;
    let jars: Vec<Jar> = serde_json::from_str(&raw).context("Failed to parse jar JSON")?;
    Ok(jars)
}

/// Load transaction records from a `jar_id,type,amount,date` CSV.
pub fn load_records_csv(csv_path: &Path) -> Result<Vec<RecordImport>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RecordImport = result.context("Failed to deserialize record")?;
        rows.push(row);
    }

    Ok(rows)
}

// ============================================================================
// Jars
// ============================================================================

/// Insert or replace a jar with its notes; records are appended, skipping
/// ones already stored. Returns the number of new records.
pub fn insert_jar(conn: &Connection, jar: &Jar) -> Result<usize> {
    conn.execute(
        "INSERT INTO jars (id, name, target, saved, withdrawn, streak, currency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            target = excluded.target,
            saved = excluded.saved,
            withdrawn = excluded.withdrawn,
            streak = excluded.streak,
            currency = excluded.currency",
        params![jar.id, jar.name, jar.target, jar.saved, jar.withdrawn, jar.streak, jar.currency],
    )?;

    conn.execute("DELETE FROM jar_notes WHERE jar_id = ?1", params![jar.id])?;
    for note in jar.notes() {
        conn.execute(
            "INSERT INTO jar_notes (id, jar_id, text, color) VALUES (?1, ?2, ?3, ?4)",
            params![note.id, jar.id, note.text, note.color],
        )?;
    }

    let mut inserted = 0;
    for record in jar.records() {
        if insert_record_row(conn, jar.id, record)? {
            inserted += 1;
        }
    }

    debug!(jar_id = jar.id, notes = jar.notes().len(), records = inserted, "Jar stored");
    Ok(inserted)
}

/// Store every jar. Returns the total number of new records.
pub fn insert_jars(conn: &Connection, jars: &[Jar]) -> Result<usize> {
    let mut new_records = 0;
    for jar in jars {
        new_records += insert_jar(conn, jar).with_context(|| format!("Failed to store jar {}", jar.id))?;
    }
    info!(jars = jars.len(), new_records, "Jars imported");
    Ok(new_records)
}

/// Returns false when the record is a duplicate.
fn insert_record_row(conn: &Connection, jar_id: i64, record: &TransactionRecord) -> Result<bool> {
    let hash = record_hash(jar_id, record.kind, record.amount, &record.date);

    let result = conn.execute(
        "INSERT INTO jar_records (id, jar_id, idempotency_hash, kind, amount, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id,
            jar_id,
            hash,
            record.kind.as_str(),
            record.amount,
            record.date.to_rfc3339(),
        ],
    );

    match result {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn load_notes(conn: &Connection, jar_id: i64) -> Result<Vec<JarNote>> {
    let mut stmt = conn.prepare(
        "SELECT id, text, color FROM jar_notes WHERE jar_id = ?1 ORDER BY row_id",
    )?;

    let notes = stmt
        .query_map(params![jar_id], |row| {
            Ok(JarNote {
                id: row.get(0)?,
                text: row.get(1)?,
                color: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(notes)
}

fn load_records(conn: &Connection, jar_id: i64) -> Result<Vec<TransactionRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, amount, date FROM jar_records WHERE jar_id = ?1 ORDER BY row_id",
    )?;

    let records = stmt
        .query_map(params![jar_id], |row| {
            let kind_str: String = row.get(1)?;
            let date_str: String = row.get(3)?;

            Ok(TransactionRecord {
                id: row.get(0)?,
                kind: kind_str
                    .parse()
                    .map_err(|_| rusqlite::Error::InvalidColumnType(1, kind_str.clone(), rusqlite::types::Type::Text))?,
                amount: row.get(2)?,
                date: DateTime::parse_from_rfc3339(&date_str)
                    .map_err(|_| rusqlite::Error::InvalidColumnType(3, date_str.clone(), rusqlite::types::Type::Text))?
                    .with_timezone(&Utc),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

fn row_to_jar(row: &rusqlite::Row) -> rusqlite::Result<Jar> {
    Ok(Jar {
        id: row.get(0)?,
        name: row.get(1)?,
        target: row.get(2)?,
        saved: row.get(3)?,
        withdrawn: row.get(4)?,
        streak: row.get(5)?,
        currency: row.get(6)?,
        notes: None,
        records: None,
    })
}

fn attach_children(conn: &Connection, mut jar: Jar) -> Result<Jar> {
    let notes = load_notes(conn, jar.id)?;
    let records = load_records(conn, jar.id)?;
    jar.notes = (!notes.is_empty()).then_some(notes);
    jar.records = (!records.is_empty()).then_some(records);
    Ok(jar)
}

pub fn get_all_jars(conn: &Connection) -> Result<Vec<Jar>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, target, saved, withdrawn, streak, currency FROM jars ORDER BY id",
    )?;

    let jars = stmt
        .query_map([], row_to_jar)?
        .collect::<Result<Vec<_>, _>>()?;

    jars.into_iter().map(|jar| attach_children(conn, jar)).collect()
}

pub fn get_jar(conn: &Connection, jar_id: i64) -> Result<Option<Jar>> {
    let jar = conn
        .query_row(
            "SELECT id, name, target, saved, withdrawn, streak, currency FROM jars WHERE id = ?1",
            params![jar_id],
            row_to_jar,
        )
        .optional()?;

    match jar {
        Some(jar) => Ok(Some(attach_children(conn, jar)?)),
        None => Ok(None),
    }
}

pub fn count_jars(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM jars", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// Records
// ============================================================================

/// Append a record to a jar and move its totals.
///
/// Saving adds to `saved`; withdrawing moves the amount from `saved` to
/// `withdrawn` and may not exceed what is saved. Returns `None` when the
/// same record was already stored.
pub fn add_record(
    conn: &Connection,
    jar_id: i64,
    kind: RecordKind,
    amount: f64,
    date: DateTime<Utc>,
) -> Result<Option<TransactionRecord>> {
    if !(amount.is_finite() && amount >= 0.0) {
        bail!("Record amount must be a non-negative number, got {}", amount);
    }

    // Record row, totals and event land together or not at all
    let tx = conn.unchecked_transaction()?;

    let saved: Option<f64> = tx
        .query_row(
            "SELECT saved FROM jars WHERE id = ?1",
            params![jar_id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(saved) = saved else {
        bail!("Jar {} not found", jar_id);
    };
    if kind == RecordKind::Withdrawn && amount > saved {
        bail!("Cannot withdraw {} from jar {}: only {} saved", amount, jar_id, saved);
    }

    let next_id: i64 = tx.query_row(
        "SELECT COALESCE(MAX(id), 0) + 1 FROM jar_records WHERE jar_id = ?1",
        params![jar_id],
        |row| row.get(0),
    )?;

    let record = TransactionRecord {
        id: next_id,
        kind,
        amount,
        date,
    };

    if !insert_record_row(&tx, jar_id, &record)? {
        debug!(jar_id, amount, "Duplicate record skipped");
        return Ok(None);
    }

    match kind {
        RecordKind::Saved => tx.execute(
            "UPDATE jars SET saved = saved + ?1 WHERE id = ?2",
            params![amount, jar_id],
        )?,
        RecordKind::Withdrawn => tx.execute(
            "UPDATE jars SET saved = saved - ?1, withdrawn = withdrawn + ?1 WHERE id = ?2",
            params![amount, jar_id],
        )?,
    };

    let event = Event::new(
        "record_added",
        "jar",
        &jar_id.to_string(),
        serde_json::json!({
            "record_id": record.id,
            "type": kind.as_str(),
            "amount": amount,
        }),
        "jar_store",
    );
    let _ = insert_event(&tx, &event);

    tx.commit()?;
    Ok(Some(record))
}

/// Apply CSV rows in order. Returns (inserted, duplicates).
pub fn import_records(conn: &Connection, rows: &[RecordImport]) -> Result<(usize, usize)> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for row in rows {
        match add_record(conn, row.jar_id, row.kind, row.amount, row.date)? {
            Some(_) => inserted += 1,
            None => duplicates += 1,
        }
    }

    info!(inserted, duplicates, "Records imported");
    Ok((inserted, duplicates))
}

// ============================================================================
// Profiles
// ============================================================================

pub fn upsert_profile(conn: &Connection, user_id: &str, email: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO profiles (id, email) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET email = excluded.email",
        params![user_id, email],
    )?;
    Ok(())
}

// ============================================================================
// Audit trail
// ============================================================================

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Get events for a specific entity, oldest first
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY id",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?
                    .with_timezone(&Utc),
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: serde_json::from_str(&data_json)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?,
                actor: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, 9, 0, 0).unwrap()
    }

    /// Helper function to create a jar with notes and records
    fn create_test_jar(id: i64, name: &str) -> Jar {
        let mut jar = Jar::new(id, name, 1000.0);
        jar.saved = 200.0;
        jar.streak = 2;
        jar.currency = Some("€".to_string());
        jar.notes = Some(vec![
            JarNote { id: 1, text: "first".to_string(), color: "yellow".to_string() },
            JarNote { id: 2, text: "second".to_string(), color: "green".to_string() },
        ]);
        jar.records = Some(vec![
            TransactionRecord { id: 1, kind: RecordKind::Saved, amount: 150.0, date: at(3) },
            TransactionRecord { id: 2, kind: RecordKind::Saved, amount: 50.0, date: at(1) },
        ]);
        jar
    }

    #[test]
    fn test_jar_round_trip_keeps_order() {
        let conn = setup();
        let jar = create_test_jar(1, "Bike");

        insert_jar(&conn, &jar).unwrap();
        let loaded = get_jar(&conn, 1).unwrap().unwrap();

        assert_eq!(loaded, jar);
        assert_eq!(loaded.notes()[0].text, "first");
        // Stored order, not date order
        assert_eq!(loaded.records()[0].date, at(3));
    }

    #[test]
    fn test_jar_without_children_loads_none() {
        let conn = setup();
        insert_jar(&conn, &Jar::new(5, "Bare", 10.0)).unwrap();

        let loaded = get_jar(&conn, 5).unwrap().unwrap();
        assert!(loaded.notes.is_none());
        assert!(loaded.records.is_none());
        assert!(get_jar(&conn, 6).unwrap().is_none());
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let conn = setup();
        let jar = create_test_jar(1, "Bike");

        assert_eq!(insert_jar(&conn, &jar).unwrap(), 2);
        assert_eq!(insert_jar(&conn, &jar).unwrap(), 0);

        let loaded = get_jar(&conn, 1).unwrap().unwrap();
        assert_eq!(loaded.notes().len(), 2);
        assert_eq!(loaded.records().len(), 2);
        assert_eq!(count_jars(&conn).unwrap(), 1);
    }

    #[test]
    fn test_get_all_jars_ordered_by_id() {
        let conn = setup();
        insert_jars(&conn, &[create_test_jar(3, "C"), create_test_jar(1, "A")]).unwrap();

        let names: Vec<String> = get_all_jars(&conn).unwrap().into_iter().map(|j| j.name).collect();
        assert_eq!(names, vec!["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_add_record_moves_totals() {
        let conn = setup();
        insert_jar(&conn, &Jar::new(1, "Fund", 500.0)).unwrap();

        let saved = add_record(&conn, 1, RecordKind::Saved, 120.0, at(1)).unwrap().unwrap();
        assert_eq!(saved.id, 1);
        let withdrawn = add_record(&conn, 1, RecordKind::Withdrawn, 20.0, at(2)).unwrap().unwrap();
        assert_eq!(withdrawn.id, 2);

        let jar = get_jar(&conn, 1).unwrap().unwrap();
        assert_eq!(jar.saved, 100.0);
        assert_eq!(jar.withdrawn, 20.0);
        assert_eq!(jar.records().len(), 2);

        let events = get_events_for_entity(&conn, "jar", "1").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "record_added");
    }

    #[test]
    fn test_add_record_skips_duplicates() {
        let conn = setup();
        insert_jar(&conn, &Jar::new(1, "Fund", 500.0)).unwrap();

        assert!(add_record(&conn, 1, RecordKind::Saved, 10.0, at(4)).unwrap().is_some());
        assert!(add_record(&conn, 1, RecordKind::Saved, 10.0, at(4)).unwrap().is_none());

        let jar = get_jar(&conn, 1).unwrap().unwrap();
        assert_eq!(jar.saved, 10.0);
    }

    #[test]
    fn test_add_record_rejects_bad_input() {
        let conn = setup();
        insert_jar(&conn, &Jar::new(1, "Fund", 500.0)).unwrap();

        assert!(add_record(&conn, 2, RecordKind::Saved, 10.0, at(1)).is_err());
        assert!(add_record(&conn, 1, RecordKind::Saved, -5.0, at(1)).is_err());
        assert!(add_record(&conn, 1, RecordKind::Saved, f64::NAN, at(1)).is_err());
    }

    #[test]
    fn test_add_record_rejects_over_withdrawal() {
        let conn = setup();
        insert_jar(&conn, &Jar::new(1, "Fund", 500.0)).unwrap();

        assert!(add_record(&conn, 1, RecordKind::Withdrawn, 50.0, at(1)).is_err());

        add_record(&conn, 1, RecordKind::Saved, 30.0, at(2)).unwrap();
        assert!(add_record(&conn, 1, RecordKind::Withdrawn, 30.01, at(3)).is_err());

        let jar = get_jar(&conn, 1).unwrap().unwrap();
        assert_eq!(jar.saved, 30.0);
        assert_eq!(jar.withdrawn, 0.0);
        assert_eq!(jar.records().len(), 1);
        assert_eq!(get_events_for_entity(&conn, "jar", "1").unwrap().len(), 1);
    }

    #[test]
    fn test_withdrawing_everything_leaves_zero() {
        let conn = setup();
        insert_jar(&conn, &Jar::new(1, "Fund", 500.0)).unwrap();

        add_record(&conn, 1, RecordKind::Saved, 75.0, at(1)).unwrap();
        add_record(&conn, 1, RecordKind::Withdrawn, 75.0, at(2)).unwrap();

        let jar = get_jar(&conn, 1).unwrap().unwrap();
        assert_eq!(jar.saved, 0.0);
        assert_eq!(jar.withdrawn, 75.0);
        assert!(jar.saved >= 0.0);
    }

    #[test]
    fn test_load_records_csv_and_import() {
        let conn = setup();
        insert_jar(&conn, &Jar::new(1, "Fund", 500.0)).unwrap();

        let path = std::env::temp_dir().join(format!("jarstack-records-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "jar_id,type,amount,date\n\
             1,saved,40,2026-10-01T09:00:00Z\n\
             1,withdrawn,15.5,2026-10-02T09:00:00Z\n\
             1,saved,40,2026-10-01T09:00:00Z\n",
        )
        .unwrap();

        let rows = load_records_csv(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].kind, RecordKind::Withdrawn);

        let (inserted, duplicates) = import_records(&conn, &rows).unwrap();
        assert_eq!((inserted, duplicates), (2, 1));

        let jar = get_jar(&conn, 1).unwrap().unwrap();
        assert_eq!(jar.saved, 24.5);
        assert_eq!(jar.withdrawn, 15.5);
    }

    #[test]
    fn test_load_jars_json() {
        let path = std::env::temp_dir().join(format!("jarstack-jars-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"id": 1, "name": "Car", "target": 8000, "saved": 1000},
                {"id": 2, "name": "Trip", "target": 2000, "saved": 50, "currency": "€"}]"#,
        )
        .unwrap();

        let jars = load_jars_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(jars.len(), 2);
        assert_eq!(jars[1].currency_symbol(), "€");
        assert!(load_jars_json(Path::new("/nonexistent/jars.json")).is_err());
    }
}
