// ⏰ Savings Reminders - weekly local notifications
//
// The user picks weekdays and a time of day. Saving the settings persists
// them, cancels every reminder slot (ids 1..=7) and schedules one weekly
// notification per selected day, numbered in selection order.
//
// Weekday numbers follow the device API: Sunday = 1 … Saturday = 7.

use crate::db::{insert_event, Event};
use crate::error::{JarError, Result};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const REMINDER_TITLE: &str = "Savings Reminder 💰";
pub const REMINDER_BODY: &str = "Don't forget to track your savings today!";

/// Settings keys, shared with the mobile app's preference store
pub const DAYS_KEY: &str = "notificationDays";
pub const TIME_KEY: &str = "notificationTime";

/// Reminder ids are 1..=MAX_REMINDER_ID, one per possible weekday
pub const MAX_REMINDER_ID: i32 = 7;

/// Days in the order the settings screen lists them
pub const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ============================================================================
// WEEKDAYS & TIME
// ============================================================================

/// Sunday = 1 … Saturday = 7
pub fn weekday_number(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8 + 1
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Accepts full or short names in any case ("Friday", "fri").
pub fn parse_day(name: &str) -> Result<Weekday> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| JarError::InvalidSettings(format!("unknown day: {}", name.trim())))
}

/// Time of day for reminders, "HH:MM" on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderTime {
    pub hour: u8,
    pub minute: u8,
}

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(JarError::InvalidSettings(format!(
                "time out of range: {:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || JarError::InvalidSettings(format!("expected HH:MM, got {:?}", s));

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl std::fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    /// Selection order; reminder ids follow it
    pub days: Vec<Weekday>,
    pub time: ReminderTime,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            days: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            time: ReminderTime { hour: 10, minute: 0 },
        }
    }
}

impl NotificationSettings {
    /// Add the day if missing, remove it if present.
    pub fn toggle_day(&mut self, day: Weekday) {
        if let Some(pos) = self.days.iter().position(|d| *d == day) {
            self.days.remove(pos);
        } else {
            self.days.push(day);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.days.is_empty() {
            return Err(JarError::InvalidSettings(
                "Please select at least one day for notifications".to_string(),
            ));
        }
        // One slot per weekday; a repeat would get an id past MAX_REMINDER_ID
        for (index, day) in self.days.iter().enumerate() {
            if self.days[..index].contains(day) {
                return Err(JarError::InvalidSettings(format!(
                    "{} is selected more than once",
                    day_name(*day)
                )));
            }
        }
        Ok(())
    }

    pub fn day_names(&self) -> Vec<&'static str> {
        self.days.iter().map(|d| day_name(*d)).collect()
    }
}

/// Stored settings, falling back to the defaults field by field.
pub fn load_settings(conn: &Connection) -> Result<NotificationSettings> {
    let mut settings = NotificationSettings::default();

    if let Some(raw) = read_setting(conn, DAYS_KEY)? {
        match parse_stored_days(&raw) {
            Ok(days) => settings.days = days,
            Err(e) => warn!(value = %raw, error = %e, "Ignoring stored reminder days"),
        }
    }

    if let Some(raw) = read_setting(conn, TIME_KEY)? {
        match ReminderTime::parse(&raw) {
            Ok(time) => settings.time = time,
            Err(e) => warn!(value = %raw, error = %e, "Ignoring stored reminder time"),
        }
    }

    Ok(settings)
}

pub fn save_settings(conn: &Connection, settings: &NotificationSettings) -> Result<()> {
    let days_json = serde_json::to_string(&settings.day_names())?;
    write_setting(conn, DAYS_KEY, &days_json)?;
    write_setting(conn, TIME_KEY, &settings.time.to_string())?;
    Ok(())
}

fn parse_stored_days(raw: &str) -> Result<Vec<Weekday>> {
    let names: Vec<String> = serde_json::from_str(raw)?;
    names.iter().map(|name| parse_day(name)).collect()
}

fn read_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

fn write_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

// ============================================================================
// NOTIFICATION PLAN
// ============================================================================

/// A weekly notification request as handed to the device API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub id: i32,
    pub title: String,
    pub body: String,
    /// Sunday = 1 … Saturday = 7
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub allow_while_idle: bool,
}

impl ScheduledNotification {
    pub fn day(&self) -> Option<Weekday> {
        ALL_DAYS.iter().copied().find(|d| weekday_number(*d) == self.weekday)
    }
}

/// One reminder per selected day, ids 1..n in selection order.
pub fn plan_notifications(settings: &NotificationSettings) -> Vec<ScheduledNotification> {
    settings
        .days
        .iter()
        .enumerate()
        .map(|(index, day)| ScheduledNotification {
            id: index as i32 + 1,
            title: REMINDER_TITLE.to_string(),
            body: REMINDER_BODY.to_string(),
            weekday: weekday_number(*day),
            hour: settings.time.hour,
            minute: settings.time.minute,
            allow_while_idle: true,
        })
        .collect()
}

/// Next UTC instant strictly after `from` on the reminder's weekday and time.
pub fn next_fire_after(notification: &ScheduledNotification, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let target = notification.day()?;
    let days_ahead = (7 + target.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64)
        % 7;

    let day = from + Duration::days(days_ahead);
    let candidate = Utc
        .with_ymd_and_hms(
            day.year(),
            day.month(),
            day.day(),
            notification.hour as u32,
            notification.minute as u32,
            0,
        )
        .single()?;

    if candidate > from {
        Some(candidate)
    } else {
        // Same weekday, time already passed
        Some(candidate + Duration::days(7))
    }
}

// ============================================================================
// SCHEDULER SEAM
// ============================================================================

/// The device's local-notification API.
pub trait NotificationScheduler {
    fn cancel(&mut self, ids: &[i32]) -> Result<()>;
    fn schedule(&mut self, notifications: &[ScheduledNotification]) -> Result<()>;
}

/// Pending notifications kept in memory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryScheduler {
    pending: BTreeMap<i32, ScheduledNotification>,
    pub cancelled: Vec<i32>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Vec<&ScheduledNotification> {
        self.pending.values().collect()
    }
}

impl NotificationScheduler for InMemoryScheduler {
    fn cancel(&mut self, ids: &[i32]) -> Result<()> {
        for id in ids {
            self.pending.remove(id);
            self.cancelled.push(*id);
        }
        Ok(())
    }

    fn schedule(&mut self, notifications: &[ScheduledNotification]) -> Result<()> {
        for notification in notifications {
            self.pending.insert(notification.id, notification.clone());
        }
        Ok(())
    }
}

/// Validate, persist, and reschedule. Returns the scheduled reminders.
pub fn apply_settings<S: NotificationScheduler>(
    conn: &Connection,
    scheduler: &mut S,
    settings: &NotificationSettings,
) -> Result<Vec<ScheduledNotification>> {
    settings.validate()?;
    save_settings(conn, settings)?;

    let all_ids: Vec<i32> = (1..=MAX_REMINDER_ID).collect();
    scheduler.cancel(&all_ids)?;

    let plan = plan_notifications(settings);
    if !plan.is_empty() {
        scheduler.schedule(&plan)?;
    }

    let event = Event::new(
        "reminders_updated",
        "settings",
        DAYS_KEY,
        serde_json::json!({
            "days": settings.day_names(),
            "time": settings.time.to_string(),
        }),
        "settings",
    );
    let _ = insert_event(conn, &event);

    info!(days = ?settings.day_names(), time = %settings.time, "Reminders scheduled");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::setup_database;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_weekday_numbers() {
        assert_eq!(weekday_number(Weekday::Sun), 1);
        assert_eq!(weekday_number(Weekday::Mon), 2);
        assert_eq!(weekday_number(Weekday::Wed), 4);
        assert_eq!(weekday_number(Weekday::Sat), 7);
    }

    #[test]
    fn test_parse_day_names() {
        assert_eq!(parse_day("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_day(" friday ").unwrap(), Weekday::Fri);
        assert_eq!(parse_day("sun").unwrap(), Weekday::Sun);
        assert!(parse_day("Funday").is_err());
    }

    #[test]
    fn test_reminder_time_parse() {
        assert_eq!(ReminderTime::parse("10:00").unwrap(), ReminderTime { hour: 10, minute: 0 });
        assert_eq!(ReminderTime::parse("7:05").unwrap().to_string(), "07:05");
        assert!(ReminderTime::parse("24:00").is_err());
        assert!(ReminderTime::parse("12:60").is_err());
        assert!(ReminderTime::parse("noon").is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = NotificationSettings::default();
        assert_eq!(settings.day_names(), vec!["Monday", "Wednesday", "Friday"]);
        assert_eq!(settings.time.to_string(), "10:00");
    }

    #[test]
    fn test_toggle_day() {
        let mut settings = NotificationSettings::default();
        settings.toggle_day(Weekday::Wed);
        assert_eq!(settings.days, vec![Weekday::Mon, Weekday::Fri]);
        settings.toggle_day(Weekday::Sun);
        assert_eq!(settings.days, vec![Weekday::Mon, Weekday::Fri, Weekday::Sun]);
    }

    #[test]
    fn test_plan_ids_follow_selection_order() {
        let settings = NotificationSettings {
            days: vec![Weekday::Fri, Weekday::Sun],
            time: ReminderTime::new(9, 30).unwrap(),
        };

        let plan = plan_notifications(&settings);
        assert_eq!(plan.len(), 2);
        assert_eq!((plan[0].id, plan[0].weekday), (1, 6));
        assert_eq!((plan[1].id, plan[1].weekday), (2, 1));
        assert!(plan.iter().all(|n| n.hour == 9 && n.minute == 30 && n.allow_while_idle));
        assert_eq!(plan[0].title, REMINDER_TITLE);
    }

    #[test]
    fn test_next_fire_after() {
        let reminder = ScheduledNotification {
            id: 1,
            title: REMINDER_TITLE.to_string(),
            body: REMINDER_BODY.to_string(),
            weekday: weekday_number(Weekday::Wed),
            hour: 10,
            minute: 0,
            allow_while_idle: true,
        };

        // 2026-10-19 is a Monday
        let monday = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(
            next_fire_after(&reminder, monday),
            Some(Utc.with_ymd_and_hms(2026, 10, 21, 10, 0, 0).unwrap())
        );

        // Same weekday, earlier in the day
        let wednesday_morning = Utc.with_ymd_and_hms(2026, 10, 21, 8, 0, 0).unwrap();
        assert_eq!(
            next_fire_after(&reminder, wednesday_morning),
            Some(Utc.with_ymd_and_hms(2026, 10, 21, 10, 0, 0).unwrap())
        );

        // Exactly at fire time moves a week ahead
        let at_fire = Utc.with_ymd_and_hms(2026, 10, 21, 10, 0, 0).unwrap();
        assert_eq!(
            next_fire_after(&reminder, at_fire),
            Some(Utc.with_ymd_and_hms(2026, 10, 28, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_apply_rejects_empty_days() {
        let conn = setup();
        let mut scheduler = InMemoryScheduler::new();
        let settings = NotificationSettings { days: vec![], time: ReminderTime::new(8, 0).unwrap() };

        let err = apply_settings(&conn, &mut scheduler, &settings).unwrap_err();
        assert!(matches!(err, JarError::InvalidSettings(_)));
        assert!(scheduler.cancelled.is_empty());
        // Nothing persisted
        assert_eq!(load_settings(&conn).unwrap(), NotificationSettings::default());
    }

    #[test]
    fn test_apply_rejects_repeated_days() {
        let conn = setup();
        let mut scheduler = InMemoryScheduler::new();
        apply_settings(&conn, &mut scheduler, &NotificationSettings::default()).unwrap();

        let repeated = NotificationSettings {
            days: vec![Weekday::Mon; 8],
            time: ReminderTime::new(9, 0).unwrap(),
        };
        let err = apply_settings(&conn, &mut scheduler, &repeated).unwrap_err();
        assert!(matches!(err, JarError::InvalidSettings(_)));
        assert_eq!(load_settings(&conn).unwrap(), NotificationSettings::default());

        let friday = NotificationSettings {
            days: vec![Weekday::Fri],
            time: ReminderTime::new(9, 0).unwrap(),
        };
        apply_settings(&conn, &mut scheduler, &friday).unwrap();

        let pending: Vec<(i32, u8)> = scheduler.pending().iter().map(|n| (n.id, n.weekday)).collect();
        assert_eq!(pending, vec![(1, 6)]);
    }

    #[test]
    fn test_plan_never_exceeds_reminder_slots() {
        let settings = NotificationSettings {
            days: ALL_DAYS.to_vec(),
            time: ReminderTime::new(10, 0).unwrap(),
        };
        settings.validate().unwrap();

        let plan = plan_notifications(&settings);
        assert_eq!(plan.len(), 7);
        assert!(plan.iter().all(|n| (1..=MAX_REMINDER_ID).contains(&n.id)));
    }

    #[test]
    fn test_apply_cancels_all_then_schedules() {
        let conn = setup();
        let mut scheduler = InMemoryScheduler::new();

        let first = NotificationSettings::default();
        apply_settings(&conn, &mut scheduler, &first).unwrap();
        assert_eq!(scheduler.pending().len(), 3);

        let second = NotificationSettings {
            days: vec![Weekday::Sat],
            time: ReminderTime::new(18, 15).unwrap(),
        };
        let plan = apply_settings(&conn, &mut scheduler, &second).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(scheduler.cancelled, [1, 2, 3, 4, 5, 6, 7, 1, 2, 3, 4, 5, 6, 7]);
        let pending = scheduler.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].weekday, 7);
        assert_eq!((pending[0].hour, pending[0].minute), (18, 15));
    }

    #[test]
    fn test_settings_persist() {
        let conn = setup();
        let mut scheduler = InMemoryScheduler::new();
        let settings = NotificationSettings {
            days: vec![Weekday::Tue, Weekday::Thu],
            time: ReminderTime::new(7, 45).unwrap(),
        };

        apply_settings(&conn, &mut scheduler, &settings).unwrap();

        assert_eq!(load_settings(&conn).unwrap(), settings);
        assert_eq!(
            read_setting(&conn, DAYS_KEY).unwrap().as_deref(),
            Some(r#"["Tuesday","Thursday"]"#)
        );
        assert_eq!(read_setting(&conn, TIME_KEY).unwrap().as_deref(), Some("07:45"));
    }

    #[test]
    fn test_load_ignores_corrupt_values() {
        let conn = setup();
        write_setting(&conn, DAYS_KEY, "not json").unwrap();
        write_setting(&conn, TIME_KEY, "25:99").unwrap();

        assert_eq!(load_settings(&conn).unwrap(), NotificationSettings::default());
    }
}
