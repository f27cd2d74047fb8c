// Single-jar report: details, investment plan, notes, transaction records

use super::layout::{Document, FontStyle, PageWriter};
use super::{DETAIL_X, HEADING_X, LINE_BREAK_MARGIN, NOTES_BREAK_MARGIN, SECTION_BREAK_MARGIN};
use crate::entities::{Jar, TransactionRecord};
use crate::format::{format_amount, format_money, format_percent, numeric_date, short_date, to_fixed};
use chrono::{DateTime, Utc};

/// "3. Oct 5, 2026 - Saved: +$250"
pub fn record_line(index: usize, record: &TransactionRecord, currency: &str) -> String {
    format!(
        "{}. {} - {}: {}{}{}",
        index + 1,
        short_date(&record.date),
        record.kind.label(),
        record.kind.sign(),
        currency,
        format_amount(record.amount)
    )
}

/// Lay out the report for one jar.
pub fn layout_jar_report(jar: &Jar, generated_at: &DateTime<Utc>) -> Document {
    let mut w = PageWriter::new(Default::default());
    let currency = jar.currency_symbol();

    w.set_font(FontStyle::Bold, 22.0);
    w.centered(jar.name.as_str());
    w.advance(10.0);

    w.set_font(FontStyle::Normal, 10.0);
    w.centered(format!("Generated on: {}", numeric_date(generated_at)));
    w.advance(15.0);

    // Jar Details
    w.set_font(FontStyle::Bold, 14.0);
    w.text("Jar Details", HEADING_X);
    w.advance(8.0);

    w.set_font(FontStyle::Normal, 10.0);
    w.text(format!("Progress: {}%", format_percent(jar.progress_percent())), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Saved: {}", format_money(currency, jar.saved)), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Target: {}", format_money(currency, jar.target)), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Withdrawn: {}", format_money(currency, jar.withdrawn)), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Streak: {}", jar.streak), DETAIL_X);
    w.advance(12.0);

    // Investment Plan
    let plan = jar.contribution_plan();

    w.set_font(FontStyle::Bold, 14.0);
    w.text("Investment Plan", HEADING_X);
    w.advance(8.0);

    w.set_font(FontStyle::Normal, 10.0);
    w.text(format!("Daily: {}{}", currency, to_fixed(plan.daily, 2)), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Weekly: {}{}", currency, to_fixed(plan.weekly, 2)), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Monthly: {}{}", currency, to_fixed(plan.monthly, 2)), DETAIL_X);
    w.advance(12.0);

    // Notes, numbered and unwrapped
    if !jar.notes().is_empty() {
        w.set_font(FontStyle::Bold, 14.0);
        w.text("Notes", HEADING_X);
        w.advance(8.0);

        w.set_font(FontStyle::Normal, 10.0);
        for (index, note) in jar.notes().iter().enumerate() {
            w.break_if_below(NOTES_BREAK_MARGIN);
            w.text(format!("{}. {}", index + 1, note.text), DETAIL_X);
            w.advance(6.0);
        }
        w.advance(6.0);
    }

    // Transaction Records
    if !jar.records().is_empty() {
        w.break_if_below(SECTION_BREAK_MARGIN);

        w.set_font(FontStyle::Bold, 14.0);
        w.text("Transaction Records", HEADING_X);
        w.advance(8.0);

        w.set_font(FontStyle::Normal, 10.0);
        for (index, record) in jar.records().iter().enumerate() {
            w.break_if_below(LINE_BREAK_MARGIN);
            w.text(record_line(index, record, currency), DETAIL_X);
            w.advance(6.0);
        }
    }

    w.finish(jar.name.as_str())
}
