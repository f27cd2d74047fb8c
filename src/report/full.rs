// Full report: summary across all jars, then one section per jar

use super::layout::{Document, FontStyle, PageWriter};
use super::metrics::split_text_to_size;
use super::{
    CONTENT_WIDTH_INSET, DETAIL_X, HEADING_X, LINE_BREAK_MARGIN, NOTE_BULLET_X,
    SECTION_BREAK_MARGIN,
};
use crate::entities::{Jar, DEFAULT_CURRENCY};
use crate::format::{format_money, format_percent, numeric_date};
use chrono::{DateTime, Utc};

pub const FULL_REPORT_TITLE: &str = "Financial Freedom Lab - Full Report";

/// Totals shown in the summary block.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub jar_count: usize,
    pub total_saved: f64,
    pub total_target: f64,
}

impl ReportSummary {
    pub fn from_jars(jars: &[Jar]) -> Self {
        Self {
            jar_count: jars.len(),
            total_saved: jars.iter().map(|jar| jar.saved).sum(),
            total_target: jars.iter().map(|jar| jar.target).sum(),
        }
    }

    /// Overall progress with one decimal, "0" when there is no positive target.
    pub fn progress_text(&self) -> String {
        if self.total_target > 0.0 {
            format_percent(self.total_saved / self.total_target * 100.0)
        } else {
            "0".to_string()
        }
    }
}

/// Lay out the full report for `jars` in input order.
pub fn layout_full_report(jars: &[Jar], generated_at: &DateTime<Utc>) -> Document {
    let mut w = PageWriter::new(Default::default());
    let content_width = w.geometry().width - CONTENT_WIDTH_INSET;

    w.set_font(FontStyle::Bold, 22.0);
    w.centered(FULL_REPORT_TITLE);
    w.advance(10.0);

    w.set_font(FontStyle::Normal, 10.0);
    w.centered(format!("Generated on: {}", numeric_date(generated_at)));
    w.advance(15.0);

    // Summary
    let summary = ReportSummary::from_jars(jars);

    w.set_font(FontStyle::Bold, 14.0);
    w.text("Summary", HEADING_X);
    w.advance(8.0);

    w.set_font(FontStyle::Normal, 10.0);
    w.text(format!("Total Jars: {}", summary.jar_count), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Total Saved: {}", format_money(DEFAULT_CURRENCY, summary.total_saved)), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Total Target: {}", format_money(DEFAULT_CURRENCY, summary.total_target)), DETAIL_X);
    w.advance(6.0);
    w.text(format!("Overall Progress: {}%", summary.progress_text()), DETAIL_X);
    w.advance(12.0);

    // One section per jar
    for (index, jar) in jars.iter().enumerate() {
        w.break_if_below(SECTION_BREAK_MARGIN);

        w.set_font(FontStyle::Bold, 12.0);
        w.text(format!("{}. {}", index + 1, jar.name), HEADING_X);
        w.advance(7.0);

        w.set_font(FontStyle::Normal, 10.0);
        let currency = jar.currency_symbol();
        w.text(format!("Progress: {}%", format_percent(jar.progress_percent())), DETAIL_X);
        w.advance(6.0);
        w.text(format!("Saved: {}", format_money(currency, jar.saved)), DETAIL_X);
        w.advance(6.0);
        w.text(format!("Target: {}", format_money(currency, jar.target)), DETAIL_X);
        w.advance(6.0);
        w.text(format!("Withdrawn: {}", format_money(currency, jar.withdrawn)), DETAIL_X);
        w.advance(6.0);
        w.text(format!("Streak: {}", jar.streak), DETAIL_X);
        w.advance(8.0);

        if !jar.notes().is_empty() {
            w.set_style(FontStyle::Bold);
            w.text("Notes:", DETAIL_X);
            w.advance(6.0);
            w.set_style(FontStyle::Normal);

            for note in jar.notes() {
                for line in split_text_to_size(&note.text, content_width, 10.0, FontStyle::Normal) {
                    w.break_if_below(LINE_BREAK_MARGIN);
                    w.text(format!("• {}", line), NOTE_BULLET_X);
                    w.advance(5.0);
                }
            }
            w.advance(3.0);
        }

        w.advance(5.0);
    }

    w.finish(FULL_REPORT_TITLE)
}
