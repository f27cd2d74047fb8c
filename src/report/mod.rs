// 📄 Report Export - jars in, PDF artifact out
//
// Two entry points: the full report over every jar, and the single-jar
// report. Layout is pure and deterministic given the generation instant;
// only `render_pdf` touches the PDF library and only `ReportFile::save_to`
// touches the filesystem.
//
// Page-break thresholds (distance from the bottom edge, in mm):
//   60  before a jar section (full report) or the records block (jar report)
//   30  before each numbered note (jar report)
//   20  before each bulleted note line or record line

pub mod full;
pub mod layout;
pub mod metrics;
pub mod pdf;
pub mod single;

use crate::entities::Jar;
use crate::error::Result;
use crate::format::iso_date;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

pub use full::{layout_full_report, ReportSummary, FULL_REPORT_TITLE};
pub use layout::{Document, FontStyle, Page, PageGeometry, PageWriter, TextLine};
pub use pdf::render_pdf;
pub use single::{layout_jar_report, record_line};

/// Section headings
pub const HEADING_X: f32 = 15.0;
/// Metric and list lines
pub const DETAIL_X: f32 = 20.0;
/// Bulleted note lines in the full report
pub const NOTE_BULLET_X: f32 = 25.0;
/// Wrap width is page width minus this
pub const CONTENT_WIDTH_INSET: f32 = 35.0;

pub const SECTION_BREAK_MARGIN: f32 = 60.0;
pub const NOTES_BREAK_MARGIN: f32 = 30.0;
pub const LINE_BREAK_MARGIN: f32 = 20.0;

/// A rendered report and the name it should be saved under.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl ReportFile {
    /// Write the PDF into `dir` (created if missing) and return its path.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;

        info!(
            path = %path.display(),
            size = self.bytes.len(),
            pages = self.page_count,
            "Report written to file"
        );
        Ok(path)
    }
}

/// `Savings_Report_2026-10-19.pdf`
pub fn full_report_filename(generated_at: &DateTime<Utc>) -> String {
    format!("Savings_Report_{}.pdf", iso_date(generated_at))
}

/// `<jar name>_Report_2026-10-19.pdf`; path separators in the name become `_`.
pub fn jar_report_filename(jar: &Jar, generated_at: &DateTime<Utc>) -> String {
    let name: String = jar
        .name
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    format!("{}_Report_{}.pdf", name, iso_date(generated_at))
}

/// Full report over `jars`, in input order.
pub fn export_full_report(jars: &[Jar], generated_at: &DateTime<Utc>) -> Result<ReportFile> {
    let document = layout_full_report(jars, generated_at);
    let bytes = render_pdf(&document)?;

    info!(jars = jars.len(), pages = document.page_count(), "Full report generated");

    Ok(ReportFile {
        filename: full_report_filename(generated_at),
        bytes,
        page_count: document.page_count(),
    })
}

/// Report for a single jar.
pub fn export_jar_report(jar: &Jar, generated_at: &DateTime<Utc>) -> Result<ReportFile> {
    let document = layout_jar_report(jar, generated_at);
    let bytes = render_pdf(&document)?;

    info!(jar_id = jar.id, jar = %jar.name, pages = document.page_count(), "Jar report generated");

    Ok(ReportFile {
        filename: jar_report_filename(jar, generated_at),
        bytes,
        page_count: document.page_count(),
    })
}

/// `export_full_report` stamped with the current time.
pub fn export_full_report_now(jars: &[Jar]) -> Result<ReportFile> {
    export_full_report(jars, &Utc::now())
}

/// `export_jar_report` stamped with the current time.
pub fn export_jar_report_now(jar: &Jar) -> Result<ReportFile> {
    export_jar_report(jar, &Utc::now())
}
