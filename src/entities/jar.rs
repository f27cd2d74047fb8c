// 🫙 Jar Entity - a savings goal with its notes and transaction history
//
// Jars are built elsewhere (store, JSON import, HTTP) and handed to the
// report formatter wholesale. Nothing in here mutates on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency symbol used when a jar does not carry one.
pub const DEFAULT_CURRENCY: &str = "$";

// ============================================================================
// RECORD KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Money put into the jar
    Saved,

    /// Money taken out of the jar
    Withdrawn,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Saved => "saved",
            RecordKind::Withdrawn => "withdrawn",
        }
    }

    /// Label used in report lines ("Saved" / "Withdrawn")
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Saved => "Saved",
            RecordKind::Withdrawn => "Withdrawn",
        }
    }

    pub fn sign(&self) -> char {
        match self {
            RecordKind::Saved => '+',
            RecordKind::Withdrawn => '-',
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "saved" => Ok(RecordKind::Saved),
            "withdrawn" => Ok(RecordKind::Withdrawn),
            other => Err(format!("unknown record kind: {other}")),
        }
    }
}

// ============================================================================
// NOTE & TRANSACTION RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JarNote {
    pub id: i64,
    pub text: String,

    /// Display color picked in the app; reports ignore it
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: RecordKind,

    pub amount: f64,
    pub date: DateTime<Utc>,
}

// ============================================================================
// JAR
// ============================================================================

/// A savings goal.
///
/// `notes` and `records` are optional on the wire; an absent list and an
/// empty list render the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jar {
    pub id: i64,
    pub name: String,
    pub target: f64,
    pub saved: f64,

    #[serde(default)]
    pub withdrawn: f64,

    #[serde(default)]
    pub streak: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<JarNote>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<TransactionRecord>>,
}

/// Suggested contributions towards the remaining amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContributionPlan {
    pub daily: f64,
    pub weekly: f64,
    /// Equal to the whole remainder: the month divisor is 1.
    pub monthly: f64,
}

impl Jar {
    pub fn new(id: i64, name: &str, target: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            target,
            saved: 0.0,
            withdrawn: 0.0,
            streak: 0,
            currency: None,
            notes: None,
            records: None,
        }
    }

    /// Currency symbol, falling back to `$`
    pub fn currency_symbol(&self) -> &str {
        self.currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// saved / target × 100.
    ///
    /// Not guarded: a zero target yields NaN (nothing saved) or infinity.
    pub fn progress_percent(&self) -> f64 {
        (self.saved / self.target) * 100.0
    }

    pub fn remaining(&self) -> f64 {
        self.target - self.saved
    }

    pub fn contribution_plan(&self) -> ContributionPlan {
        let remaining = self.remaining();
        ContributionPlan {
            daily: remaining / 30.0,
            weekly: remaining / 4.0,
            monthly: remaining,
        }
    }

    pub fn notes(&self) -> &[JarNote] {
        self.notes.as_deref().unwrap_or(&[])
    }

    pub fn records(&self) -> &[TransactionRecord] {
        self.records.as_deref().unwrap_or(&[])
    }

    pub fn is_complete(&self) -> bool {
        self.target > 0.0 && self.saved >= self.target
    }
}
