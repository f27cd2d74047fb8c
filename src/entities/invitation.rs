// ✉️ Invitation Entity - asking someone to contribute to a jar

use serde::{Deserialize, Serialize};

/// Inviter email shown when the inviter has no profile row
pub const UNKNOWN_INVITER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" | "accept" => Ok(InvitationStatus::Accepted),
            "declined" | "decline" => Ok(InvitationStatus::Declined),
            other => Err(format!("unknown invitation status: {other}")),
        }
    }
}

/// A stored invitation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    /// UUID v4
    pub id: String,
    pub jar_id: i64,
    pub inviter_id: String,
    pub invitee_email: String,
    /// Filled in once the invitee answers
    pub invitee_id: Option<String>,
    pub status: InvitationStatus,
    pub created_at: String,
}

/// A pending invitation as shown to the invitee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingInvitation {
    pub id: String,
    pub jar_id: i64,
    pub jar_name: String,
    pub inviter_email: String,
    pub invitee_email: String,
}
