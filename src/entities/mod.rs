// Entity Models
//
// Jars are the savings goals; invitations let other people contribute to them.

pub mod invitation;
pub mod jar;

pub use invitation::{Invitation, InvitationStatus, PendingInvitation, UNKNOWN_INVITER};
pub use jar::{ContributionPlan, Jar, JarNote, RecordKind, TransactionRecord, DEFAULT_CURRENCY};
