// Jar invitations: invite by email, list pending, accept or decline

use crate::db::{insert_event, Event};
use crate::entities::{Invitation, InvitationStatus, PendingInvitation, UNKNOWN_INVITER};
use crate::error::{JarError, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

fn row_to_invitation(row: &rusqlite::Row) -> rusqlite::Result<Invitation> {
    let status: String = row.get(5)?;
    Ok(Invitation {
        id: row.get(0)?,
        jar_id: row.get(1)?,
        inviter_id: row.get(2)?,
        invitee_email: row.get(3)?,
        invitee_id: row.get(4)?,
        status: status
            .parse()
            .map_err(|_| rusqlite::Error::InvalidColumnType(5, status.clone(), rusqlite::types::Type::Text))?,
        created_at: row.get(6)?,
    })
}

/// Invite `email` to contribute to a jar.
pub fn send_invite(conn: &Connection, jar_id: i64, inviter_id: &str, email: &str) -> Result<Invitation> {
    let email = email.trim();
    if email.is_empty() {
        return Err(JarError::InvalidInvitation("email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(JarError::InvalidInvitation(format!("not an email address: {}", email)));
    }

    let jar_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM jars WHERE id = ?1)",
        params![jar_id],
        |row| row.get(0),
    )?;
    if !jar_exists {
        return Err(JarError::JarNotFound { id: jar_id });
    }

    let invitation = Invitation {
        id: uuid::Uuid::new_v4().to_string(),
        jar_id,
        inviter_id: inviter_id.to_string(),
        invitee_email: email.to_string(),
        invitee_id: None,
        status: InvitationStatus::Pending,
        created_at: Utc::now().to_rfc3339(),
    };

    conn.execute(
        "INSERT INTO jar_invitations (id, jar_id, inviter_id, invitee_email, invitee_id, status, created_at)
         VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6)",
        params![
            invitation.id,
            invitation.jar_id,
            invitation.inviter_id,
            invitation.invitee_email,
            invitation.status.as_str(),
            invitation.created_at,
        ],
    )?;

    let event = Event::new(
        "invitation_sent",
        "invitation",
        &invitation.id,
        serde_json::json!({ "jar_id": jar_id, "invitee_email": email }),
        inviter_id,
    );
    let _ = insert_event(conn, &event);

    info!(jar_id, invitee = %email, "Invitation sent");
    Ok(invitation)
}

pub fn get_invitation(conn: &Connection, invitation_id: &str) -> Result<Option<Invitation>> {
    let invitation = conn
        .query_row(
            "SELECT id, jar_id, inviter_id, invitee_email, invitee_id, status, created_at
             FROM jar_invitations WHERE id = ?1",
            params![invitation_id],
            row_to_invitation,
        )
        .optional()?;
    Ok(invitation)
}

/// Pending invitations addressed to this user's email or id, oldest first.
pub fn pending_invitations(conn: &Connection, user_id: &str, email: &str) -> Result<Vec<PendingInvitation>> {
    let mut stmt = conn.prepare(
        "SELECT i.id, i.jar_id, j.name, p.email, i.invitee_email
         FROM jar_invitations i
         JOIN jars j ON j.id = i.jar_id
         LEFT JOIN profiles p ON p.id = i.inviter_id
         WHERE (i.invitee_email = ?1 OR i.invitee_id = ?2)
           AND i.status = 'pending'
         ORDER BY i.created_at, i.rowid",
    )?;

    let invitations = stmt
        .query_map(params![email.trim(), user_id], |row| {
            let inviter_email: Option<String> = row.get(3)?;
            Ok(PendingInvitation {
                id: row.get(0)?,
                jar_id: row.get(1)?,
                jar_name: row.get(2)?,
                inviter_email: inviter_email.unwrap_or_else(|| UNKNOWN_INVITER.to_string()),
                invitee_email: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(invitations)
}

/// Accept or decline a pending invitation on behalf of `user_id`.
pub fn respond(
    conn: &Connection,
    invitation_id: &str,
    user_id: &str,
    status: InvitationStatus,
) -> Result<Invitation> {
    if status == InvitationStatus::Pending {
        return Err(JarError::InvalidInvitation(
            "an invitation can only be accepted or declined".to_string(),
        ));
    }

    let current = get_invitation(conn, invitation_id)?.ok_or_else(|| JarError::InvitationNotFound {
        id: invitation_id.to_string(),
    })?;

    if current.status != InvitationStatus::Pending {
        return Err(JarError::InvalidInvitation(format!(
            "invitation already {}",
            current.status
        )));
    }

    conn.execute(
        "UPDATE jar_invitations SET status = ?1, invitee_id = ?2 WHERE id = ?3",
        params![status.as_str(), user_id, invitation_id],
    )?;

    let event = Event::new(
        &format!("invitation_{}", status),
        "invitation",
        invitation_id,
        serde_json::json!({ "jar_id": current.jar_id }),
        user_id,
    );
    let _ = insert_event(conn, &event);

    info!(invitation = %invitation_id, status = %status, "Invitation answered");

    Ok(Invitation {
        invitee_id: Some(user_id.to_string()),
        status,
        ..current
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_events_for_entity, insert_jar, setup_database, upsert_profile};
    use crate::entities::Jar;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        insert_jar(&conn, &Jar::new(1, "Family Trip", 3000.0)).unwrap();
        insert_jar(&conn, &Jar::new(2, "New Sofa", 900.0)).unwrap();
        upsert_profile(&conn, "owner-1", "owner@example.com").unwrap();
        conn
    }

    #[test]
    fn test_send_invite_requires_email() {
        let conn = setup();
        assert!(matches!(
            send_invite(&conn, 1, "owner-1", "   "),
            Err(JarError::InvalidInvitation(_))
        ));
        assert!(matches!(
            send_invite(&conn, 1, "owner-1", "not-an-email"),
            Err(JarError::InvalidInvitation(_))
        ));
    }

    #[test]
    fn test_send_invite_requires_jar() {
        let conn = setup();
        assert!(matches!(
            send_invite(&conn, 99, "owner-1", "friend@example.com"),
            Err(JarError::JarNotFound { id: 99 })
        ));
    }

    #[test]
    fn test_pending_lists_by_email_with_jar_and_inviter() {
        let conn = setup();
        let sent = send_invite(&conn, 1, "owner-1", " friend@example.com ").unwrap();
        assert_eq!(sent.invitee_email, "friend@example.com");
        assert_eq!(sent.status, InvitationStatus::Pending);

        let pending = pending_invitations(&conn, "friend-9", "friend@example.com").unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].jar_name, "Family Trip");
        assert_eq!(pending[0].inviter_email, "owner@example.com");

        assert!(pending_invitations(&conn, "someone", "other@example.com").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_inviter_falls_back() {
        let conn = setup();
        send_invite(&conn, 2, "ghost", "friend@example.com").unwrap();

        let pending = pending_invitations(&conn, "friend-9", "friend@example.com").unwrap();
        assert_eq!(pending[0].inviter_email, UNKNOWN_INVITER);
    }

    #[test]
    fn test_accept_removes_from_pending() {
        let conn = setup();
        let first = send_invite(&conn, 1, "owner-1", "friend@example.com").unwrap();
        send_invite(&conn, 2, "owner-1", "friend@example.com").unwrap();

        let accepted = respond(&conn, &first.id, "friend-9", InvitationStatus::Accepted).unwrap();
        assert_eq!(accepted.status, InvitationStatus::Accepted);
        assert_eq!(accepted.invitee_id.as_deref(), Some("friend-9"));

        let pending = pending_invitations(&conn, "friend-9", "friend@example.com").unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].jar_name, "New Sofa");

        let stored = get_invitation(&conn, &first.id).unwrap().unwrap();
        assert_eq!(stored.status, InvitationStatus::Accepted);

        let events = get_events_for_entity(&conn, "invitation", &first.id).unwrap();
        let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["invitation_sent", "invitation_accepted"]);
    }

    #[test]
    fn test_pending_matches_invitee_id_after_email_change() {
        let conn = setup();
        let invite = send_invite(&conn, 1, "owner-1", "old@example.com").unwrap();
        conn.execute(
            "UPDATE jar_invitations SET invitee_id = 'friend-9' WHERE id = ?1",
            params![invite.id],
        )
        .unwrap();

        let pending = pending_invitations(&conn, "friend-9", "new@example.com").unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_cannot_answer_twice() {
        let conn = setup();
        let invite = send_invite(&conn, 1, "owner-1", "friend@example.com").unwrap();

        respond(&conn, &invite.id, "friend-9", InvitationStatus::Declined).unwrap();
        let again = respond(&conn, &invite.id, "friend-9", InvitationStatus::Accepted);
        assert!(matches!(again, Err(JarError::InvalidInvitation(_))));
    }

    #[test]
    fn test_respond_rejects_pending_and_unknown() {
        let conn = setup();
        let invite = send_invite(&conn, 1, "owner-1", "friend@example.com").unwrap();

        assert!(matches!(
            respond(&conn, &invite.id, "friend-9", InvitationStatus::Pending),
            Err(JarError::InvalidInvitation(_))
        ));
        assert!(matches!(
            respond(&conn, "missing", "friend-9", InvitationStatus::Accepted),
            Err(JarError::InvitationNotFound { .. })
        ));
    }
}
