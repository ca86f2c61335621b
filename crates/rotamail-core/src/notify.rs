//! The on-call notification workflow.
//!
//! Both rotation lists are staged and the message is fully assembled before
//! anything is committed, so a missing list, an empty list, a malformed entry
//! or an unreadable body leaves both lists as they were. Once both rotations
//! are committed the message is sent; a delivery failure at that point does
//! not undo them.

use crate::config::{is_bare_identifier, Config};
use crate::error::{Result, RotamailError};
use crate::mail::{render_subject, MailTransport, Message};
use crate::rotation::{RotationList, StagedRotation};
use crate::smtp;
use tracing::{debug, info};

/// What a successful run rotated and sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub user1: String,
    pub user2: String,
    pub message: Message,
}

/// A notification whose rotations are staged but not yet committed.
#[derive(Debug)]
pub struct Prepared {
    team1: StagedRotation,
    team2: StagedRotation,
    message: Message,
}

impl Prepared {
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Commit both rotations, team 1 first.
    pub fn commit(self) -> Result<Dispatch> {
        let user1 = self.team1.commit()?;
        let user2 = self.team2.commit()?;
        Ok(Dispatch {
            user1,
            user2,
            message: self.message,
        })
    }
}

/// Stage both rotations and assemble the message. Every address in the
/// message is parsed here, so nothing that reaches [`Prepared::commit`] can
/// be rejected as malformed by the transport.
pub fn prepare(config: &Config) -> Result<Prepared> {
    let team1 = RotationList::stage(&config.team1_users)?;
    let team2 = RotationList::stage(&config.team2_users)?;
    check_head(&team1)?;
    check_head(&team2)?;
    let body = config.read_body()?;
    let message = compose(config, team1.head(), team2.head(), body);
    smtp::build_email(&message)?;
    debug!(
        user1 = %team1.head(),
        user2 = %team2.head(),
        to = %message.to_header(),
        "prepared notification"
    );
    Ok(Prepared {
        team1,
        team2,
        message,
    })
}

fn check_head(staged: &StagedRotation) -> Result<()> {
    if is_bare_identifier(staged.head()) {
        return Ok(());
    }
    Err(RotamailError::InvalidEntry {
        path: staged.path().to_path_buf(),
        entry: staged.head().to_string(),
    })
}

/// Build the notification for the given pair of reviewers.
pub fn compose(config: &Config, user1: &str, user2: &str, body: String) -> Message {
    let mut cc = vec![config.address_of(user1)];
    if user2 != user1 {
        cc.push(config.address_of(user2));
    }
    Message {
        from: config.sender_address(),
        to: config.recipient_addresses(),
        cc,
        subject: render_subject(&config.subject, &[user1, user2]),
        body,
    }
}

/// Rotate both lists and send the notification through `transport`.
pub fn run(config: &Config, transport: &impl MailTransport) -> Result<Dispatch> {
    let dispatch = prepare(config)?.commit()?;
    info!(
        user1 = %dispatch.user1,
        user2 = %dispatch.user2,
        "rotated on-call pair"
    );
    transport.send(&dispatch.message)?;
    Ok(dispatch)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
