// OAuth sign-in session helpers

use crate::error::Result;
use chrono::{DateTime, Utc};
use seospyder_client::models::Profile;
use seospyder_client::{ApiClient, AuthOutcome, ClientError, TaskScope};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Session lifetime: fifteen days.
pub const SESSION_MAX_AGE_SECS: i64 = 15 * 24 * 60 * 60;
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Message posted back by the OAuth popup window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupMessage {
    SessionId(String),
    ProfileReady,
}

impl PopupMessage {
    /// Recognizes `{xid}` and `{xindex: 0}`; anything else is ignored.
    pub fn parse(payload: &Value) -> Option<Self> {
        if let Some(xid) = payload.get("xid").and_then(Value::as_str)
            && !xid.is_empty()
        {
            return Some(PopupMessage::SessionId(xid.to_string()));
        }
        if payload.get("xindex").and_then(Value::as_i64) == Some(0) {
            return Some(PopupMessage::ProfileReady);
        }
        None
    }
}

pub fn session_expiry(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + chrono::Duration::seconds(SESSION_MAX_AGE_SECS)
}

/// Whether a stored session may still be sent.
///
/// A session without an expiry (one passed by hand) is always current; an
/// unreadable expiry is not.
pub fn is_session_current(expires_at: Option<&str>, now: DateTime<Utc>) -> bool {
    let Some(raw) = expires_at else {
        return true;
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(expiry) => expiry.with_timezone(&Utc) > now,
        Err(e) => {
            debug!("Unreadable session expiry {}: {}", raw, e);
            false
        }
    }
}

/// Poll `/api/profile` until the user finishes signing in.
///
/// Returns `Ok(None)` when `attempts` polls pass without a profile.
pub async fn wait_for_profile(
    client: &ApiClient,
    scope: &TaskScope,
    attempts: u32,
    interval: Duration,
) -> Result<Option<Profile>> {
    for attempt in 1..=attempts {
        match scope.run(client.profile()).await {
            Ok(AuthOutcome::Ready(Some(profile))) => {
                info!("Signed in as {}", profile.name);
                return Ok(Some(profile));
            }
            Ok(_) => debug!("No profile yet (attempt {}/{})", attempt, attempts),
            Err(ClientError::Cancelled) => return Err(ClientError::Cancelled.into()),
            Err(e) => debug!("Profile poll failed: {}", e),
        }
        if attempt < attempts {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = scope.cancelled() => return Err(ClientError::Cancelled.into()),
            }
        }
    }
    Ok(None)
}
