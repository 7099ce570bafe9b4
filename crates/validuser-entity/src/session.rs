//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;
use crate::domain::DomainGraph;

/// A login session as persisted in `dm.dm_user_auth`.
///
/// Sessions are created by the login service. This gateway only refreshes
/// `last_seen` and deletes records whose `last_seen` fell out of the
/// staleness window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The user this session belongs to.
    pub user_id: UserId,
    /// Opaque session identifier (the token's `jti`).
    pub session_id: String,
    /// Last time a validated request used this session.
    pub last_seen: DateTime<Utc>,
}

impl SessionRecord {
    /// Creates a record last seen at `last_seen`.
    pub fn new(user_id: UserId, session_id: impl Into<String>, last_seen: DateTime<Utc>) -> Self {
        Self {
            user_id,
            session_id: session_id.into(),
            last_seen,
        }
    }

    /// Whether this record matches the given user and session.
    pub fn matches(&self, user_id: UserId, session_id: &str) -> bool {
        self.user_id == user_id && self.session_id == session_id
    }
}

/// Identifies the session a request claims to belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLookup {
    /// User id from the token subject.
    pub user_id: UserId,
    /// Session id from the token `jti`.
    pub session_id: String,
    /// Whether the domain graph should be loaded alongside the liveness check.
    pub include_domains: bool,
}

/// Result of one prune / check / refresh unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// No live record matched; nothing was refreshed.
    NotLive,
    /// The session was live and its `last_seen` has been refreshed.
    Live {
        /// Domain data, present only when requested.
        domains: Option<DomainGraph>,
    },
}

impl SessionOutcome {
    /// Whether the session was live.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }
}
