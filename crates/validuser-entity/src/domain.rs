//! Domain hierarchy entity model.

use serde::{Deserialize, Serialize};

use crate::DomainId;

/// Status code stored in `dm_domain.status` for active domains.
pub const ACTIVE_STATUS_CODE: &str = "N";

/// Whether a domain participates in hierarchy resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    /// Live domain (`status = 'N'`).
    Active,
    /// Any other status code (deleted, archived, ...).
    Inactive,
}

impl DomainStatus {
    /// Maps a raw `dm_domain.status` code.
    pub fn from_code(code: &str) -> Self {
        if code.trim() == ACTIVE_STATUS_CODE {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// A node of the domain forest (`dm.dm_domain`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainNode {
    /// Domain id.
    pub id: DomainId,
    /// Parent domain id; `None` for a root.
    pub parent_id: Option<DomainId>,
    /// Activity status.
    pub status: DomainStatus,
}

impl DomainNode {
    /// Creates an active node.
    pub fn active(id: DomainId, parent_id: Option<DomainId>) -> Self {
        Self {
            id,
            parent_id,
            status: DomainStatus::Active,
        }
    }

    /// Creates an inactive node.
    pub fn inactive(id: DomainId, parent_id: Option<DomainId>) -> Self {
        Self {
            id,
            parent_id,
            status: DomainStatus::Inactive,
        }
    }

    /// Whether this node participates in hierarchy resolution.
    pub fn is_active(&self) -> bool {
        self.status == DomainStatus::Active
    }

}

/// Everything needed to resolve a user's domain closure, loaded in the
/// same unit of work as the session check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainGraph {
    /// The user's home domain, if any.
    pub home: Option<DomainId>,
    /// Active domain nodes. Inactive nodes are never included.
    pub nodes: Vec<DomainNode>,
}
