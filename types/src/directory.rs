//! Directory records: one row of the validator or regular node registry.

use serde::{Deserialize, Serialize};

use crate::Enode;

/// A node registration as published in the fleet directory.
///
/// Validator-registry rows carry no `private_for`; regular-registry rows do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub entity: String,
    pub contacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_for: Option<String>,
    pub enode: Enode,
    pub ip: String,
    pub port: u16,
}

impl DirectoryEntry {
    /// Convenience constructor for a validator-registry row.
    pub fn validator(entity: impl Into<String>, enode: Enode, ip: impl Into<String>, port: u16) -> Self {
        Self {
            entity: entity.into(),
            contacts: Vec::new(),
            private_for: None,
            enode,
            ip: ip.into(),
            port,
        }
    }

    /// Convenience constructor for a regular-registry row.
    pub fn regular(
        entity: impl Into<String>,
        private_for: impl Into<String>,
        enode: Enode,
        ip: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            private_for: Some(private_for.into()),
            ..Self::validator(entity, enode, ip, port)
        }
    }
}
