//! User role vocabulary

use serde::{Deserialize, Serialize};

/// Role of a user in the network.
///
/// Shared by the profile record and by posts, which carry the role the
/// author posted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// An athlete profile
    Athlete,
    /// A coach profile
    Coach,
}

impl Role {
    /// Lowercase label for logging, search, and persisted records
    pub fn label(&self) -> &'static str {
        match self {
            Self::Athlete => "athlete",
            Self::Coach => "coach",
        }
    }
}
