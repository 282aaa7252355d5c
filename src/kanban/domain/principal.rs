//! Acting identities and their rendered form.

use super::{KanbanDomainError, LinkShareId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity performing an operation.
///
/// Link shares act on behalf of a project without being users; they are kept
/// distinct here and only collapse into the signed identifier space when
/// persisted or rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Principal {
    /// A registered user.
    User(UserId),
    /// A link share.
    LinkShare(LinkShareId),
}

impl Principal {
    /// Returns the signed storage identifier.
    ///
    /// Users map to their positive ID, link shares to the negated share ID.
    #[must_use]
    pub const fn storage_id(self) -> i64 {
        match self {
            Self::User(id) => id.value(),
            Self::LinkShare(id) => -id.value(),
        }
    }

    /// Reconstructs a principal from its signed storage identifier.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::ZeroPrincipal`] for zero (and for
    /// `i64::MIN`, which has no positive counterpart).
    pub const fn from_storage_id(value: i64) -> Result<Self, KanbanDomainError> {
        if value > 0 {
            return Ok(Self::User(UserId::new(value)));
        }
        match value.checked_neg() {
            Some(share) if share > 0 => Ok(Self::LinkShare(LinkShareId::new(share))),
            _ => Err(KanbanDomainError::ZeroPrincipal),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(formatter, "user:{id}"),
            Self::LinkShare(id) => write!(formatter, "link_share:{id}"),
        }
    }
}

/// Profile data an identity resolver knows about a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Login or share handle.
    pub username: String,
    /// Optional human-readable name.
    pub name: Option<String>,
}

impl Profile {
    /// Creates a profile with a username and no display name.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Rendered identity attached to API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Signed identifier; negative for link shares.
    pub id: i64,
    /// Login or synthesized share handle.
    pub username: String,
    /// Name shown to other users.
    pub display_name: String,
}

impl Identity {
    /// Renders a principal for display.
    ///
    /// Users without a known profile render as `None`. Link shares always
    /// render; an unnamed share takes `link_share_fallback` as its name.
    #[must_use]
    pub fn render(
        principal: Principal,
        profile: Option<&Profile>,
        link_share_fallback: &str,
    ) -> Option<Self> {
        match principal {
            Principal::User(id) => profile.map(|known| Self {
                id: id.value(),
                username: known.username.clone(),
                display_name: known
                    .display_name()
                    .unwrap_or(known.username.as_str())
                    .to_owned(),
            }),
            Principal::LinkShare(id) => Some(Self {
                id: principal.storage_id(),
                username: format!("link-share-{id}"),
                display_name: profile
                    .and_then(Profile::display_name)
                    .unwrap_or(link_share_fallback)
                    .to_owned(),
            }),
        }
    }
}

/// Permission level requested from the permission oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View the project and its boards.
    Read,
    /// Change the project's boards.
    Write,
}

impl Permission {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}
