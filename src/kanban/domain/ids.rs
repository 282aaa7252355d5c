//! Numeric identifier types for the kanban domain.
//!
//! Identifiers are assigned by storage (`BIGSERIAL` columns), so they are thin
//! wrappers over `i64` rather than generated UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a storage-assigned identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying storage value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a bucket (board column).
    BucketId
);

numeric_id!(
    /// Identifier of a project view.
    ViewId
);

numeric_id!(
    /// Identifier of a project.
    ///
    /// Negative values denote saved-filter pseudo projects.
    ProjectId
);

numeric_id!(
    /// Identifier of a task.
    TaskId
);

numeric_id!(
    /// Identifier of a registered user.
    UserId
);

numeric_id!(
    /// Identifier of a link share.
    LinkShareId
);

impl ProjectId {
    /// Returns `true` for saved-filter pseudo projects.
    #[must_use]
    pub const fn is_pseudo(self) -> bool {
        self.0 < 0
    }
}
