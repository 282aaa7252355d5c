//! Bucket aggregate and its validated scalar values.

use super::{BucketId, KanbanDomainError, Principal, ProjectId, ViewId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum bucket title length, matching `VARCHAR(250)`.
const MAX_TITLE_LENGTH: usize = 250;

/// Largest limit representable in the `INTEGER` limit column.
const MAX_LIMIT: u32 = i32::MAX.unsigned_abs();

/// Validated bucket title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketTitle(String);

impl BucketTitle {
    /// Creates a trimmed, non-empty title.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::EmptyBucketTitle`] when nothing remains
    /// after trimming, or [`KanbanDomainError::BucketTitleTooLong`] past 250
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, KanbanDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(KanbanDomainError::EmptyBucketTitle);
        }
        let length = trimmed.chars().count();
        if length > MAX_TITLE_LENGTH {
            return Err(KanbanDomainError::BucketTitleTooLong {
                length,
                max: MAX_TITLE_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketTitle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Work-in-progress limit of a bucket; zero means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketLimit(u32);

impl BucketLimit {
    /// A limit that admits any number of tasks.
    pub const UNLIMITED: Self = Self(0);

    /// Creates a limit.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::BucketLimitTooLarge`] when the value does
    /// not fit the persisted column.
    pub const fn new(value: u32) -> Result<Self, KanbanDomainError> {
        if value > MAX_LIMIT {
            return Err(KanbanDomainError::BucketLimitTooLarge(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw limit.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` when the bucket has no limit.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when a bucket currently holding `occupancy` tasks can
    /// take one more.
    #[must_use]
    pub const fn admits(self, occupancy: u64) -> bool {
        self.is_unlimited() || occupancy < self.0 as u64
    }
}

/// Parameter object for a bucket that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBucket {
    /// View the bucket will belong to.
    pub view_id: ViewId,
    /// Project owning the view.
    pub project_id: ProjectId,
    /// Bucket title.
    pub title: BucketTitle,
    /// Requested position; zero asks for the default position.
    pub position: f64,
    /// Work-in-progress limit.
    pub limit: BucketLimit,
    /// Principal creating the bucket.
    pub created_by: Principal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedBucketData {
    /// Storage-assigned identifier.
    pub id: BucketId,
    /// Owning view.
    pub view_id: ViewId,
    /// Project owning the view.
    pub project_id: ProjectId,
    /// Bucket title.
    pub title: BucketTitle,
    /// Ordering key within the view.
    pub position: f64,
    /// Work-in-progress limit.
    pub limit: BucketLimit,
    /// Creator.
    pub created_by: Principal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A column of one board view.
///
/// A bucket never moves to another view; the owning view is fixed at
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    id: BucketId,
    view_id: ViewId,
    project_id: ProjectId,
    title: BucketTitle,
    position: f64,
    limit: BucketLimit,
    created_by: Principal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Bucket {
    /// Reconstructs a bucket from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBucketData) -> Self {
        Self {
            id: data.id,
            view_id: data.view_id,
            project_id: data.project_id,
            title: data.title,
            position: data.position,
            limit: data.limit,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Builds a stored bucket from its draft and the assigned identifier.
    #[must_use]
    pub fn from_new(id: BucketId, draft: NewBucket) -> Self {
        Self {
            id,
            view_id: draft.view_id,
            project_id: draft.project_id,
            title: draft.title,
            position: draft.position,
            limit: draft.limit,
            created_by: draft.created_by,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        }
    }

    /// Default position for a bucket that was created without one.
    ///
    /// Derived from the storage ID so concurrent creations never need to read
    /// their siblings; the wide gaps leave room for manual reordering.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "positions are approximate ordering keys; IDs stay far below 2^52"
    )]
    pub fn default_position(id: BucketId, spacing: f64) -> f64 {
        id.value() as f64 * spacing
    }

    /// Returns the bucket identifier.
    #[must_use]
    pub const fn id(&self) -> BucketId {
        self.id
    }

    /// Returns the owning view.
    #[must_use]
    pub const fn view_id(&self) -> ViewId {
        self.view_id
    }

    /// Returns the project owning the view.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &BucketTitle {
        &self.title
    }

    /// Returns the ordering key.
    #[must_use]
    pub const fn position(&self) -> f64 {
        self.position
    }

    /// Returns the work-in-progress limit.
    #[must_use]
    pub const fn limit(&self) -> BucketLimit {
        self.limit
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> Principal {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the mutable attributes of the bucket.
    pub fn revise(
        &mut self,
        title: BucketTitle,
        limit: BucketLimit,
        position: f64,
        clock: &impl Clock,
    ) {
        self.title = title;
        self.limit = limit;
        self.position = position;
        self.updated_at = clock.utc();
    }

    /// Moves the bucket to `position` within its view.
    pub fn reposition(&mut self, position: f64, clock: &impl Clock) {
        self.position = position;
        self.updated_at = clock.utc();
    }
}

/// Returns `true` when `position` asks for the default position.
#[must_use]
#[expect(
    clippy::float_cmp,
    reason = "zero is an exact sentinel supplied by callers, not a computed value"
)]
pub fn is_unset_position(position: f64) -> bool {
    position == 0.0
}

/// Validates a caller-supplied position.
///
/// # Errors
///
/// Returns [`KanbanDomainError::InvalidPosition`] for NaN or infinite values.
pub const fn validate_position(position: f64) -> Result<f64, KanbanDomainError> {
    if position.is_finite() {
        Ok(position)
    } else {
        Err(KanbanDomainError::InvalidPosition(position))
    }
}
