//! Project views and their bucket references.

use super::{
    Bucket, BucketId, KanbanDomainError, ParseBucketConfigurationModeError, ParseViewKindError,
    ProjectId, ViewId,
};
use serde::{Deserialize, Serialize};

/// Presentation kind of a project view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Plain task list.
    List,
    /// Timeline chart.
    Gantt,
    /// Spreadsheet-like table.
    Table,
    /// Board with buckets.
    Kanban,
}

impl ViewKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Gantt => "gantt",
            Self::Table => "table",
            Self::Kanban => "kanban",
        }
    }
}

impl TryFrom<&str> for ViewKind {
    type Error = ParseViewKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "gantt" => Ok(Self::Gantt),
            "table" => Ok(Self::Table),
            "kanban" => Ok(Self::Kanban),
            _ => Err(ParseViewKindError(value.to_owned())),
        }
    }
}

/// How bucket membership is decided for a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketConfigurationMode {
    /// The view has no buckets (non-board views).
    #[default]
    None,
    /// Tasks are placed explicitly through task-bucket assignments.
    Manual,
    /// Membership follows saved filter queries.
    Filter,
}

impl BucketConfigurationMode {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Manual => "manual",
            Self::Filter => "filter",
        }
    }
}

impl TryFrom<&str> for BucketConfigurationMode {
    type Error = ParseBucketConfigurationModeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "manual" => Ok(Self::Manual),
            "filter" => Ok(Self::Filter),
            _ => Err(ParseBucketConfigurationModeError(value.to_owned())),
        }
    }
}

/// Bucket references cleared from a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearedReferences {
    /// The default bucket reference was cleared.
    pub default_bucket: bool,
    /// The done bucket reference was cleared.
    pub done_bucket: bool,
}

impl ClearedReferences {
    /// Returns `true` when anything was cleared.
    #[must_use]
    pub const fn any(self) -> bool {
        self.default_bucket || self.done_bucket
    }
}

/// One presentation of a project's tasks.
///
/// Views are owned elsewhere; the engine reads them and only rewrites the
/// default and done bucket references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    id: ViewId,
    project_id: ProjectId,
    title: String,
    kind: ViewKind,
    bucket_configuration_mode: BucketConfigurationMode,
    filter: Option<String>,
    default_bucket_id: Option<BucketId>,
    done_bucket_id: Option<BucketId>,
}

impl BoardView {
    /// Creates a view without bucket references or filter.
    #[must_use]
    pub fn new(id: ViewId, project_id: ProjectId, title: impl Into<String>, kind: ViewKind) -> Self {
        Self {
            id,
            project_id,
            title: title.into(),
            kind,
            bucket_configuration_mode: BucketConfigurationMode::None,
            filter: None,
            default_bucket_id: None,
            done_bucket_id: None,
        }
    }

    /// Creates a manually configured kanban view.
    #[must_use]
    pub fn manual_board(id: ViewId, project_id: ProjectId, title: impl Into<String>) -> Self {
        Self::new(id, project_id, title, ViewKind::Kanban)
            .with_bucket_configuration_mode(BucketConfigurationMode::Manual)
    }

    /// Sets the bucket configuration mode.
    #[must_use]
    pub const fn with_bucket_configuration_mode(mut self, mode: BucketConfigurationMode) -> Self {
        self.bucket_configuration_mode = mode;
        self
    }

    /// Sets the saved filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the stored bucket references without validation.
    ///
    /// Intended for adapters rebuilding persisted views.
    #[must_use]
    pub const fn with_bucket_references(
        mut self,
        default_bucket_id: Option<BucketId>,
        done_bucket_id: Option<BucketId>,
    ) -> Self {
        self.default_bucket_id = default_bucket_id;
        self.done_bucket_id = done_bucket_id;
        self
    }

    /// Returns the view identifier.
    #[must_use]
    pub const fn id(&self) -> ViewId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the view title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the view kind.
    #[must_use]
    pub const fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Returns the bucket configuration mode.
    #[must_use]
    pub const fn bucket_configuration_mode(&self) -> BucketConfigurationMode {
        self.bucket_configuration_mode
    }

    /// Returns the saved filter expression, if any.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Returns the default bucket, if set.
    #[must_use]
    pub const fn default_bucket_id(&self) -> Option<BucketId> {
        self.default_bucket_id
    }

    /// Returns the done bucket, if set.
    #[must_use]
    pub const fn done_bucket_id(&self) -> Option<BucketId> {
        self.done_bucket_id
    }

    /// Returns `true` for kanban views.
    #[must_use]
    pub const fn is_kanban(&self) -> bool {
        matches!(self.kind, ViewKind::Kanban)
    }

    /// Returns `true` when tasks are placed through explicit assignments.
    #[must_use]
    pub const fn is_manual(&self) -> bool {
        matches!(self.bucket_configuration_mode, BucketConfigurationMode::Manual)
    }

    /// Returns `true` when bucket membership is implied by a query rather than
    /// by assignment rows.
    #[must_use]
    pub fn is_filter_derived(&self) -> bool {
        self.project_id.is_pseudo()
            || matches!(self.bucket_configuration_mode, BucketConfigurationMode::Filter)
            || self.filter.as_deref().is_some_and(|filter| !filter.trim().is_empty())
    }

    /// Returns `true` when `bucket_id` is this view's done bucket.
    #[must_use]
    pub fn is_done_bucket(&self, bucket_id: BucketId) -> bool {
        self.done_bucket_id == Some(bucket_id)
    }

    /// Returns `true` when this view receives done-state propagation from a
    /// move made on `origin`.
    #[must_use]
    pub fn accepts_done_propagation(&self, origin: &Self) -> bool {
        self.id != origin.id
            && self.project_id == origin.project_id
            && self.is_kanban()
            && self.is_manual()
            && self.done_bucket_id.is_some()
    }

    /// Points the default bucket reference at `bucket`.
    ///
    /// Board configuration helper for embedders and tests. The engine itself
    /// only clears references, through [`Self::clear_bucket_references`].
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::BucketOutsideView`] when the bucket
    /// belongs to another view.
    pub fn set_default_bucket(&mut self, bucket: &Bucket) -> Result<(), KanbanDomainError> {
        self.ensure_owns(bucket)?;
        self.default_bucket_id = Some(bucket.id());
        Ok(())
    }

    /// Points the done bucket reference at `bucket`.
    ///
    /// Board configuration helper for embedders and tests, like
    /// [`Self::set_default_bucket`].
    ///
    /// # Errors
    ///
    /// Returns [`KanbanDomainError::BucketOutsideView`] when the bucket
    /// belongs to another view.
    pub fn set_done_bucket(&mut self, bucket: &Bucket) -> Result<(), KanbanDomainError> {
        self.ensure_owns(bucket)?;
        self.done_bucket_id = Some(bucket.id());
        Ok(())
    }

    /// Clears every reference to `bucket_id` and reports what changed.
    pub fn clear_bucket_references(&mut self, bucket_id: BucketId) -> ClearedReferences {
        let mut cleared = ClearedReferences::default();
        if self.default_bucket_id == Some(bucket_id) {
            self.default_bucket_id = None;
            cleared.default_bucket = true;
        }
        if self.done_bucket_id == Some(bucket_id) {
            self.done_bucket_id = None;
            cleared.done_bucket = true;
        }
        cleared
    }

    fn ensure_owns(&self, bucket: &Bucket) -> Result<(), KanbanDomainError> {
        if bucket.view_id() == self.id {
            Ok(())
        } else {
            Err(KanbanDomainError::BucketOutsideView {
                bucket_id: bucket.id(),
                view_id: self.id,
            })
        }
    }
}
