//! Bucket lifecycle: creation, revision, deletion and listing.

use super::{BoardStorage, KanbanError, KanbanResult, wiring::ensure_permission};
use crate::config::KanbanConfig;
use crate::kanban::{
    domain::{
        BoardView, Bucket, BucketId, BucketLimit, BucketTitle, Identity, NewBucket, Permission,
        Principal, Profile, is_unset_position, validate_position,
    },
    ports::{IdentityResolver, PermissionOracle},
};
use mockable::Clock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Request payload for creating a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBucketRequest {
    title: String,
    limit: u32,
    position: f64,
}

impl CreateBucketRequest {
    /// Creates an unlimited bucket request at the default position.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            limit: 0,
            position: 0.0,
        }
    }

    /// Sets the work-in-progress limit; zero means unlimited.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets an explicit position; zero asks for the default position.
    #[must_use]
    pub const fn with_position(mut self, position: f64) -> Self {
        self.position = position;
        self
    }
}

/// Request payload replacing a bucket's mutable attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBucketRequest {
    bucket_id: BucketId,
    title: String,
    limit: u32,
    position: f64,
}

impl UpdateBucketRequest {
    /// Creates a request setting the title, clearing the limit and
    /// restoring the default position.
    #[must_use]
    pub fn new(bucket_id: BucketId, title: impl Into<String>) -> Self {
        Self {
            bucket_id,
            title: title.into(),
            limit: 0,
            position: 0.0,
        }
    }

    /// Sets the work-in-progress limit; zero means unlimited.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the position; zero restores the default position.
    #[must_use]
    pub const fn with_position(mut self, position: f64) -> Self {
        self.position = position;
        self
    }

    /// Returns the addressed bucket.
    #[must_use]
    pub const fn bucket_id(&self) -> BucketId {
        self.bucket_id
    }
}

/// A bucket together with its rendered creator.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketWithCreator {
    /// The bucket.
    pub bucket: Bucket,
    /// Creator, when the identity resolver knows them.
    pub creator: Option<Identity>,
}

/// Result of deleting a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedBucket {
    /// The removed bucket.
    pub bucket: Bucket,
    /// Bucket that received the removed bucket's tasks.
    pub fallback_bucket_id: BucketId,
    /// Number of placements moved to the fallback bucket.
    pub reassigned: u64,
    /// The view's default bucket reference was cleared.
    pub cleared_default: bool,
    /// The view's done bucket reference was cleared.
    pub cleared_done: bool,
}

/// Bucket CRUD gated by project permissions.
#[derive(Clone)]
pub struct BucketService<C>
where
    C: Clock + Send + Sync,
{
    storage: BoardStorage,
    permissions: Arc<dyn PermissionOracle>,
    identities: Arc<dyn IdentityResolver>,
    position_spacing: f64,
    link_share_display_name: String,
    clock: Arc<C>,
}

impl<C> BucketService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a bucket service.
    #[must_use]
    pub fn new(
        storage: BoardStorage,
        permissions: Arc<dyn PermissionOracle>,
        identities: Arc<dyn IdentityResolver>,
        config: &KanbanConfig,
        clock: Arc<C>,
    ) -> Self {
        Self {
            storage,
            permissions,
            identities,
            position_spacing: config.position_spacing,
            link_share_display_name: config.link_share_display_name.clone(),
            clock,
        }
    }

    /// Creates a bucket in `view`.
    ///
    /// A zero position is replaced by the default position derived from the
    /// stored ID.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::AccessDenied`] without write permission,
    /// [`KanbanError::Domain`] for invalid input, or storage errors.
    pub async fn create(
        &self,
        actor: &Principal,
        view: &BoardView,
        request: CreateBucketRequest,
    ) -> KanbanResult<BucketWithCreator> {
        ensure_permission(&*self.permissions, view.project_id(), actor, Permission::Write).await?;

        let title = BucketTitle::new(request.title)?;
        let limit = BucketLimit::new(request.limit)?;
        let position = validate_position(request.position)?;

        let draft = NewBucket {
            view_id: view.id(),
            project_id: view.project_id(),
            title,
            position,
            limit,
            created_by: *actor,
            created_at: self.clock.utc(),
        };
        let mut bucket = self.storage.buckets.insert(draft).await?;
        if is_unset_position(position) {
            let default = Bucket::default_position(bucket.id(), self.position_spacing);
            bucket.reposition(default, &*self.clock);
            self.storage.buckets.update(&bucket).await?;
        }
        tracing::info!(
            bucket_id = %bucket.id(),
            view_id = %view.id(),
            actor = %actor,
            position = bucket.position(),
            "bucket created"
        );

        let profiles = self.resolve_profiles(std::slice::from_ref(&bucket)).await?;
        Ok(self.with_creator(bucket, &profiles))
    }

    /// Replaces the title, limit and position of a bucket in `view`.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::AccessDenied`] without write permission,
    /// [`KanbanError::BucketDoesNotExist`] for an unknown bucket,
    /// [`KanbanError::BucketDoesNotBelongToProjectView`] when the bucket sits
    /// in another view, [`KanbanError::Domain`] for invalid input, or storage
    /// errors.
    pub async fn update(
        &self,
        actor: &Principal,
        view: &BoardView,
        request: UpdateBucketRequest,
    ) -> KanbanResult<Bucket> {
        ensure_permission(&*self.permissions, view.project_id(), actor, Permission::Write).await?;

        let mut bucket = self.owned_bucket(view, request.bucket_id).await?;
        let title = BucketTitle::new(request.title)?;
        let limit = BucketLimit::new(request.limit)?;
        let requested = validate_position(request.position)?;
        let position = if is_unset_position(requested) {
            Bucket::default_position(bucket.id(), self.position_spacing)
        } else {
            requested
        };

        bucket.revise(title, limit, position, &*self.clock);
        self.storage.buckets.update(&bucket).await?;
        tracing::info!(bucket_id = %bucket.id(), view_id = %view.id(), "bucket updated");
        Ok(bucket)
    }

    /// Deletes a bucket of `view`, moving its tasks to a fallback bucket.
    ///
    /// The fallback is the view's default bucket, or else the lowest-positioned
    /// remaining bucket. References from the view to the deleted bucket are
    /// cleared first.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::BucketDoesNotExist`] for an unknown bucket,
    /// [`KanbanError::BucketDoesNotBelongToProjectView`] when the bucket sits
    /// in another view, [`KanbanError::AccessDenied`] without write
    /// permission, [`KanbanError::CannotRemoveLastBucket`] when it is the
    /// view's only bucket, or storage errors.
    pub async fn delete(
        &self,
        actor: &Principal,
        view: &BoardView,
        bucket_id: BucketId,
    ) -> KanbanResult<DeletedBucket> {
        let bucket = self.owned_bucket(view, bucket_id).await?;
        ensure_permission(&*self.permissions, view.project_id(), actor, Permission::Write).await?;

        let siblings = self.storage.buckets.count_for_view(view.id()).await?;
        if siblings <= 1 {
            tracing::warn!(
                bucket_id = %bucket_id,
                view_id = %view.id(),
                "refusing to delete the last bucket of a view"
            );
            return Err(KanbanError::CannotRemoveLastBucket {
                bucket_id,
                view_id: view.id(),
            });
        }

        let mut updated_view = view.clone();
        let cleared = updated_view.clear_bucket_references(bucket_id);
        if cleared.any() {
            self.storage
                .views
                .update_bucket_references(&updated_view)
                .await?;
        }

        let fallback_bucket_id = self.fallback_bucket(&updated_view, bucket_id).await?;
        let reassigned = self
            .storage
            .task_buckets
            .reassign_bucket(bucket_id, fallback_bucket_id)
            .await?;
        self.storage.buckets.delete(bucket_id).await?;
        tracing::info!(
            bucket_id = %bucket_id,
            view_id = %view.id(),
            fallback_bucket_id = %fallback_bucket_id,
            reassigned,
            "bucket deleted"
        );

        Ok(DeletedBucket {
            bucket,
            fallback_bucket_id,
            reassigned,
            cleared_default: cleared.default_bucket,
            cleared_done: cleared.done_bucket,
        })
    }

    /// Lists the buckets of `view` by position, each with its creator.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanError::AccessDenied`] without read permission, or
    /// storage and identity resolver errors.
    pub async fn list_for_view(
        &self,
        actor: &Principal,
        view: &BoardView,
    ) -> KanbanResult<Vec<BucketWithCreator>> {
        ensure_permission(&*self.permissions, view.project_id(), actor, Permission::Read).await?;
        let buckets = self.storage.buckets.list_for_view(view.id()).await?;
        let profiles = self.resolve_profiles(&buckets).await?;
        Ok(buckets
            .into_iter()
            .map(|bucket| self.with_creator(bucket, &profiles))
            .collect())
    }

    async fn owned_bucket(&self, view: &BoardView, bucket_id: BucketId) -> KanbanResult<Bucket> {
        let bucket = self
            .storage
            .buckets
            .find_by_id(bucket_id)
            .await?
            .ok_or(KanbanError::BucketDoesNotExist(bucket_id))?;
        if bucket.view_id() != view.id() {
            return Err(KanbanError::BucketDoesNotBelongToProjectView {
                view_id: view.id(),
                bucket_id,
            });
        }
        Ok(bucket)
    }

    async fn fallback_bucket(
        &self,
        view: &BoardView,
        deleted: BucketId,
    ) -> KanbanResult<BucketId> {
        if let Some(default_bucket) = view.default_bucket_id() {
            tracing::debug!(bucket_id = %default_bucket, "falling back to default bucket");
            return Ok(default_bucket);
        }
        let lowest = self
            .storage
            .buckets
            .list_for_view(view.id())
            .await?
            .into_iter()
            .find(|candidate| candidate.id() != deleted)
            .ok_or(KanbanError::CannotRemoveLastBucket {
                bucket_id: deleted,
                view_id: view.id(),
            })?;
        tracing::debug!(bucket_id = %lowest.id(), "falling back to lowest bucket");
        Ok(lowest.id())
    }

    async fn resolve_profiles(
        &self,
        buckets: &[Bucket],
    ) -> KanbanResult<HashMap<Principal, Profile>> {
        let mut seen = HashSet::new();
        let creators: Vec<Principal> = buckets
            .iter()
            .map(Bucket::created_by)
            .filter(|principal| seen.insert(*principal))
            .collect();
        if creators.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(self.identities.resolve(&creators).await?)
    }

    fn with_creator(
        &self,
        bucket: Bucket,
        profiles: &HashMap<Principal, Profile>,
    ) -> BucketWithCreator {
        let creator = Identity::render(
            bucket.created_by(),
            profiles.get(&bucket.created_by()),
            &self.link_share_display_name,
        );
        BucketWithCreator { bucket, creator }
    }
}
