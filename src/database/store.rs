//! Storage port. Services only talk to these traits; `MongoDB` implements them
//! for production and `MemoryStore` for tests.

use crate::models::{
    Application, ApplicationStatus, ContentType, ForumComment, ForumPost, Job, JobSearch, JobStatus,
    LikeState, Notification, Review, Role, User, UserFilter,
};
use crate::utils::{AppError, AppResult};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

pub const DUPLICATE_EMAIL: &str = "User with this email already exists";
pub const DUPLICATE_APPLICATION: &str = "Already applied to this job";

pub fn user_id_taken(user_id: &str) -> AppError {
    AppError::Validation(format!("User ID '{}' is already taken", user_id))
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with a Validation error when the email or userId is taken.
    async fn insert_user(&self, user: User) -> AppResult<User>;
    async fn find_user(&self, id: &ObjectId) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_user_by_user_id(&self, user_id: &str) -> AppResult<Option<User>>;
    async fn find_users(&self, ids: &[ObjectId]) -> AppResult<Vec<User>>;
    /// Newest first
    async fn list_users(&self, filter: &UserFilter) -> AppResult<Vec<User>>;
    async fn replace_user(&self, user: &User) -> AppResult<bool>;
    async fn set_user_active(
        &self,
        id: &ObjectId,
        is_active: bool,
        suspended_until: Option<i64>,
    ) -> AppResult<bool>;
    async fn delete_user(&self, id: &ObjectId) -> AppResult<bool>;
    async fn count_users(&self, role: Option<Role>) -> AppResult<u64>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, job: Job) -> AppResult<Job>;
    async fn find_job(&self, id: &ObjectId) -> AppResult<Option<Job>>;
    async fn find_jobs(&self, ids: &[ObjectId]) -> AppResult<Vec<Job>>;
    /// Newest first
    async fn search_jobs(&self, search: &JobSearch) -> AppResult<Vec<Job>>;
    /// Newest first
    async fn jobs_by_recruiter(&self, recruiter: &ObjectId) -> AppResult<Vec<Job>>;
    async fn replace_job(&self, job: &Job) -> AppResult<bool>;
    async fn set_job_status(&self, id: &ObjectId, status: JobStatus) -> AppResult<bool>;
    async fn delete_job(&self, id: &ObjectId) -> AppResult<bool>;
    async fn count_jobs(&self, status: Option<JobStatus>) -> AppResult<u64>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Fails with a Validation error when (job, user) already exists.
    async fn insert_application(&self, application: Application) -> AppResult<Application>;
    async fn find_application(&self, id: &ObjectId) -> AppResult<Option<Application>>;
    async fn find_application_for(
        &self,
        job: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<Application>>;
    /// Newest first, optionally capped
    async fn applications_for_user(
        &self,
        user: &ObjectId,
        limit: Option<i64>,
    ) -> AppResult<Vec<Application>>;
    /// Newest first
    async fn applications_for_job(&self, job: &ObjectId) -> AppResult<Vec<Application>>;
    async fn count_applications_for_job(&self, job: &ObjectId) -> AppResult<u64>;
    async fn set_application_status(
        &self,
        id: &ObjectId,
        status: ApplicationStatus,
    ) -> AppResult<bool>;
    async fn count_applications(&self, status: Option<ApplicationStatus>) -> AppResult<u64>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert_review(&self, review: Review) -> AppResult<Review>;
    async fn find_review(&self, id: &ObjectId) -> AppResult<Option<Review>>;
    async fn find_review_by(
        &self,
        reviewer: &ObjectId,
        recruiter: &ObjectId,
    ) -> AppResult<Option<Review>>;
    /// Newest first
    async fn reviews_for_recruiter(
        &self,
        recruiter: &ObjectId,
        include_flagged: bool,
    ) -> AppResult<Vec<Review>>;
}

#[async_trait]
pub trait ForumStore: Send + Sync {
    async fn insert_post(&self, post: ForumPost) -> AppResult<ForumPost>;
    async fn find_post(&self, id: &ObjectId) -> AppResult<Option<ForumPost>>;
    /// Newest first
    async fn list_posts(&self) -> AppResult<Vec<ForumPost>>;
    /// Atomic `$inc`; returns the post after the increment.
    async fn increment_post_views(&self, id: &ObjectId) -> AppResult<Option<ForumPost>>;
    /// Adds `user` to the likes if absent, removes it otherwise. None when the post is missing.
    async fn toggle_post_like(&self, id: &ObjectId, user: &ObjectId) -> AppResult<Option<LikeState>>;
    async fn insert_comment(&self, comment: ForumComment) -> AppResult<ForumComment>;
    async fn find_comment(&self, id: &ObjectId) -> AppResult<Option<ForumComment>>;
    /// Oldest first
    async fn comments_for_post(&self, post: &ObjectId) -> AppResult<Vec<ForumComment>>;
    async fn count_comments_for_post(&self, post: &ObjectId) -> AppResult<u64>;
    async fn toggle_comment_like(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<LikeState>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, notification: Notification) -> AppResult<Notification>;
    /// Newest first, optionally capped
    async fn notifications_for_user(
        &self,
        user: &ObjectId,
        limit: Option<i64>,
    ) -> AppResult<Vec<Notification>>;
    /// Only marks the notification if it belongs to `user`.
    async fn mark_notification_read(&self, id: &ObjectId, user: &ObjectId) -> AppResult<bool>;
}

#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn saved_job_ids(&self, user: &ObjectId) -> AppResult<Vec<ObjectId>>;
    /// Array-union; false when the job was already saved.
    async fn add_saved_job(&self, user: &ObjectId, job: &ObjectId) -> AppResult<bool>;
    /// Array-pull; removing a job that isn't saved is a no-op.
    async fn remove_saved_job(&self, user: &ObjectId, job: &ObjectId) -> AppResult<()>;
}

#[async_trait]
pub trait ModerationStore: Send + Sync {
    /// Oldest first
    async fn flagged_reviews(&self) -> AppResult<Vec<Review>>;
    /// Oldest first
    async fn flagged_posts(&self) -> AppResult<Vec<ForumPost>>;
    /// Oldest first
    async fn flagged_comments(&self) -> AppResult<Vec<ForumComment>>;
    async fn count_flagged(&self, content_type: ContentType) -> AppResult<u64>;
    /// Author of a content document, None when the document doesn't exist.
    async fn content_author(
        &self,
        content_type: ContentType,
        id: &ObjectId,
    ) -> AppResult<Option<ObjectId>>;
    /// Sets `flagged=false`; false when the document doesn't exist.
    async fn clear_flag(&self, content_type: ContentType, id: &ObjectId) -> AppResult<bool>;
    /// false when the document doesn't exist.
    async fn delete_content(&self, content_type: ContentType, id: &ObjectId) -> AppResult<bool>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> bool;
}

pub trait Store:
    StoreHealth
    + UserStore
    + JobStore
    + ApplicationStore
    + ReviewStore
    + ForumStore
    + NotificationStore
    + DashboardStore
    + ModerationStore
{
}

impl<T> Store for T where
    T: StoreHealth
        + UserStore
        + JobStore
        + ApplicationStore
        + ReviewStore
        + ForumStore
        + NotificationStore
        + DashboardStore
        + ModerationStore
{
}
