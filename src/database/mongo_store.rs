use super::*;
use crate::models::{
    Application, ApplicationStatus, ContentType, Dashboard, ForumComment, ForumPost, Job, JobSearch,
    JobStatus, LikeState, Notification, Review, Role, User, UserFilter,
};
use crate::models::job::case_insensitive;
use crate::utils::{AppError, AppResult};
use crate::utils::time::now_millis;
use async_trait::async_trait;
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOptions, ReturnDocument};
use mongodb::{Collection, Cursor};
use serde::de::DeserializeOwned;
use serde::Serialize;

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    duplicate_key_message(err).is_some()
}

/// Server message of an E11000 write error; it names the violated index.
fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY => {
            Some(we.message.as_str())
        }
        _ => None,
    }
}

fn duplicate_user_error(message: &str, user: &User) -> AppError {
    if message.contains("userId") {
        user_id_taken(&user.user_id)
    } else {
        AppError::Validation(DUPLICATE_EMAIL.into())
    }
}

fn inserted_id(result: mongodb::results::InsertOneResult) -> AppResult<ObjectId> {
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::Internal("Inserted document has no ObjectId".into()))
}

fn newest_first() -> FindOptions {
    FindOptions::builder().sort(doc! { "createdAt": -1 }).build()
}

fn oldest_first() -> FindOptions {
    FindOptions::builder().sort(doc! { "createdAt": 1 }).build()
}

/// Drains a cursor, skipping documents that fail to decode.
async fn drain<T>(mut cursor: Cursor<T>) -> Vec<T>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let mut items = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(item) => items.push(item),
            Err(e) => log::error!("❌ Error reading document: {}", e),
        }
    }
    items
}

/// Adds `user` to `likes` when absent, pulls it otherwise. Both branches are
/// single conditional updates so concurrent toggles never lose a like.
async fn toggle_like<T>(
    collection: Collection<T>,
    id: &ObjectId,
    user: &ObjectId,
    likes: fn(&T) -> &[ObjectId],
) -> AppResult<Option<LikeState>>
where
    T: DeserializeOwned + Serialize + Send + Sync,
{
    let added = collection
        .find_one_and_update(
            doc! { "_id": id, "likes": { "$ne": user } },
            doc! { "$addToSet": { "likes": user } },
        )
        .return_document(ReturnDocument::After)
        .await?;
    if let Some(doc) = added {
        return Ok(Some(LikeState::of(likes(&doc), user)));
    }

    let removed = collection
        .find_one_and_update(
            doc! { "_id": id, "likes": user },
            doc! { "$pull": { "likes": user } },
        )
        .return_document(ReturnDocument::After)
        .await?;
    Ok(removed.map(|doc| LikeState::of(likes(&doc), user)))
}

impl MongoDB {
    fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    fn jobs(&self) -> Collection<Job> {
        self.collection(JOBS)
    }

    fn applications(&self) -> Collection<Application> {
        self.collection(APPLICATIONS)
    }

    fn reviews(&self) -> Collection<Review> {
        self.collection(REVIEWS)
    }

    fn posts(&self) -> Collection<ForumPost> {
        self.collection(FORUM_POSTS)
    }

    fn comments(&self) -> Collection<ForumComment> {
        self.collection(FORUM_COMMENTS)
    }

    fn notifications(&self) -> Collection<Notification> {
        self.collection(NOTIFICATIONS)
    }

    fn dashboards(&self) -> Collection<Dashboard> {
        self.collection(DASHBOARDS)
    }
}

#[async_trait]
impl StoreHealth for MongoDB {
    async fn ping(&self) -> bool {
        self.health_check().await
    }
}

#[async_trait]
impl UserStore for MongoDB {
    async fn insert_user(&self, mut user: User) -> AppResult<User> {
        match self.users().insert_one(&user).await {
            Ok(result) => {
                user.id = Some(inserted_id(result)?);
                Ok(user)
            }
            Err(e) => match duplicate_key_message(&e) {
                Some(message) => Err(duplicate_user_error(message, &user)),
                None => Err(e.into()),
            },
        }
    }

    async fn find_user(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn find_user_by_user_id(&self, user_id: &str) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "userId": user_id }).await?)
    }

    async fn find_users(&self, ids: &[ObjectId]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.users().find(doc! { "_id": { "$in": ids.to_vec() } }).await?;
        Ok(drain(cursor).await)
    }

    async fn list_users(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let mut query = Document::new();
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = case_insensitive(term);
            query.insert(
                "$or",
                vec![
                    doc! { "name": pattern.clone() },
                    doc! { "email": pattern.clone() },
                    doc! { "userId": pattern },
                ],
            );
        }
        if let Some(role) = filter.role {
            query.insert("role", role.as_str());
        }

        let cursor = self.users().find(query).with_options(newest_first()).await?;
        Ok(drain(cursor).await)
    }

    async fn replace_user(&self, user: &User) -> AppResult<bool> {
        let id = user
            .id
            .ok_or_else(|| AppError::Internal("Cannot replace a user without _id".into()))?;
        let result = self.users().replace_one(doc! { "_id": id }, user).await?;
        Ok(result.matched_count > 0)
    }

    async fn set_user_active(
        &self,
        id: &ObjectId,
        is_active: bool,
        suspended_until: Option<i64>,
    ) -> AppResult<bool> {
        let update = match suspended_until {
            Some(until) => doc! {
                "$set": { "isActive": is_active, "suspendedUntil": until, "updatedAt": now_millis() }
            },
            None => doc! {
                "$set": { "isActive": is_active, "updatedAt": now_millis() },
                "$unset": { "suspendedUntil": "" }
            },
        };
        let result = self.users().update_one(doc! { "_id": id }, update).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_user(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self.users().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_users(&self, role: Option<Role>) -> AppResult<u64> {
        let filter = match role {
            Some(role) => doc! { "role": role.as_str() },
            None => doc! {},
        };
        Ok(self.users().count_documents(filter).await?)
    }
}

#[async_trait]
impl JobStore for MongoDB {
    async fn insert_job(&self, mut job: Job) -> AppResult<Job> {
        let result = self.jobs().insert_one(&job).await?;
        job.id = Some(inserted_id(result)?);
        Ok(job)
    }

    async fn find_job(&self, id: &ObjectId) -> AppResult<Option<Job>> {
        Ok(self.jobs().find_one(doc! { "_id": id }).await?)
    }

    async fn find_jobs(&self, ids: &[ObjectId]) -> AppResult<Vec<Job>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self.jobs().find(doc! { "_id": { "$in": ids.to_vec() } }).await?;
        Ok(drain(cursor).await)
    }

    async fn search_jobs(&self, search: &JobSearch) -> AppResult<Vec<Job>> {
        let cursor = self
            .jobs()
            .find(search.to_filter())
            .with_options(newest_first())
            .await?;
        Ok(drain(cursor).await)
    }

    async fn jobs_by_recruiter(&self, recruiter: &ObjectId) -> AppResult<Vec<Job>> {
        let cursor = self
            .jobs()
            .find(doc! { "recruiter": recruiter })
            .with_options(newest_first())
            .await?;
        Ok(drain(cursor).await)
    }

    async fn replace_job(&self, job: &Job) -> AppResult<bool> {
        let id = job
            .id
            .ok_or_else(|| AppError::Internal("Cannot replace a job without _id".into()))?;
        let result = self.jobs().replace_one(doc! { "_id": id }, job).await?;
        Ok(result.matched_count > 0)
    }

    async fn set_job_status(&self, id: &ObjectId, status: JobStatus) -> AppResult<bool> {
        let result = self
            .jobs()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": to_bson(&status)?, "updatedAt": now_millis() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_job(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self.jobs().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_jobs(&self, status: Option<JobStatus>) -> AppResult<u64> {
        let filter = match status {
            Some(status) => doc! { "status": to_bson(&status)? },
            None => doc! {},
        };
        Ok(self.jobs().count_documents(filter).await?)
    }
}

#[async_trait]
impl ApplicationStore for MongoDB {
    async fn insert_application(&self, mut application: Application) -> AppResult<Application> {
        match self.applications().insert_one(&application).await {
            Ok(result) => {
                application.id = Some(inserted_id(result)?);
                Ok(application)
            }
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Validation(DUPLICATE_APPLICATION.into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_application(&self, id: &ObjectId) -> AppResult<Option<Application>> {
        Ok(self.applications().find_one(doc! { "_id": id }).await?)
    }

    async fn find_application_for(
        &self,
        job: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<Application>> {
        Ok(self
            .applications()
            .find_one(doc! { "job": job, "user": user })
            .await?)
    }

    async fn applications_for_user(
        &self,
        user: &ObjectId,
        limit: Option<i64>,
    ) -> AppResult<Vec<Application>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .limit(limit)
            .build();
        let cursor = self
            .applications()
            .find(doc! { "user": user })
            .with_options(options)
            .await?;
        Ok(drain(cursor).await)
    }

    async fn applications_for_job(&self, job: &ObjectId) -> AppResult<Vec<Application>> {
        let cursor = self
            .applications()
            .find(doc! { "job": job })
            .with_options(newest_first())
            .await?;
        Ok(drain(cursor).await)
    }

    async fn count_applications_for_job(&self, job: &ObjectId) -> AppResult<u64> {
        Ok(self.applications().count_documents(doc! { "job": job }).await?)
    }

    async fn set_application_status(
        &self,
        id: &ObjectId,
        status: ApplicationStatus,
    ) -> AppResult<bool> {
        let result = self
            .applications()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": to_bson(&status)?, "updatedAt": now_millis() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn count_applications(&self, status: Option<ApplicationStatus>) -> AppResult<u64> {
        let filter = match status {
            Some(status) => doc! { "status": to_bson(&status)? },
            None => doc! {},
        };
        Ok(self.applications().count_documents(filter).await?)
    }
}

#[async_trait]
impl ReviewStore for MongoDB {
    async fn insert_review(&self, mut review: Review) -> AppResult<Review> {
        let result = self.reviews().insert_one(&review).await?;
        review.id = Some(inserted_id(result)?);
        Ok(review)
    }

    async fn find_review(&self, id: &ObjectId) -> AppResult<Option<Review>> {
        Ok(self.reviews().find_one(doc! { "_id": id }).await?)
    }

    async fn find_review_by(
        &self,
        reviewer: &ObjectId,
        recruiter: &ObjectId,
    ) -> AppResult<Option<Review>> {
        Ok(self
            .reviews()
            .find_one(doc! { "reviewer": reviewer, "recruiter": recruiter })
            .await?)
    }

    async fn reviews_for_recruiter(
        &self,
        recruiter: &ObjectId,
        include_flagged: bool,
    ) -> AppResult<Vec<Review>> {
        let mut filter = doc! { "recruiter": recruiter };
        if !include_flagged {
            filter.insert("flagged", doc! { "$ne": true });
        }
        let cursor = self.reviews().find(filter).with_options(newest_first()).await?;
        Ok(drain(cursor).await)
    }
}

#[async_trait]
impl ForumStore for MongoDB {
    async fn insert_post(&self, mut post: ForumPost) -> AppResult<ForumPost> {
        let result = self.posts().insert_one(&post).await?;
        post.id = Some(inserted_id(result)?);
        Ok(post)
    }

    async fn find_post(&self, id: &ObjectId) -> AppResult<Option<ForumPost>> {
        Ok(self.posts().find_one(doc! { "_id": id }).await?)
    }

    async fn list_posts(&self) -> AppResult<Vec<ForumPost>> {
        let cursor = self.posts().find(doc! {}).with_options(newest_first()).await?;
        Ok(drain(cursor).await)
    }

    async fn increment_post_views(&self, id: &ObjectId) -> AppResult<Option<ForumPost>> {
        Ok(self
            .posts()
            .find_one_and_update(doc! { "_id": id }, doc! { "$inc": { "views": 1 } })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn toggle_post_like(&self, id: &ObjectId, user: &ObjectId) -> AppResult<Option<LikeState>> {
        toggle_like(self.posts(), id, user, |post| post.likes.as_slice()).await
    }

    async fn insert_comment(&self, mut comment: ForumComment) -> AppResult<ForumComment> {
        let result = self.comments().insert_one(&comment).await?;
        comment.id = Some(inserted_id(result)?);
        Ok(comment)
    }

    async fn find_comment(&self, id: &ObjectId) -> AppResult<Option<ForumComment>> {
        Ok(self.comments().find_one(doc! { "_id": id }).await?)
    }

    async fn comments_for_post(&self, post: &ObjectId) -> AppResult<Vec<ForumComment>> {
        let cursor = self
            .comments()
            .find(doc! { "post": post })
            .with_options(oldest_first())
            .await?;
        Ok(drain(cursor).await)
    }

    async fn count_comments_for_post(&self, post: &ObjectId) -> AppResult<u64> {
        Ok(self.comments().count_documents(doc! { "post": post }).await?)
    }

    async fn toggle_comment_like(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<LikeState>> {
        toggle_like(self.comments(), id, user, |comment| comment.likes.as_slice()).await
    }
}

#[async_trait]
impl NotificationStore for MongoDB {
    async fn insert_notification(&self, mut notification: Notification) -> AppResult<Notification> {
        let result = self.notifications().insert_one(&notification).await?;
        notification.id = Some(inserted_id(result)?);
        Ok(notification)
    }

    async fn notifications_for_user(
        &self,
        user: &ObjectId,
        limit: Option<i64>,
    ) -> AppResult<Vec<Notification>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .limit(limit)
            .build();
        let cursor = self
            .notifications()
            .find(doc! { "user": user })
            .with_options(options)
            .await?;
        Ok(drain(cursor).await)
    }

    async fn mark_notification_read(&self, id: &ObjectId, user: &ObjectId) -> AppResult<bool> {
        let result = self
            .notifications()
            .update_one(doc! { "_id": id, "user": user }, doc! { "$set": { "read": true } })
            .await?;
        Ok(result.matched_count > 0)
    }
}

#[async_trait]
impl DashboardStore for MongoDB {
    async fn saved_job_ids(&self, user: &ObjectId) -> AppResult<Vec<ObjectId>> {
        let dashboard = self.dashboards().find_one(doc! { "user": user }).await?;
        Ok(dashboard.map(|d| d.saved_jobs).unwrap_or_default())
    }

    async fn add_saved_job(&self, user: &ObjectId, job: &ObjectId) -> AppResult<bool> {
        let result = self
            .dashboards()
            .update_one(doc! { "user": user }, doc! { "$addToSet": { "savedJobs": job } })
            .upsert(true)
            .await?;
        Ok(result.modified_count > 0 || result.upserted_id.is_some())
    }

    async fn remove_saved_job(&self, user: &ObjectId, job: &ObjectId) -> AppResult<()> {
        self.dashboards()
            .update_one(doc! { "user": user }, doc! { "$pull": { "savedJobs": job } })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ModerationStore for MongoDB {
    async fn flagged_reviews(&self) -> AppResult<Vec<Review>> {
        let cursor = self
            .reviews()
            .find(doc! { "flagged": true })
            .with_options(oldest_first())
            .await?;
        Ok(drain(cursor).await)
    }

    async fn flagged_posts(&self) -> AppResult<Vec<ForumPost>> {
        let cursor = self
            .posts()
            .find(doc! { "flagged": true })
            .with_options(oldest_first())
            .await?;
        Ok(drain(cursor).await)
    }

    async fn flagged_comments(&self) -> AppResult<Vec<ForumComment>> {
        let cursor = self
            .comments()
            .find(doc! { "flagged": true })
            .with_options(oldest_first())
            .await?;
        Ok(drain(cursor).await)
    }

    async fn count_flagged(&self, content_type: ContentType) -> AppResult<u64> {
        Ok(self
            .collection::<Document>(content_type.collection())
            .count_documents(doc! { "flagged": true })
            .await?)
    }

    async fn content_author(
        &self,
        content_type: ContentType,
        id: &ObjectId,
    ) -> AppResult<Option<ObjectId>> {
        let document = self
            .collection::<Document>(content_type.collection())
            .find_one(doc! { "_id": id })
            .await?;
        Ok(document.and_then(|d| d.get_object_id(content_type.author_field()).ok()))
    }

    async fn clear_flag(&self, content_type: ContentType, id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection::<Document>(content_type.collection())
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "flagged": false, "updatedAt": now_millis() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_content(&self, content_type: ContentType, id: &ObjectId) -> AppResult<bool> {
        let result = self
            .collection::<Document>(content_type.collection())
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
