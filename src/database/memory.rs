//! In-memory `Store` used by the service and HTTP tests. Mirrors the ordering
//! and uniqueness rules of the Mongo adapter.

use super::*;
use crate::models::{
    Application, ApplicationStatus, ContentType, Dashboard, ForumComment, ForumPost, Job, JobSearch,
    JobStatus, LikeState, Notification, Review, Role, User, UserFilter,
};
use crate::utils::{AppError, AppResult};
use crate::utils::time::now_millis;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    jobs: RwLock<Vec<Job>>,
    applications: RwLock<Vec<Application>>,
    reviews: RwLock<Vec<Review>>,
    posts: RwLock<Vec<ForumPost>>,
    comments: RwLock<Vec<ForumComment>>,
    notifications: RwLock<Vec<Notification>>,
    dashboards: RwLock<Vec<Dashboard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all_notifications(&self) -> Vec<Notification> {
        self.notifications.read().await.clone()
    }
}

fn newest_first<T: Clone>(items: impl Iterator<Item = T>, created_at: fn(&T) -> i64) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

fn oldest_first<T: Clone>(items: impl Iterator<Item = T>, created_at: fn(&T) -> i64) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(created_at);
    items
}

fn toggle(likes: &mut Vec<ObjectId>, user: &ObjectId) -> LikeState {
    if let Some(pos) = likes.iter().position(|l| l == user) {
        likes.remove(pos);
    } else {
        likes.push(*user);
    }
    LikeState::of(likes, user)
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> bool {
        true
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, mut user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Validation(DUPLICATE_EMAIL.into()));
        }
        if users.iter().any(|u| u.user_id == user.user_id) {
            return Err(user_id_taken(&user.user_id));
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_user_id(&self, user_id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_users(&self, ids: &[ObjectId]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.id.map(|id| ids.contains(&id)).unwrap_or(false))
            .cloned()
            .collect())
    }

    async fn list_users(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let term = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let matching = users
            .iter()
            .filter(|u| term.map(|t| u.matches_search(t)).unwrap_or(true))
            .filter(|u| filter.role.map(|r| u.role == r).unwrap_or(true))
            .cloned();
        Ok(newest_first(matching, |u| u.created_at))
    }

    async fn replace_user(&self, user: &User) -> AppResult<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id.is_some() && u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_user_active(
        &self,
        id: &ObjectId,
        is_active: bool,
        suspended_until: Option<i64>,
    ) -> AppResult<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            Some(user) => {
                user.is_active = is_active;
                user.suspended_until = suspended_until;
                user.updated_at = now_millis();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: &ObjectId) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id.as_ref() != Some(id));
        Ok(users.len() < before)
    }

    async fn count_users(&self, role: Option<Role>) -> AppResult<u64> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| role.map(|r| u.role == r).unwrap_or(true))
            .count() as u64)
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, mut job: Job) -> AppResult<Job> {
        job.id = Some(ObjectId::new());
        self.jobs.write().await.push(job.clone());
        Ok(job)
    }

    async fn find_job(&self, id: &ObjectId) -> AppResult<Option<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.iter().find(|j| j.id.as_ref() == Some(id)).cloned())
    }

    async fn find_jobs(&self, ids: &[ObjectId]) -> AppResult<Vec<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .iter()
            .filter(|j| j.id.map(|id| ids.contains(&id)).unwrap_or(false))
            .cloned()
            .collect())
    }

    async fn search_jobs(&self, search: &JobSearch) -> AppResult<Vec<Job>> {
        let jobs = self.jobs.read().await;
        let matching = jobs.iter().filter(|j| search.matches(j)).cloned();
        Ok(newest_first(matching, |j| j.created_at))
    }

    async fn jobs_by_recruiter(&self, recruiter: &ObjectId) -> AppResult<Vec<Job>> {
        let jobs = self.jobs.read().await;
        let owned = jobs.iter().filter(|j| j.is_owned_by(recruiter)).cloned();
        Ok(newest_first(owned, |j| j.created_at))
    }

    async fn replace_job(&self, job: &Job) -> AppResult<bool> {
        let mut jobs = self.jobs.write().await;
        match jobs.iter_mut().find(|j| j.id.is_some() && j.id == job.id) {
            Some(existing) => {
                *existing = job.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_job_status(&self, id: &ObjectId, status: JobStatus) -> AppResult<bool> {
        let mut jobs = self.jobs.write().await;
        match jobs.iter_mut().find(|j| j.id.as_ref() == Some(id)) {
            Some(job) => {
                job.status = status;
                job.updated_at = now_millis();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_job(&self, id: &ObjectId) -> AppResult<bool> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|j| j.id.as_ref() != Some(id));
        Ok(jobs.len() < before)
    }

    async fn count_jobs(&self, status: Option<JobStatus>) -> AppResult<u64> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .iter()
            .filter(|j| status.map(|s| j.status == s).unwrap_or(true))
            .count() as u64)
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert_application(&self, mut application: Application) -> AppResult<Application> {
        let mut applications = self.applications.write().await;
        if applications
            .iter()
            .any(|a| a.job == application.job && a.user == application.user)
        {
            return Err(AppError::Validation(DUPLICATE_APPLICATION.into()));
        }
        application.id = Some(ObjectId::new());
        applications.push(application.clone());
        Ok(application)
    }

    async fn find_application(&self, id: &ObjectId) -> AppResult<Option<Application>> {
        let applications = self.applications.read().await;
        Ok(applications.iter().find(|a| a.id.as_ref() == Some(id)).cloned())
    }

    async fn find_application_for(
        &self,
        job: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<Application>> {
        let applications = self.applications.read().await;
        Ok(applications
            .iter()
            .find(|a| &a.job == job && &a.user == user)
            .cloned())
    }

    async fn applications_for_user(
        &self,
        user: &ObjectId,
        limit: Option<i64>,
    ) -> AppResult<Vec<Application>> {
        let applications = self.applications.read().await;
        let mut mine = newest_first(
            applications.iter().filter(|a| &a.user == user).cloned(),
            |a| a.created_at,
        );
        if let Some(limit) = limit {
            mine.truncate(limit.max(0) as usize);
        }
        Ok(mine)
    }

    async fn applications_for_job(&self, job: &ObjectId) -> AppResult<Vec<Application>> {
        let applications = self.applications.read().await;
        Ok(newest_first(
            applications.iter().filter(|a| &a.job == job).cloned(),
            |a| a.created_at,
        ))
    }

    async fn count_applications_for_job(&self, job: &ObjectId) -> AppResult<u64> {
        let applications = self.applications.read().await;
        Ok(applications.iter().filter(|a| &a.job == job).count() as u64)
    }

    async fn set_application_status(
        &self,
        id: &ObjectId,
        status: ApplicationStatus,
    ) -> AppResult<bool> {
        let mut applications = self.applications.write().await;
        match applications.iter_mut().find(|a| a.id.as_ref() == Some(id)) {
            Some(application) => {
                application.status = status;
                application.updated_at = now_millis();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_applications(&self, status: Option<ApplicationStatus>) -> AppResult<u64> {
        let applications = self.applications.read().await;
        Ok(applications
            .iter()
            .filter(|a| status.map(|s| a.status == s).unwrap_or(true))
            .count() as u64)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert_review(&self, mut review: Review) -> AppResult<Review> {
        review.id = Some(ObjectId::new());
        self.reviews.write().await.push(review.clone());
        Ok(review)
    }

    async fn find_review(&self, id: &ObjectId) -> AppResult<Option<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews.iter().find(|r| r.id.as_ref() == Some(id)).cloned())
    }

    async fn find_review_by(
        &self,
        reviewer: &ObjectId,
        recruiter: &ObjectId,
    ) -> AppResult<Option<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .find(|r| &r.reviewer == reviewer && &r.recruiter == recruiter)
            .cloned())
    }

    async fn reviews_for_recruiter(
        &self,
        recruiter: &ObjectId,
        include_flagged: bool,
    ) -> AppResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        let matching = reviews
            .iter()
            .filter(|r| &r.recruiter == recruiter && (include_flagged || !r.flagged))
            .cloned();
        Ok(newest_first(matching, |r| r.created_at))
    }
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn insert_post(&self, mut post: ForumPost) -> AppResult<ForumPost> {
        post.id = Some(ObjectId::new());
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: &ObjectId) -> AppResult<Option<ForumPost>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id.as_ref() == Some(id)).cloned())
    }

    async fn list_posts(&self) -> AppResult<Vec<ForumPost>> {
        let posts = self.posts.read().await;
        Ok(newest_first(posts.iter().cloned(), |p| p.created_at))
    }

    async fn increment_post_views(&self, id: &ObjectId) -> AppResult<Option<ForumPost>> {
        let mut posts = self.posts.write().await;
        Ok(posts.iter_mut().find(|p| p.id.as_ref() == Some(id)).map(|post| {
            post.views += 1;
            post.clone()
        }))
    }

    async fn toggle_post_like(&self, id: &ObjectId, user: &ObjectId) -> AppResult<Option<LikeState>> {
        let mut posts = self.posts.write().await;
        Ok(posts
            .iter_mut()
            .find(|p| p.id.as_ref() == Some(id))
            .map(|post| toggle(&mut post.likes, user)))
    }

    async fn insert_comment(&self, mut comment: ForumComment) -> AppResult<ForumComment> {
        comment.id = Some(ObjectId::new());
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: &ObjectId) -> AppResult<Option<ForumComment>> {
        let comments = self.comments.read().await;
        Ok(comments.iter().find(|c| c.id.as_ref() == Some(id)).cloned())
    }

    async fn comments_for_post(&self, post: &ObjectId) -> AppResult<Vec<ForumComment>> {
        let comments = self.comments.read().await;
        Ok(oldest_first(
            comments.iter().filter(|c| &c.post == post).cloned(),
            |c| c.created_at,
        ))
    }

    async fn count_comments_for_post(&self, post: &ObjectId) -> AppResult<u64> {
        let comments = self.comments.read().await;
        Ok(comments.iter().filter(|c| &c.post == post).count() as u64)
    }

    async fn toggle_comment_like(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> AppResult<Option<LikeState>> {
        let mut comments = self.comments.write().await;
        Ok(comments
            .iter_mut()
            .find(|c| c.id.as_ref() == Some(id))
            .map(|comment| toggle(&mut comment.likes, user)))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_notification(&self, mut notification: Notification) -> AppResult<Notification> {
        notification.id = Some(ObjectId::new());
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn notifications_for_user(
        &self,
        user: &ObjectId,
        limit: Option<i64>,
    ) -> AppResult<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut mine = newest_first(
            notifications.iter().filter(|n| &n.user == user).cloned(),
            |n| n.created_at,
        );
        if let Some(limit) = limit {
            mine.truncate(limit.max(0) as usize);
        }
        Ok(mine)
    }

    async fn mark_notification_read(&self, id: &ObjectId, user: &ObjectId) -> AppResult<bool> {
        let mut notifications = self.notifications.write().await;
        match notifications
            .iter_mut()
            .find(|n| n.id.as_ref() == Some(id) && &n.user == user)
        {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn saved_job_ids(&self, user: &ObjectId) -> AppResult<Vec<ObjectId>> {
        let dashboards = self.dashboards.read().await;
        Ok(dashboards
            .iter()
            .find(|d| &d.user == user)
            .map(|d| d.saved_jobs.clone())
            .unwrap_or_default())
    }

    async fn add_saved_job(&self, user: &ObjectId, job: &ObjectId) -> AppResult<bool> {
        let mut dashboards = self.dashboards.write().await;
        let index = match dashboards.iter().position(|d| &d.user == user) {
            Some(index) => index,
            None => {
                dashboards.push(Dashboard {
                    id: Some(ObjectId::new()),
                    user: *user,
                    saved_jobs: Vec::new(),
                });
                dashboards.len() - 1
            }
        };
        let saved = &mut dashboards[index].saved_jobs;
        if saved.contains(job) {
            return Ok(false);
        }
        saved.push(*job);
        Ok(true)
    }

    async fn remove_saved_job(&self, user: &ObjectId, job: &ObjectId) -> AppResult<()> {
        let mut dashboards = self.dashboards.write().await;
        if let Some(dashboard) = dashboards.iter_mut().find(|d| &d.user == user) {
            dashboard.saved_jobs.retain(|j| j != job);
        }
        Ok(())
    }
}

#[async_trait]
impl ModerationStore for MemoryStore {
    async fn flagged_reviews(&self) -> AppResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        Ok(oldest_first(
            reviews.iter().filter(|r| r.flagged).cloned(),
            |r| r.created_at,
        ))
    }

    async fn flagged_posts(&self) -> AppResult<Vec<ForumPost>> {
        let posts = self.posts.read().await;
        Ok(oldest_first(posts.iter().filter(|p| p.flagged).cloned(), |p| p.created_at))
    }

    async fn flagged_comments(&self) -> AppResult<Vec<ForumComment>> {
        let comments = self.comments.read().await;
        Ok(oldest_first(
            comments.iter().filter(|c| c.flagged).cloned(),
            |c| c.created_at,
        ))
    }

    async fn count_flagged(&self, content_type: ContentType) -> AppResult<u64> {
        let count = match content_type {
            ContentType::Reviews => self.reviews.read().await.iter().filter(|r| r.flagged).count(),
            ContentType::Posts => self.posts.read().await.iter().filter(|p| p.flagged).count(),
            ContentType::Comments => self.comments.read().await.iter().filter(|c| c.flagged).count(),
        };
        Ok(count as u64)
    }

    async fn content_author(
        &self,
        content_type: ContentType,
        id: &ObjectId,
    ) -> AppResult<Option<ObjectId>> {
        let author = match content_type {
            ContentType::Reviews => self
                .reviews
                .read()
                .await
                .iter()
                .find(|r| r.id.as_ref() == Some(id))
                .map(|r| r.reviewer),
            ContentType::Posts => self
                .posts
                .read()
                .await
                .iter()
                .find(|p| p.id.as_ref() == Some(id))
                .map(|p| p.author),
            ContentType::Comments => self
                .comments
                .read()
                .await
                .iter()
                .find(|c| c.id.as_ref() == Some(id))
                .map(|c| c.author),
        };
        Ok(author)
    }

    async fn clear_flag(&self, content_type: ContentType, id: &ObjectId) -> AppResult<bool> {
        let found = match content_type {
            ContentType::Reviews => self
                .reviews
                .write()
                .await
                .iter_mut()
                .find(|r| r.id.as_ref() == Some(id))
                .map(|r| r.flagged = false),
            ContentType::Posts => self
                .posts
                .write()
                .await
                .iter_mut()
                .find(|p| p.id.as_ref() == Some(id))
                .map(|p| p.flagged = false),
            ContentType::Comments => self
                .comments
                .write()
                .await
                .iter_mut()
                .find(|c| c.id.as_ref() == Some(id))
                .map(|c| c.flagged = false),
        };
        Ok(found.is_some())
    }

    async fn delete_content(&self, content_type: ContentType, id: &ObjectId) -> AppResult<bool> {
        fn remove<T>(items: &mut Vec<T>, id: &ObjectId, id_of: fn(&T) -> Option<ObjectId>) -> bool {
            let before = items.len();
            items.retain(|item| id_of(item).as_ref() != Some(id));
            items.len() < before
        }

        let removed = match content_type {
            ContentType::Reviews => remove(&mut *self.reviews.write().await, id, |r| r.id),
            ContentType::Posts => remove(&mut *self.posts.write().await, id, |p| p.id),
            ContentType::Comments => remove(&mut *self.comments.write().await, id, |c| c.id),
        };
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_comment, sample_post, sample_user};

    #[actix_rt::test]
    async fn test_duplicate_user_rejected() {
        let store = MemoryStore::new();
        store.insert_user(sample_user("alice", Role::Student)).await.unwrap();

        let err = store
            .insert_user(sample_user("alice", Role::Student))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Validation(DUPLICATE_EMAIL.into()));

        let mut same_mailbox = sample_user("alice", Role::Recruiter);
        same_mailbox.email = "alice@bracu.ac.bd".into();
        let err = store.insert_user(same_mailbox).await.unwrap_err();
        assert_eq!(err, user_id_taken("alice"));
    }

    #[actix_rt::test]
    async fn test_like_toggle_is_an_involution() {
        let store = MemoryStore::new();
        let user = ObjectId::new();
        let post = store.insert_post(sample_post(ObjectId::new(), false)).await.unwrap();
        let id = post.id.unwrap();

        let first = store.toggle_post_like(&id, &user).await.unwrap().unwrap();
        assert_eq!(first, LikeState { like_count: 1, is_liked: true });
        let second = store.toggle_post_like(&id, &user).await.unwrap().unwrap();
        assert_eq!(second, LikeState { like_count: 0, is_liked: false });

        assert!(store.toggle_post_like(&ObjectId::new(), &user).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_comments_oldest_first() {
        let store = MemoryStore::new();
        let post = ObjectId::new();
        let mut late = sample_comment(post, ObjectId::new(), false);
        late.created_at = 2_000;
        let mut early = sample_comment(post, ObjectId::new(), false);
        early.created_at = 1_000;
        store.insert_comment(late).await.unwrap();
        store.insert_comment(early).await.unwrap();

        let comments = store.comments_for_post(&post).await.unwrap();
        assert_eq!(comments[0].created_at, 1_000);
        assert_eq!(store.count_comments_for_post(&post).await.unwrap(), 2);
    }

    #[actix_rt::test]
    async fn test_saved_jobs_are_a_set() {
        let store = MemoryStore::new();
        let user = ObjectId::new();
        let job = ObjectId::new();

        assert!(store.add_saved_job(&user, &job).await.unwrap());
        assert!(!store.add_saved_job(&user, &job).await.unwrap());
        assert_eq!(store.saved_job_ids(&user).await.unwrap(), vec![job]);

        store.remove_saved_job(&user, &job).await.unwrap();
        store.remove_saved_job(&user, &job).await.unwrap();
        assert!(store.saved_job_ids(&user).await.unwrap().is_empty());
    }
}
