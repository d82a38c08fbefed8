use crate::{
    database::Store,
    models::{CreateReviewRequest, RatingSummary, Review, ReviewView, Role},
    services::{auth_service::Claims, lookup},
    utils::{parse_object_id, time, AppError, AppResult},
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RecruiterReviews {
    pub reviews: Vec<ReviewView>,
    pub stats: RatingSummary,
}

pub async fn create_review(
    store: &dyn Store,
    claims: &Claims,
    request: &CreateReviewRequest,
) -> AppResult<ReviewView> {
    if claims.role != Role::Student {
        return Err(AppError::Forbidden("Only students can review recruiters".into()));
    }
    let recruiter = parse_object_id(&request.recruiter_id, "recruiter")?;
    let reviewer = claims.object_id()?;

    match store.find_user(&recruiter).await? {
        Some(user) if user.role == Role::Recruiter => {}
        _ => return Err(AppError::NotFound("Recruiter not found".into())),
    }

    if !request.ratings.is_valid() {
        return Err(AppError::Validation("Each rating must be between 1 and 5".into()));
    }

    if store.find_review_by(&reviewer, &recruiter).await?.is_some() {
        return Err(AppError::Validation("You have already reviewed this recruiter".into()));
    }

    let now = time::now_millis();
    let review = store
        .insert_review(Review {
            id: None,
            recruiter,
            reviewer,
            ratings: request.ratings,
            comment: request.comment.trim().to_string(),
            flagged: false,
            ai_analysis: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let authors = lookup::user_summaries(store, [reviewer]).await?;
    Ok(ReviewView::new(&review, authors.get(&reviewer).cloned()))
}

/// Public, unflagged reviews of a recruiter with their averages.
pub async fn reviews_about(store: &dyn Store, recruiter: &ObjectId) -> AppResult<RecruiterReviews> {
    let reviews = store.reviews_for_recruiter(recruiter, false).await?;
    let authors = lookup::user_summaries(store, reviews.iter().map(|r| r.reviewer)).await?;

    Ok(RecruiterReviews {
        stats: RatingSummary::from_reviews(&reviews),
        reviews: reviews
            .iter()
            .map(|r| ReviewView::new(r, authors.get(&r.reviewer).cloned()))
            .collect(),
    })
}

pub async fn recruiter_reviews(store: &dyn Store, recruiter_id: &str) -> AppResult<RecruiterReviews> {
    let recruiter = parse_object_id(recruiter_id, "recruiter")?;
    match store.find_user(&recruiter).await? {
        Some(user) if user.role == Role::Recruiter => reviews_about(store, &recruiter).await,
        _ => Err(AppError::NotFound("Recruiter not found".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::{ReviewStore, UserStore};
    use crate::models::{sample_review, sample_user, Ratings};
    use crate::services::test_support::claims_for;

    fn request(recruiter: &ObjectId, overall: i32) -> CreateReviewRequest {
        CreateReviewRequest {
            recruiter_id: recruiter.to_hex(),
            ratings: Ratings {
                overall,
                work_culture: 4,
                salary: 3,
                career_growth: 5,
            },
            comment: " Friendly team ".into(),
        }
    }

    #[actix_rt::test]
    async fn test_student_reviews_recruiter_once() {
        let store = MemoryStore::new();
        let student = store.insert_user(sample_user("olga", Role::Student)).await.unwrap();
        let recruiter = store.insert_user(sample_user("acme", Role::Recruiter)).await.unwrap();
        let recruiter_id = recruiter.id.unwrap();

        let review = create_review(&store, &claims_for(&student), &request(&recruiter_id, 4))
            .await
            .unwrap();
        assert_eq!(review.comment, "Friendly team");
        assert_eq!(review.author.unwrap().user_id, "olga");

        let err = create_review(&store, &claims_for(&student), &request(&recruiter_id, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[actix_rt::test]
    async fn test_review_rules() {
        let store = MemoryStore::new();
        let student = store.insert_user(sample_user("pia", Role::Student)).await.unwrap();
        let other_student = store.insert_user(sample_user("quinn", Role::Student)).await.unwrap();
        let recruiter = store.insert_user(sample_user("corp", Role::Recruiter)).await.unwrap();
        let recruiter_id = recruiter.id.unwrap();

        assert!(matches!(
            create_review(&store, &claims_for(&recruiter), &request(&recruiter_id, 3)).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            create_review(&store, &claims_for(&student), &request(&recruiter_id, 6)).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create_review(
                &store,
                &claims_for(&student),
                &request(&other_student.id.unwrap(), 3)
            )
            .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn test_listing_hides_flagged_reviews() {
        let store = MemoryStore::new();
        let recruiter = store.insert_user(sample_user("firm", Role::Recruiter)).await.unwrap();
        let recruiter_id = recruiter.id.unwrap();
        store
            .insert_review(sample_review(recruiter_id, ObjectId::new(), false))
            .await
            .unwrap();
        store
            .insert_review(sample_review(recruiter_id, ObjectId::new(), true))
            .await
            .unwrap();

        let listed = recruiter_reviews(&store, &recruiter_id.to_hex()).await.unwrap();
        assert_eq!(listed.reviews.len(), 1);
        assert_eq!(listed.stats.total_reviews, 1);
        assert_eq!(listed.stats.overall, 4.0);
    }
}
