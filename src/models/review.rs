use crate::models::UserSummary;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    pub overall: i32,
    pub work_culture: i32,
    pub salary: i32,
    pub career_growth: i32,
}

impl Ratings {
    pub fn is_valid(&self) -> bool {
        [self.overall, self.work_culture, self.salary, self.career_growth]
            .iter()
            .all(|r| (1..=5).contains(r))
    }
}

/// Company review written by a student about a recruiter (collection "reviews")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub recruiter: ObjectId,
    pub reviewer: ObjectId,
    pub ratings: Ratings,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Review {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(rename = "_id")]
    pub id: String,
    pub recruiter: String,
    /// The reviewer, populated
    pub author: Option<UserSummary>,
    pub ratings: Ratings,
    pub comment: String,
    pub flagged: bool,
    pub ai_analysis: Option<String>,
    pub created_at: i64,
}

impl ReviewView {
    pub fn new(review: &Review, author: Option<UserSummary>) -> Self {
        ReviewView {
            id: review.id_hex(),
            recruiter: review.recruiter.to_hex(),
            author,
            ratings: review.ratings,
            comment: review.comment.clone(),
            flagged: review.flagged,
            ai_analysis: review.ai_analysis.clone(),
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub recruiter_id: String,
    pub ratings: Ratings,
    #[serde(default)]
    pub comment: String,
}

/// Average ratings, rounded to one decimal; all zero when there are no reviews
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub total_reviews: u64,
    pub overall: f64,
    pub work_culture: f64,
    pub salary: f64,
    pub career_growth: f64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl RatingSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return RatingSummary::default();
        }
        let n = reviews.len() as f64;
        let avg = |pick: fn(&Ratings) -> i32| {
            round1(reviews.iter().map(|r| pick(&r.ratings) as f64).sum::<f64>() / n)
        };
        RatingSummary {
            total_reviews: reviews.len() as u64,
            overall: avg(|r| r.overall),
            work_culture: avg(|r| r.work_culture),
            salary: avg(|r| r.salary),
            career_growth: avg(|r| r.career_growth),
        }
    }
}

#[cfg(test)]
pub fn sample_review(recruiter: ObjectId, reviewer: ObjectId, flagged: bool) -> Review {
    Review {
        id: None,
        recruiter,
        reviewer,
        ratings: Ratings {
            overall: 4,
            work_culture: 3,
            salary: 5,
            career_growth: 4,
        },
        comment: "Decent place".into(),
        flagged,
        ai_analysis: None,
        created_at: crate::utils::time::now_millis(),
        updated_at: crate::utils::time::now_millis(),
    }
}
