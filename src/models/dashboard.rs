use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Saved jobs, one document per user (collection "dashboards")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    #[serde(default)]
    pub saved_jobs: Vec<ObjectId>,
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobIdRequest {
    pub job_id: String,
}
