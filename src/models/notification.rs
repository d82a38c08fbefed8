use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Collection "notifications"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: i64,
}

impl Notification {
    pub fn new(user: ObjectId, message: impl Into<String>, now: i64) -> Self {
        Notification {
            id: None,
            user,
            message: message.into(),
            read: false,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    #[serde(rename = "_id")]
    pub id: String,
    pub message: String,
    pub read: bool,
    pub created_at: i64,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        NotificationView {
            id: n.id.map(|id| id.to_hex()).unwrap_or_default(),
            message: n.message.clone(),
            read: n.read,
            created_at: n.created_at,
        }
    }
}
