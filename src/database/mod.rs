pub mod store;
mod mongo_store;
#[cfg(test)]
pub mod memory;

pub use store::*;

use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

pub const USERS: &str = "users";
pub const JOBS: &str = "jobs";
pub const APPLICATIONS: &str = "applications";
pub const NOTIFICATIONS: &str = "notifications";
pub const DASHBOARDS: &str = "dashboards";
pub const REVIEWS: &str = "reviews";
pub const FORUM_POSTS: &str = "forumposts";
pub const FORUM_COMMENTS: &str = "forumcomments";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique indexes back the uniqueness rules (email, userId, one application
    /// per job/user, one dashboard per user); the rest serve the lookups.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let indexes: Vec<(&str, Document, bool)> = vec![
            (USERS, doc! { "email": 1 }, true),
            (USERS, doc! { "userId": 1 }, true),
            (APPLICATIONS, doc! { "job": 1, "user": 1 }, true),
            (APPLICATIONS, doc! { "user": 1, "createdAt": -1 }, false),
            (DASHBOARDS, doc! { "user": 1 }, true),
            (JOBS, doc! { "recruiter": 1 }, false),
            (REVIEWS, doc! { "recruiter": 1 }, false),
            (REVIEWS, doc! { "flagged": 1 }, false),
            (FORUM_POSTS, doc! { "flagged": 1 }, false),
            (FORUM_COMMENTS, doc! { "post": 1 }, false),
            (FORUM_COMMENTS, doc! { "flagged": 1 }, false),
            (NOTIFICATIONS, doc! { "user": 1, "createdAt": -1 }, false),
        ];

        for (collection, keys, unique) in indexes {
            let label = format!("{}({})", collection, keys.keys().cloned().collect::<Vec<_>>().join(", "));
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(unique).build())
                .build();

            match self.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index ready: {}", label),
                Err(e) if unique => {
                    log::error!("❌ Unique index {} could not be created: {}", label, e);
                    return Err(e.into());
                }
                Err(e) => log::warn!("   ⚠️  Index {} could not be created: {}", label, e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Check if the connection is healthy
    pub async fn health_check(&self) -> bool {
        self.db.run_command(doc! { "ping": 1 }).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let db = MongoDB::new(&uri, "placement-hub-test").await;
        assert!(db.is_ok());
        assert!(db.unwrap().health_check().await);
    }

    #[actix_rt::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_startup_fails_when_unique_index_cannot_be_built() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let name = format!("placement-hub-dup-{}", mongodb::bson::oid::ObjectId::new().to_hex());

        let client = Client::with_uri_str(&uri).await.unwrap();
        let users = client.database(&name).collection::<Document>(USERS);
        users
            .insert_many(vec![
                doc! { "email": "twin@g.bracu.ac.bd", "userId": "twin" },
                doc! { "email": "twin@g.bracu.ac.bd", "userId": "twin2" },
            ])
            .await
            .unwrap();

        assert!(MongoDB::new(&uri, &name).await.is_err());

        client.database(&name).drop().await.unwrap();
    }
}
