pub mod application;
pub mod dashboard;
pub mod forum;
pub mod job;
pub mod moderation;
pub mod notification;
pub mod review;
pub mod user;

pub use application::*;
pub use dashboard::*;
pub use forum::*;
pub use job::*;
pub use moderation::*;
pub use notification::*;
pub use review::*;
pub use user::*;
