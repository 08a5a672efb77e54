pub mod admin;
pub mod api;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod media;
pub mod models;
pub mod session;
pub mod upload;

pub use admin::AdminDashboard;
pub use api::ApiClient;
pub use config::{ClientConfig, resolve_session_path};
pub use errors::{ApiError, ApiResult};
pub use session::{AdminSession, SessionStore};
