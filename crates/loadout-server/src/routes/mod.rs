//! HTTP routes.

pub mod auth;
pub mod health;
pub mod relay;

pub use auth::{CallbackQuery, callback_handler, login_handler};
pub use health::{HealthResponse, health_handler};
pub use relay::{ProfileRequest, public_milestones_handler, user_profile_handler};
