use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::media::MediaStore;
use crate::rate_limit::{ContactRateLimiter, LoginRateLimiter};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub media: Arc<dyn MediaStore>,
    pub contact_limiter: ContactRateLimiter,
    pub login_limiter: LoginRateLimiter,
}
