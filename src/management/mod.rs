mod auth;
mod watermark;

pub use auth::TokenManager;
pub use watermark::WatermarkManager;
