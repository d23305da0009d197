//! Configuration module

mod site;

pub use site::DemoConfig;
pub use site::PreviewConfig;
pub use site::SanityConfig;
pub use site::SiteConfig;
pub use site::{PREVIEW_SECRET_ENV, TOKEN_ENV};
