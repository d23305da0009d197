//! Display components
//!
//! Each component is a pure function from fetched records to an HTML
//! fragment. None of them perform I/O; image URLs are derived locally.

mod alert_banner;
mod avatar;
mod cover_image;
mod date;
mod onboarding;
mod portable_text;
mod stories;

pub use alert_banner::alert_banner;
pub use avatar::avatar;
pub use cover_image::cover_image;
pub use date::date;
pub use onboarding::onboarding;
pub use portable_text::portable_text;
pub use stories::{hero_post, more_stories};
