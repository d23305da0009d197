//! Helper functions shared by components and pages
//!
//! Pure string helpers: URL building, date formatting, HTML escaping and
//! image URL derivation.

mod date;
mod html;
mod image;
mod url;

pub use self::date::*;
pub use self::html::*;
pub use self::image::*;
pub use self::url::*;
