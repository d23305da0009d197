//! Content module - queries, sources and the records they return

mod dataset;
mod error;
mod fetch;
mod portable;
mod post;
mod queries;
mod sanity;
mod source;
pub mod stega;

pub use dataset::DatasetSource;
pub use error::ContentError;
pub use fetch::{DraftMode, FetchOptions, FetchPlan, Fetcher};
pub use portable::{to_plain_text, MarkDef, PortableBlock, Span, TextBlock};
pub use post::{
    AssetRef, Author, Crop, Hotspot, OgImage, Post, PostStatus, SanityImage, Settings, Slug,
    SlugEntry,
};
pub use queries::Query;
pub use sanity::SanityClient;
pub use source::{ContentSource, Perspective, QueryFuture, QueryRequest};
