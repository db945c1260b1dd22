//! Fetching referral target pages and reducing them to readable text.

pub mod extractor;
pub mod html;

pub use extractor::{ContentExtractor, FetchError};
