//! Core types and model-output handling shared across LinkKarma crates.

pub mod category;
pub mod domain;
pub mod repair;
pub mod response;
pub mod schema;
pub mod security;
pub mod showcase;

pub use category::{Category, UnknownCategory, UserTier};
pub use repair::{ParseError, repair_json};
pub use response::{parse_generated_showcase, parse_security_verdict};
pub use security::{SecurityCheckResult, SecurityDetails, SecurityStatus};
pub use showcase::{
    ContentPatch, ExtractedPage, FaqItem, GeneratedShowcase, Showcase, ShowcaseContent,
    ShowcaseStatus,
};
