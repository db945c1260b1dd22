//! Showcase storage: a repository seam plus the in-memory mock store.

mod error;
pub use error::StoreError;

mod memory;
pub use memory::MemoryStore;

mod repository;
pub use repository::{NewShowcase, ShowcaseFilter, ShowcaseRepository, ShowcaseUpdate, SortOrder};

mod seed;
pub use seed::seed_showcases;
