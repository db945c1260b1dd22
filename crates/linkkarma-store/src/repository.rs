use async_trait::async_trait;
use chrono::TimeDelta;
use linkkarma_core::{Category, ContentPatch, SecurityCheckResult, Showcase, ShowcaseStatus};
use serde::Deserialize;

use crate::StoreError;

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently created first.
    #[default]
    Newest,
    /// Highest karma boost first.
    Popular,
    /// Latest `featured_until` first; never-featured showcases last.
    Featured,
}

/// Listing filters. Every field is optional; an empty filter lists everything.
#[derive(Debug, Clone, Default)]
pub struct ShowcaseFilter {
    pub category: Option<Category>,
    pub status: Option<ShowcaseStatus>,
    pub user_id: Option<String>,
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl ShowcaseFilter {
    pub fn matches(&self, showcase: &Showcase) -> bool {
        if self.category.is_some_and(|c| c != showcase.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != showcase.status) {
            return false;
        }
        if let Some(user_id) = &self.user_id
            && user_id != &showcase.user_id
        {
            return false;
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            return showcase.title.to_lowercase().contains(&term)
                || showcase.description.to_lowercase().contains(&term);
        }
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewShowcase {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub referral_url: String,
    pub category: Category,
    #[serde(default)]
    pub security_check: Option<SecurityCheckResult>,
}

/// Partial update. `content` is merged field by field, everything else
/// replaces the stored value when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowcaseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub referral_url: Option<String>,
    pub category: Option<Category>,
    pub status: Option<ShowcaseStatus>,
    pub content: Option<ContentPatch>,
    pub security_check: Option<SecurityCheckResult>,
}

#[async_trait]
pub trait ShowcaseRepository: Send + Sync {
    async fn list(&self, filter: &ShowcaseFilter) -> Result<Vec<Showcase>, StoreError>;

    async fn get(&self, id: &str) -> Result<Showcase, StoreError>;

    /// Create a draft showcase with empty content.
    async fn create(&self, new: NewShowcase) -> Result<Showcase, StoreError>;

    async fn update(&self, id: &str, update: ShowcaseUpdate) -> Result<Showcase, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Spend karma on a showcase: adds to its boost and extends the featured
    /// window by `featured_for`, counted from now or from the current end of
    /// the window, whichever is later.
    async fn boost(
        &self,
        id: &str,
        karma: i64,
        featured_for: TimeDelta,
    ) -> Result<Showcase, StoreError>;
}
