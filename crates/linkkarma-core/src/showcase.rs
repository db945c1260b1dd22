//! Showcase records and the AI-generated content that fills them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::security::SecurityCheckResult;

/// Lifecycle of a showcase. `Draft -> Published` is a one-way UI flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowcaseStatus {
    #[default]
    Draft,
    Published,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Marketing copy rendered on a showcase page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseContent {
    pub what_is: String,
    pub advantages: Vec<String>,
    pub steps: Vec<String>,
    pub faq: Vec<FaqItem>,
}

impl ShowcaseContent {
    pub fn is_empty(&self) -> bool {
        self.what_is.is_empty()
            && self.advantages.is_empty()
            && self.steps.is_empty()
            && self.faq.is_empty()
    }

    /// Apply a partial update. Fields absent from `patch` keep their value.
    pub fn merge(&mut self, patch: ContentPatch) {
        if let Some(what_is) = patch.what_is {
            self.what_is = what_is;
        }
        if let Some(advantages) = patch.advantages {
            self.advantages = advantages;
        }
        if let Some(steps) = patch.steps {
            self.steps = steps;
        }
        if let Some(faq) = patch.faq {
            self.faq = faq;
        }
    }
}

/// Partial content update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_is: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advantages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq: Option<Vec<FaqItem>>,
}

/// A user-authored referral landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Showcase {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub referral_url: String,
    pub category: Category,
    pub status: ShowcaseStatus,
    pub content: ShowcaseContent,
    pub karma_boost: i64,
    pub featured_until: Option<DateTime<Utc>>,
    pub security_check: Option<SecurityCheckResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Output of one content-generation request, before it becomes a showcase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedShowcase {
    pub title: String,
    pub short_description: String,
    pub service_name: String,
    #[serde(flatten)]
    pub content: ShowcaseContent,
}

impl GeneratedShowcase {
    pub fn into_content(self) -> ShowcaseContent {
        self.content
    }
}

/// Readable data pulled from a referral target page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    pub title: String,
    pub description: String,
    pub text: String,
    /// True when the page could not be fetched and the fields were synthesized.
    pub degraded: bool,
}
