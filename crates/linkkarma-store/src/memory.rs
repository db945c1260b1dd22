//! In-memory showcase store.
//!
//! Stands in for a real database: a `Vec<Showcase>` behind a lock, with an
//! artificial delay on every call so callers exercise their loading states.
//! Contents live only as long as the process. Writes are last-write-wins.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use linkkarma_core::{Showcase, ShowcaseContent, ShowcaseStatus};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::repository::{NewShowcase, ShowcaseFilter, ShowcaseRepository, ShowcaseUpdate, SortOrder};
use crate::seed::seed_showcases;
use crate::StoreError;

pub struct MemoryStore {
    showcases: RwLock<Vec<Showcase>>,
    latency: Duration,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl MemoryStore {
    /// Empty store with the given simulated latency per call.
    pub fn new(latency: Duration) -> Self {
        Self {
            showcases: RwLock::new(Vec::new()),
            latency,
        }
    }

    /// Store pre-populated with the demo showcases.
    pub fn with_seed_data(latency: Duration) -> Self {
        let showcases = seed_showcases();
        info!(count = showcases.len(), "seeded showcase store");
        Self {
            showcases: RwLock::new(showcases),
            latency,
        }
    }

    pub async fn len(&self) -> usize {
        self.showcases.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.showcases.read().await.is_empty()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn sort_showcases(showcases: &mut [Showcase], order: SortOrder) {
    match order {
        SortOrder::Newest => showcases.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Popular => showcases.sort_by(|a, b| {
            b.karma_boost
                .cmp(&a.karma_boost)
                .then_with(|| b.created_at.cmp(&a.created_at))
        }),
        // `None < Some(_)`, so descending order puts never-featured last.
        SortOrder::Featured => showcases.sort_by(|a, b| b.featured_until.cmp(&a.featured_until)),
    }
}

fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

#[async_trait]
impl ShowcaseRepository for MemoryStore {
    async fn list(&self, filter: &ShowcaseFilter) -> Result<Vec<Showcase>, StoreError> {
        self.simulate_latency().await;
        let mut matched: Vec<Showcase> = self
            .showcases
            .read()
            .await
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        sort_showcases(&mut matched, filter.sort);
        debug!(count = matched.len(), sort = ?filter.sort, "listed showcases");
        Ok(matched)
    }

    async fn get(&self, id: &str) -> Result<Showcase, StoreError> {
        self.simulate_latency().await;
        self.showcases
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, new: NewShowcase) -> Result<Showcase, StoreError> {
        require_text("user_id", &new.user_id)?;
        require_text("title", &new.title)?;
        require_text("referral_url", &new.referral_url)?;
        self.simulate_latency().await;

        let now = Utc::now();
        let showcase = Showcase {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            referral_url: new.referral_url,
            category: new.category,
            status: ShowcaseStatus::Draft,
            content: ShowcaseContent::default(),
            karma_boost: 0,
            featured_until: None,
            security_check: new.security_check,
            created_at: now,
            updated_at: now,
        };
        self.showcases.write().await.push(showcase.clone());
        info!(id = %showcase.id, user_id = %showcase.user_id, "showcase created");
        Ok(showcase)
    }

    async fn update(&self, id: &str, update: ShowcaseUpdate) -> Result<Showcase, StoreError> {
        if let Some(title) = &update.title {
            require_text("title", title)?;
        }
        self.simulate_latency().await;

        let mut showcases = self.showcases.write().await;
        let showcase = showcases
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(title) = update.title {
            showcase.title = title;
        }
        if let Some(description) = update.description {
            showcase.description = description;
        }
        if let Some(referral_url) = update.referral_url {
            showcase.referral_url = referral_url;
        }
        if let Some(category) = update.category {
            showcase.category = category;
        }
        if let Some(status) = update.status {
            showcase.status = status;
        }
        if let Some(patch) = update.content {
            showcase.content.merge(patch);
        }
        if let Some(check) = update.security_check {
            showcase.security_check = Some(check);
        }
        showcase.updated_at = Utc::now();

        info!(id, "showcase updated");
        Ok(showcase.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut showcases = self.showcases.write().await;
        let index = showcases
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        showcases.remove(index);
        info!(id, "showcase deleted");
        Ok(())
    }

    async fn boost(
        &self,
        id: &str,
        karma: i64,
        featured_for: TimeDelta,
    ) -> Result<Showcase, StoreError> {
        if karma <= 0 {
            return Err(StoreError::Invalid("karma must be positive".into()));
        }
        self.simulate_latency().await;

        let mut showcases = self.showcases.write().await;
        let showcase = showcases
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let now = Utc::now();
        let start = showcase.featured_until.filter(|until| *until > now).unwrap_or(now);
        let until = start
            .checked_add_signed(featured_for)
            .ok_or_else(|| StoreError::Invalid("featured window out of range".into()))?;
        showcase.karma_boost = showcase.karma_boost.saturating_add(karma);
        showcase.featured_until = Some(until);
        showcase.updated_at = now;

        info!(id, karma, total = showcase.karma_boost, "showcase boosted");
        Ok(showcase.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkkarma_core::{Category, ContentPatch, FaqItem};

    fn new_showcase(user: &str, title: &str, category: Category) -> NewShowcase {
        NewShowcase {
            user_id: user.into(),
            title: title.into(),
            description: format!("Indicação {title}"),
            referral_url: "https://example.com/r/abc".into(),
            category,
            security_check: None,
        }
    }

    #[tokio::test]
    async fn create_starts_as_empty_draft() {
        let store = MemoryStore::default();
        let created = store
            .create(new_showcase("u1", "Nubank", Category::Banking))
            .await
            .unwrap();
        assert_eq!(created.status, ShowcaseStatus::Draft);
        assert!(created.content.is_empty());
        assert_eq!(created.karma_boost, 0);
        assert_eq!(store.get(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let store = MemoryStore::default();
        let err = store
            .create(new_showcase("u1", "  ", Category::Banking))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_merges_content() {
        let store = MemoryStore::default();
        let created = store
            .create(new_showcase("u1", "Inter", Category::Banking))
            .await
            .unwrap();

        store
            .update(
                &created.id,
                ShowcaseUpdate {
                    content: Some(ContentPatch {
                        what_is: Some("Banco digital".into()),
                        advantages: Some(vec!["a".into(), "b".into(), "c".into()]),
                        faq: Some(vec![FaqItem {
                            question: "q".into(),
                            answer: "a".into(),
                        }]),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store
            .update(
                &created.id,
                ShowcaseUpdate {
                    status: Some(ShowcaseStatus::Published),
                    content: Some(ContentPatch {
                        steps: Some(vec!["1".into(), "2".into(), "3".into()]),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ShowcaseStatus::Published);
        assert_eq!(updated.content.what_is, "Banco digital");
        assert_eq!(updated.content.advantages.len(), 3);
        assert_eq!(updated.content.steps.len(), 3);
        assert_eq!(updated.content.faq.len(), 1);
        assert_eq!(updated.title, "Inter");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryStore::default();
        assert!(matches!(store.get("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update("nope", ShowcaseUpdate::default()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete("nope").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes() {
        let store = MemoryStore::default();
        let a = store.create(new_showcase("u1", "A", Category::Other)).await.unwrap();
        let b = store.create(new_showcase("u1", "B", Category::Other)).await.unwrap();
        store.delete(&a.id).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&b.id).await.unwrap().title, "B");
    }

    #[tokio::test]
    async fn list_filters_by_category_owner_and_search() {
        let store = MemoryStore::default();
        store.create(new_showcase("u1", "Nubank", Category::Banking)).await.unwrap();
        store.create(new_showcase("u2", "Binance", Category::Crypto)).await.unwrap();
        store.create(new_showcase("u1", "Coinbase", Category::Crypto)).await.unwrap();

        let crypto = store
            .list(&ShowcaseFilter {
                category: Some(Category::Crypto),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(crypto.len(), 2);

        let mine = store
            .list(&ShowcaseFilter {
                user_id: Some("u1".into()),
                category: Some(Category::Crypto),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Coinbase");

        let search = store
            .list(&ShowcaseFilter {
                search: Some("BINAN".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(search.len(), 1);

        let by_description = store
            .list(&ShowcaseFilter {
                search: Some("indicação nubank".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_description.len(), 1);
    }

    #[tokio::test]
    async fn sort_orders() {
        let store = MemoryStore::default();
        let first = store.create(new_showcase("u", "first", Category::Other)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = store.create(new_showcase("u", "second", Category::Other)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let third = store.create(new_showcase("u", "third", Category::Other)).await.unwrap();

        store.boost(&first.id, 50, TimeDelta::hours(1)).await.unwrap();
        store.boost(&second.id, 10, TimeDelta::hours(48)).await.unwrap();

        let titles = |v: Vec<Showcase>| v.into_iter().map(|s| s.title).collect::<Vec<_>>();

        let newest = store.list(&ShowcaseFilter::default()).await.unwrap();
        assert_eq!(titles(newest), ["third", "second", "first"]);

        let popular = store
            .list(&ShowcaseFilter {
                sort: SortOrder::Popular,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(popular), ["first", "second", "third"]);

        let featured = store
            .list(&ShowcaseFilter {
                sort: SortOrder::Featured,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(featured), ["second", "first", "third"]);
        assert!(store.get(&third.id).await.unwrap().featured_until.is_none());
    }

    #[tokio::test]
    async fn boost_extends_active_window() {
        let store = MemoryStore::default();
        let s = store.create(new_showcase("u", "x", Category::Other)).await.unwrap();

        let once = store.boost(&s.id, 10, TimeDelta::hours(2)).await.unwrap();
        let twice = store.boost(&s.id, 5, TimeDelta::hours(2)).await.unwrap();

        assert_eq!(twice.karma_boost, 15);
        let first_end = once.featured_until.unwrap();
        let second_end = twice.featured_until.unwrap();
        assert!(second_end - first_end >= TimeDelta::hours(2) - TimeDelta::seconds(1));
    }

    #[tokio::test]
    async fn boost_rejects_non_positive_karma() {
        let store = MemoryStore::default();
        let s = store.create(new_showcase("u", "x", Category::Other)).await.unwrap();
        assert!(matches!(
            store.boost(&s.id, 0, TimeDelta::hours(1)).await,
            Err(StoreError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn seeded_store_lists_demo_data() {
        let store = MemoryStore::with_seed_data(Duration::from_millis(1));
        let all = store.list(&ShowcaseFilter::default()).await.unwrap();
        assert!(!all.is_empty());
        assert!(all.iter().all(|s| !s.id.is_empty()));
    }
}
