use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryStore, StoreError, StoreResult};
use crate::features::categories::models::{Category, CategoryChanges, NewCategory};

/// In-process store enforcing the same uniqueness and foreign-key rules as Postgres
#[derive(Default)]
pub struct MemoryCategoryStore {
    rows: RwLock<HashMap<Uuid, Category>>,
    writes: AtomicUsize,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful inserts, updates and deletes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Seed a row directly, bypassing every check
    pub async fn seed(&self, category: Category) {
        self.rows.write().await.insert(category.id, category);
    }

    fn slug_taken(rows: &HashMap<Uuid, Category>, slug: &str, except: Option<Uuid>) -> bool {
        rows.values().any(|c| c.slug == slug && Some(c.id) != except)
    }

    /// Does the ancestor chain of `from` pass through `target`? Loops count as yes.
    fn reaches(rows: &HashMap<Uuid, Category>, from: Uuid, target: Uuid) -> bool {
        let mut current = Some(from);
        for _ in 0..=rows.len() {
            match current {
                Some(id) if id == target => return true,
                Some(id) => current = rows.get(&id).and_then(|c| c.parent_id),
                None => return false,
            }
        }
        true
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|c| c.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, record: NewCategory) -> StoreResult<Category> {
        let mut rows = self.rows.write().await;

        if Self::slug_taken(&rows, &record.slug, None) {
            return Err(StoreError::UniqueViolation("categories_slug_key".to_string()));
        }
        if let Some(parent_id) = record.parent_id {
            if !rows.contains_key(&parent_id) {
                return Err(StoreError::ForeignKeyViolation(
                    "categories_parent_id_fkey".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            parent_id: record.parent_id,
            name: record.name,
            slug: record.slug,
            description: record.description,
            image_url: record.image_url,
            is_active: record.is_active,
            created_at: now,
            updated_at: now,
        };
        rows.insert(category.id, category.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(category)
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> StoreResult<Option<Category>> {
        let mut rows = self.rows.write().await;

        if !rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(slug) = &changes.slug {
            if Self::slug_taken(&rows, slug, Some(id)) {
                return Err(StoreError::UniqueViolation("categories_slug_key".to_string()));
            }
        }
        if let Some(Some(parent_id)) = changes.parent_id {
            if parent_id == id {
                return Err(StoreError::CycleDetected);
            }
            if !rows.contains_key(&parent_id) {
                return Err(StoreError::ForeignKeyViolation(
                    "categories_parent_id_fkey".to_string(),
                ));
            }
            if Self::reaches(&rows, parent_id, id) {
                return Err(StoreError::CycleDetected);
            }
        }

        let Some(category) = rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(category);
        category.updated_at = Utc::now();
        let updated = category.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(Some(updated))
    }

    async fn list(&self, is_active: Option<bool>) -> StoreResult<Vec<Category>> {
        let rows = self.rows.read().await;
        let mut categories: Vec<Category> = rows
            .values()
            .filter(|c| is_active.map_or(true, |active| c.is_active == active))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn parent_links(&self) -> StoreResult<HashMap<Uuid, Option<Uuid>>> {
        let rows = self.rows.read().await;
        Ok(rows.values().map(|c| (c.id, c.parent_id)).collect())
    }

    async fn has_children(&self, id: Uuid) -> StoreResult<bool> {
        let rows = self.rows.read().await;
        Ok(rows.values().any(|c| c.parent_id == Some(id)))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut rows = self.rows.write().await;

        if rows.values().any(|c| c.parent_id == Some(id)) {
            return Err(StoreError::ForeignKeyViolation(
                "categories_parent_id_fkey".to_string(),
            ));
        }

        let removed = rows.remove(&id).is_some();
        if removed {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_category(slug: &str, parent_id: Option<Uuid>) -> NewCategory {
        NewCategory {
            name: slug.to_string(),
            slug: slug.to_string(),
            description: None,
            parent_id,
            image_url: None,
            is_active: true,
        }
    }

    fn reparent(parent_id: Uuid) -> CategoryChanges {
        CategoryChanges {
            parent_id: Some(Some(parent_id)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_refuses_to_close_a_loop() {
        let store = MemoryCategoryStore::new();
        let a = store.insert(new_category("a-root", None)).await.unwrap();
        let b = store.insert(new_category("b-child", Some(a.id))).await.unwrap();
        let writes = store.write_count();

        let result = store.update(a.id, reparent(b.id)).await;

        assert!(matches!(result, Err(StoreError::CycleDetected)));
        assert_eq!(store.write_count(), writes);
        assert_eq!(store.find_by_id(a.id).await.unwrap().unwrap().parent_id, None);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_slug_and_missing_parent() {
        let store = MemoryCategoryStore::new();
        let a = store.insert(new_category("shoes", None)).await.unwrap();
        let b = store.insert(new_category("bags", None)).await.unwrap();

        let taken = store
            .update(
                b.id,
                CategoryChanges {
                    slug: Some("shoes".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(taken, Err(StoreError::UniqueViolation(_))));

        let orphaned = store.update(a.id, reparent(Uuid::new_v4())).await;
        assert!(matches!(orphaned, Err(StoreError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_update_moves_under_unrelated_branch() {
        let store = MemoryCategoryStore::new();
        let a = store.insert(new_category("a-root", None)).await.unwrap();
        let b = store.insert(new_category("b-child", Some(a.id))).await.unwrap();
        let c = store.insert(new_category("c-root", None)).await.unwrap();

        let moved = store.update(b.id, reparent(c.id)).await.unwrap().unwrap();

        assert_eq!(moved.parent_id, Some(c.id));
    }
}
