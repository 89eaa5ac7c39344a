use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::error::CategoryError;
use crate::features::categories::models::{CategoryChanges, NewCategory};
use crate::features::categories::stores::{CategoryStore, StoreError};

type Result<T> = std::result::Result<T, CategoryError>;

fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

/// Blank optional text means "no value"
fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Would pointing `target` at `candidate_parent` close a loop?
///
/// Walks up from `candidate_parent` over an `id -> parent_id` snapshot. The
/// walk takes at most `links.len() + 1` steps; running past that means the
/// existing links already loop, which is reported as a cycle too.
pub(crate) fn creates_cycle(
    links: &HashMap<Uuid, Option<Uuid>>,
    target: Uuid,
    candidate_parent: Uuid,
) -> bool {
    let mut current = Some(candidate_parent);

    for _ in 0..=links.len() {
        match current {
            Some(id) if id == target => return true,
            Some(id) => current = links.get(&id).copied().flatten(),
            None => return false,
        }
    }

    true
}

fn store_failure(context: &str, err: StoreError) -> CategoryError {
    tracing::error!("Category store failure while {}: {:?}", context, err);
    CategoryError::StoreFailure(err)
}

/// Service maintaining the category forest: unique slugs, existing parents, no cycles
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Create a category
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let record = NewCategory {
            name: normalize_name(&dto.name),
            slug: normalize_slug(&dto.slug),
            description: dto.description.as_deref().and_then(normalize_optional),
            parent_id: dto.parent_id,
            image_url: dto.image_url.as_deref().and_then(normalize_optional),
            is_active: dto.is_active.unwrap_or(true),
        };

        if self
            .store
            .find_by_slug(&record.slug)
            .await
            .map_err(|e| store_failure("checking slug", e))?
            .is_some()
        {
            tracing::warn!("Rejected category create: slug '{}' taken", record.slug);
            return Err(CategoryError::DuplicateSlug(record.slug));
        }

        if let Some(parent_id) = record.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }

        let slug = record.slug.clone();
        let parent_id = record.parent_id;
        let category = self.store.insert(record).await.map_err(|e| match e {
            StoreError::UniqueViolation(_) => CategoryError::DuplicateSlug(slug),
            StoreError::ForeignKeyViolation(_) => {
                CategoryError::ParentNotFound(parent_id.unwrap_or_default())
            }
            other => store_failure("inserting category", other),
        })?;

        tracing::info!("Category created: {} ({})", category.id, category.slug);
        Ok(category.into())
    }

    /// Apply a partial update to a category
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let existing = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("loading category", e))?
            .ok_or(CategoryError::NotFound(id))?;

        let mut changes = CategoryChanges {
            name: dto.name.as_deref().map(normalize_name),
            slug: dto.slug.as_deref().map(normalize_slug),
            description: dto
                .description
                .map(|d| d.as_deref().and_then(normalize_optional)),
            parent_id: dto.parent_id,
            image_url: dto
                .image_url
                .map(|u| u.as_deref().and_then(normalize_optional)),
            is_active: dto.is_active,
        };

        if let Some(slug) = changes.slug.as_deref().filter(|s| *s != existing.slug) {
            let holder = self
                .store
                .find_by_slug(slug)
                .await
                .map_err(|e| store_failure("checking slug", e))?;
            if holder.is_some_and(|other| other.id != id) {
                tracing::warn!("Rejected update of {}: slug '{}' taken", id, slug);
                return Err(CategoryError::DuplicateSlug(slug.to_string()));
            }
        }

        let requested_parent = changes.parent_id;
        match requested_parent {
            Some(new_parent) if new_parent == existing.parent_id => changes.parent_id = None,
            Some(Some(parent_id)) => {
                if parent_id == id {
                    tracing::warn!("Rejected update of {}: self parent", id);
                    return Err(CategoryError::SelfParent);
                }
                self.ensure_parent_exists(parent_id).await?;

                let links = self
                    .store
                    .parent_links()
                    .await
                    .map_err(|e| store_failure("loading parent links", e))?;
                if creates_cycle(&links, id, parent_id) {
                    tracing::warn!("Rejected update of {}: {} is a descendant", id, parent_id);
                    return Err(CategoryError::CircularReference);
                }
            }
            _ => {}
        }

        let slug = changes.slug.clone().unwrap_or_default();
        let parent_id = changes.parent_id.flatten().unwrap_or_default();
        let category = self
            .store
            .update(id, changes)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => CategoryError::DuplicateSlug(slug),
                StoreError::ForeignKeyViolation(_) => CategoryError::ParentNotFound(parent_id),
                StoreError::CycleDetected => CategoryError::CircularReference,
                other => store_failure("updating category", other),
            })?
            .ok_or(CategoryError::NotFound(id))?;

        tracing::info!("Category updated: {} ({})", category.id, category.slug);
        Ok(category.into())
    }

    /// Get a single category
    pub async fn get(&self, id: Uuid) -> Result<CategoryResponseDto> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("loading category", e))?
            .map(Into::into)
            .ok_or(CategoryError::NotFound(id))
    }

    /// List categories ordered by name (flat list)
    pub async fn list(&self, is_active: Option<bool>) -> Result<Vec<CategoryResponseDto>> {
        let categories = self
            .store
            .list(is_active)
            .await
            .map_err(|e| store_failure("listing categories", e))?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// List categories as tree structure
    pub async fn list_tree(&self, is_active: Option<bool>) -> Result<Vec<CategoryTreeDto>> {
        let categories = self
            .store
            .list(is_active)
            .await
            .map_err(|e| store_failure("listing categories", e))?;

        Ok(CategoryTreeDto::build_tree(categories))
    }

    /// Delete a leaf category
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("loading category", e))?
            .is_none()
        {
            return Err(CategoryError::NotFound(id));
        }

        if self
            .store
            .has_children(id)
            .await
            .map_err(|e| store_failure("checking children", e))?
        {
            tracing::warn!("Rejected delete of {}: has children", id);
            return Err(CategoryError::HasChildren(id));
        }

        let deleted = self.store.delete(id).await.map_err(|e| match e {
            StoreError::ForeignKeyViolation(_) => CategoryError::HasChildren(id),
            other => store_failure("deleting category", other),
        })?;
        if !deleted {
            return Err(CategoryError::NotFound(id));
        }

        tracing::info!("Category deleted: {}", id);
        Ok(())
    }

    async fn ensure_parent_exists(&self, parent_id: Uuid) -> Result<()> {
        let parent = self
            .store
            .find_by_id(parent_id)
            .await
            .map_err(|e| store_failure("loading parent", e))?;

        if parent.is_none() {
            tracing::warn!("Rejected category mutation: parent {} not found", parent_id);
            return Err(CategoryError::ParentNotFound(parent_id));
        }
        Ok(())
    }
}
