use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::categories::models::Category;
use crate::shared::types::double_option;
use crate::shared::validation::{validate_optional_url, SLUG_REGEX};

/// Slug is checked the way it will be stored: trimmed and lower-cased
fn validate_slug(value: &str) -> Result<(), ValidationError> {
    let slug = value.trim().to_lowercase();
    let len = slug.chars().count();

    if !(2..=100).contains(&len) {
        return Err(ValidationError::new("length")
            .with_message("Slug must be between 2 and 100 characters".into()));
    }
    if !SLUG_REGEX.is_match(&slug) {
        return Err(ValidationError::new("slug").with_message(
            "Slug must be lowercase letters and numbers separated by single hyphens".into(),
        ));
    }

    Ok(())
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if !(2..=100).contains(&len) {
        return Err(ValidationError::new("length")
            .with_message("Name must be between 2 and 100 characters".into()));
    }
    Ok(())
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    /// URL-safe identifier, e.g. "mens-shoes"
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Parent category; omit for a root category
    pub parent_id: Option<Uuid>,

    #[validate(custom(function = "validate_optional_url"))]
    pub image_url: Option<String>,

    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Request DTO for updating a category
///
/// Omitted fields are left unchanged. `parent_id: null` turns the category
/// into a root; `null` or an empty string clears `description` and `image_url`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,

    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_optional_url"))]
    pub image_url: Option<Option<String>>,

    pub is_active: Option<bool>,
}

/// Query params for listing categories
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCategoriesQuery {
    /// Return a nested tree instead of a flat list (default: false)
    #[serde(default)]
    pub tree: bool,
    /// Filter by active flag
    pub is_active: Option<bool>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            image_url: c.image_url,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build tree from flat list of categories.
    ///
    /// Categories whose parent is not in the list (e.g. filtered out as
    /// inactive) are promoted to roots. Sibling order follows input order.
    pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryTreeDto> {
        let ids: HashSet<Uuid> = categories.iter().map(|c| c.id).collect();

        let mut children_of: HashMap<Uuid, Vec<&Category>> = HashMap::new();
        let mut roots: Vec<&Category> = Vec::new();
        for category in &categories {
            match category.parent_id {
                Some(parent_id) if ids.contains(&parent_id) => {
                    children_of.entry(parent_id).or_default().push(category)
                }
                _ => roots.push(category),
            }
        }

        roots
            .into_iter()
            .map(|root| Self::build_node(root, &children_of))
            .collect()
    }

    fn build_node(category: &Category, children_of: &HashMap<Uuid, Vec<&Category>>) -> Self {
        let children = children_of
            .get(&category.id)
            .map(|children| {
                children
                    .iter()
                    .map(|child| Self::build_node(child, children_of))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: category.id,
            parent_id: category.parent_id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            image_url: category.image_url.clone(),
            is_active: category.is_active,
            children,
        }
    }
}

/// Flat list or nested tree, depending on `?tree=`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryListDto {
    Flat(Vec<CategoryResponseDto>),
    Tree(Vec<CategoryTreeDto>),
}
