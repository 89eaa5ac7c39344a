use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CategoryStore, StoreError, StoreResult};
use crate::features::categories::models::{Category, CategoryChanges, NewCategory};

const CATEGORY_COLUMNS: &str =
    "id, parent_id, name, slug, description, image_url, is_active, created_at, updated_at";

/// Advisory lock serializing re-parenting writes ("category" in ASCII)
const TREE_LOCK_KEY: i64 = 0x6361_7465_676f_7279;

/// Translate Postgres constraint errors into store-level outcomes
fn handle_db_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        let constraint = db_err.constraint().unwrap_or_default().to_string();
        match db_err.code().as_deref() {
            Some("23505") => return StoreError::UniqueViolation(constraint),
            Some("23503") => return StoreError::ForeignKeyViolation(constraint),
            // categories_not_own_parent
            Some("23514") => return StoreError::CycleDetected,
            _ => {}
        }
    }

    StoreError::Database(e)
}

/// Category store backed by the Supabase Postgres database
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE slug = $1", CATEGORY_COLUMNS);
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn insert(&self, record: NewCategory) -> StoreResult<Category> {
        let query = format!(
            r#"
            INSERT INTO categories (name, slug, description, parent_id, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(&record.name)
            .bind(&record.slug)
            .bind(&record.description)
            .bind(record.parent_id)
            .bind(&record.image_url)
            .bind(record.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> StoreResult<Option<Category>> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        // Re-check acyclicity under a lock so concurrent re-parenting cannot
        // interleave between the check and the write.
        if let Some(Some(parent_id)) = changes.parent_id {
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(TREE_LOCK_KEY)
                .execute(&mut *tx)
                .await
                .map_err(handle_db_error)?;

            let would_cycle: bool = sqlx::query_scalar(
                r#"
                WITH RECURSIVE ancestors (id, parent_id) AS (
                    SELECT id, parent_id FROM categories WHERE id = $1
                    UNION
                    SELECT c.id, c.parent_id
                    FROM categories c
                    JOIN ancestors a ON c.id = a.parent_id
                )
                SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $2)
                "#,
            )
            .bind(parent_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;

            if would_cycle {
                return Err(StoreError::CycleDetected);
            }
        }

        let query = format!(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                parent_id = CASE WHEN $6 THEN $7 ELSE parent_id END,
                image_url = CASE WHEN $8 THEN $9 ELSE image_url END,
                is_active = COALESCE($10, is_active)
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let updated = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.slug)
            .bind(changes.description.is_some())
            .bind(changes.description.clone().flatten())
            .bind(changes.parent_id.is_some())
            .bind(changes.parent_id.flatten())
            .bind(changes.image_url.is_some())
            .bind(changes.image_url.clone().flatten())
            .bind(changes.is_active)
            .fetch_optional(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await.map_err(handle_db_error)?;
        Ok(updated)
    }

    async fn list(&self, is_active: Option<bool>) -> StoreResult<Vec<Category>> {
        let query = format!(
            r#"
            SELECT {}
            FROM categories
            WHERE ($1::BOOLEAN IS NULL OR is_active = $1)
            ORDER BY name ASC
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(is_active)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn parent_links(&self) -> StoreResult<HashMap<Uuid, Option<Uuid>>> {
        let rows: Vec<(Uuid, Option<Uuid>)> =
            sqlx::query_as("SELECT id, parent_id FROM categories")
                .fetch_all(&self.pool)
                .await
                .map_err(handle_db_error)?;

        Ok(rows.into_iter().collect())
    }

    async fn has_children(&self, id: Uuid) -> StoreResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE parent_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(handle_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
