//! Repository for the `products` and `product_categories` tables.

use sqlx::PgPool;
use shelf_core::sort_code::SortCode;
use shelf_core::types::DbId;

use crate::models::product::{CreateProduct, Product};

/// Column list for the `products` table.
const COLUMNS: &str =
    "id, name, price, stock, popularity, release_date, is_active, created_at, updated_at";

/// `ORDER BY` clause for a fallback ordering, with a stable id tie-break.
///
/// Search ranking has no storefront score column here, so it degrades to
/// popularity order.
fn order_by(sort: SortCode) -> &'static str {
    match sort {
        SortCode::ReleaseDate => "p.release_date DESC, p.id",
        SortCode::Popularity | SortCode::SearchRanking => "p.popularity DESC, p.id",
        SortCode::CheapestPrice => "p.price ASC, p.id",
        SortCode::HighestPrice => "p.price DESC, p.id",
        SortCode::NameAsc => "p.name ASC, p.id",
        SortCode::NameDesc => "p.name DESC, p.id",
        SortCode::StockAsc => "p.stock ASC, p.id",
        SortCode::StockDesc => "p.stock DESC, p.id",
    }
}

/// Provides product CRUD and the fallback candidate stream for the
/// ordering engine.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, price, stock, popularity, release_date) \
             VALUES ($1, COALESCE($2, 0), COALESCE($3, 0), COALESCE($4, 0), COALESCE($5, now())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.stock)
            .bind(input.popularity)
            .bind(input.release_date)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Put a product into a category. Idempotent.
    pub async fn assign_category(
        pool: &PgPool,
        product_id: DbId,
        category_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO product_categories (product_id, category_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(product_id)
        .bind(category_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Soft-delete a product. Returns `false` if no row matched.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fallback candidate ids for a category window, in comparator order.
    ///
    /// `exclude` removes products already claimed by pinned slots so the
    /// merged window never repeats a product.
    pub async fn candidates(
        pool: &PgPool,
        category_id: DbId,
        sort: SortCode,
        exclude: &[DbId],
        offset: i64,
        limit: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT p.id FROM products p \
             JOIN product_categories pc ON pc.product_id = p.id \
             WHERE pc.category_id = $1 AND p.is_active AND p.id <> ALL($2) \
             ORDER BY {} \
             OFFSET $3 LIMIT $4",
            order_by(sort)
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(category_id)
            .bind(exclude)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Number of active products in a category outside the claimed set.
    ///
    /// The merged total is this plus the pinned slot count, so pins
    /// sourced from a linked category are not double-counted or lost.
    pub async fn count_candidates(
        pool: &PgPool,
        category_id: DbId,
        exclude: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products p \
             JOIN product_categories pc ON pc.product_id = p.id \
             WHERE pc.category_id = $1 AND p.is_active AND p.id <> ALL($2)",
        )
        .bind(category_id)
        .bind(exclude)
        .fetch_one(pool)
        .await
    }
}
