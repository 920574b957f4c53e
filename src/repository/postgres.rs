//! PostgreSQL 产品仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::warn;
use uuid::Uuid;

use super::ProductRepository;
use crate::domain::{NewProduct, Product, ProductId, ProductPatch};
use crate::error::{AppError, AppResult};
use crate::pagination::Pagination;

/// 建表语句，启动时执行，幂等
const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    price DOUBLE PRECISION NOT NULL,
    quantity BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)
"#;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建连接池
    pub async fn connect(url: &str, max_connections: u32) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))?;
        Ok(Self::new(pool))
    }

    /// 确保 products 表存在
    pub async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create products table: {}", e)))?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    price: f64,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// SQLSTATE 22 类（数据异常）和 23 类（完整性约束）视为客户端数据问题，
/// 其余一律归为存储故障。约束细节只进日志，不回传客户端
fn map_store_error(context: &str, e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) => {
            warn!(error = %db, code = ?db.code(), "{}", context);
            let is_data_error = db
                .code()
                .map(|c| c.starts_with("22") || c.starts_with("23"))
                .unwrap_or(false);
            if is_data_error {
                AppError::constraint("Invalid product data or duplicate constraint violation.")
            } else {
                AppError::database(format!("{}: {}", context, e))
            }
        }
        _ => AppError::database(format!("{}: {}", context, e)),
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert(&self, data: NewProduct) -> AppResult<Product> {
        let product = Product::new(data);

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_store_error("Failed to insert product", e))?;

        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find product: {}", e)))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, pagination: &Pagination) -> AppResult<(Vec<Product>, u64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count products: {}", e)))?;

        // id 倒序兜底：created_at 相同时保持插入序稳定（UUIDv7 按时间递增）
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, id DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(pagination.offset() as i64)
        .bind(i64::from(pagination.limit()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list products: {}", e)))?;

        Ok((rows.into_iter().map(Into::into).collect(), total as u64))
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> AppResult<Option<Product>> {
        // 空 patch 不触发写入，也不刷新 updated_at
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                price = COALESCE($3, price),
                quantity = COALESCE($4, quantity),
                updated_at = $5
            WHERE id = $1
            RETURNING id, name, price, quantity, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(patch.name)
        .bind(patch.price)
        .bind(patch.quantity)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_store_error("Failed to update product", e))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: ProductId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete product: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn total_balance(&self) -> AppResult<f64> {
        let total: f64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(price * quantity), 0.0) FROM products")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to compute total balance: {}", e)))?;

        Ok(total)
    }
}
