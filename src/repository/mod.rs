//! 产品存储层

mod memory;
mod postgres;

pub use memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;

use async_trait::async_trait;

use crate::domain::{NewProduct, Product, ProductId, ProductPatch};
use crate::error::AppResult;
use crate::pagination::Pagination;

/// 产品仓储接口
///
/// Postgres 为生产实现；内存实现用于未配置数据库的本地运行和测试
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 插入新产品，由实体层生成 ID 和时间戳
    async fn insert(&self, data: NewProduct) -> AppResult<Product>;

    /// 按 ID 查找
    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 分页列出产品，按 created_at 倒序；返回 (rows, 全表总数)
    async fn list(&self, pagination: &Pagination) -> AppResult<(Vec<Product>, u64)>;

    /// 部分更新；id 不存在时返回 None
    async fn update(&self, id: ProductId, patch: ProductPatch) -> AppResult<Option<Product>>;

    /// 删除；返回是否确实删掉了一行
    async fn delete(&self, id: ProductId) -> AppResult<bool>;

    /// 库存总值 Σ(price × quantity)，空表返回 0.0
    async fn total_balance(&self) -> AppResult<f64>;
}
