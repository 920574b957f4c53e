//! 内存版产品仓储
//!
//! 未配置数据库时的本地运行方案，不做持久化；测试也用它替换真实存储

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProductRepository;
use crate::domain::{NewProduct, Product, ProductId, ProductPatch};
use crate::error::AppResult;
use crate::pagination::Pagination;

pub struct InMemoryProductRepository {
    rows: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, data: NewProduct) -> AppResult<Product> {
        let product = Product::new(data);
        self.rows.write().await.push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, pagination: &Pagination) -> AppResult<(Vec<Product>, u64)> {
        let rows = self.rows.read().await;
        let total = rows.len() as u64;

        // 与 Postgres 实现同序：created_at 倒序，id 倒序兜底
        let mut sorted: Vec<Product> = rows.clone();
        sorted.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.0.cmp(&a.id.0))
        });

        let items = sorted
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect();

        Ok((items, total))
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> AppResult<Option<Product>> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.apply(patch);
                Ok(Some(product.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: ProductId) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }

    async fn total_balance(&self) -> AppResult<f64> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .map(|p| p.price * p.quantity as f64)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, price: f64, quantity: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let repo = InMemoryProductRepository::new();
        let first = repo.insert(new_product("first", 1.0, 1)).await.unwrap();
        let second = repo.insert(new_product("second", 1.0, 1)).await.unwrap();
        let third = repo.insert(new_product("third", 1.0, 1)).await.unwrap();

        let (items, total) = repo.list(&Pagination::default()).await.unwrap();
        assert_eq!(total, 3);
        let ids: Vec<_> = items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_total_is_independent_of_page() {
        let repo = InMemoryProductRepository::new();
        for i in 0..5 {
            repo.insert(new_product(&format!("p{}", i), 1.0, 1))
                .await
                .unwrap();
        }

        let page = Pagination {
            page: 2,
            page_size: 2,
        };
        let (items, total) = repo.list(&page).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(total, 5);

        let out_of_range = Pagination {
            page: 99,
            page_size: 2,
        };
        let (items, total) = repo.list(&out_of_range).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = InMemoryProductRepository::new();
        let result = repo
            .update(ProductId::new(), ProductPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let repo = InMemoryProductRepository::new();
        let product = repo.insert(new_product("doomed", 1.0, 1)).await.unwrap();

        assert!(repo.delete(product.id).await.unwrap());
        assert!(repo.find_by_id(product.id).await.unwrap().is_none());
        assert!(!repo.delete(product.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_total_balance() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(repo.total_balance().await.unwrap(), 0.0);

        repo.insert(new_product("a", 2.5, 4)).await.unwrap();
        repo.insert(new_product("b", 1.5, 2)).await.unwrap();
        assert_eq!(repo.total_balance().await.unwrap(), 13.0);
    }
}
