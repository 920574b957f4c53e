//! 产品实体

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 产品 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// 产品实体
///
/// created_at 创建后不变；updated_at 在每次有效变更时刷新
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// 创建新产品，生成 ID 并设置两个时间戳为同一时刻
    pub fn new(data: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: data.name,
            price: data.price,
            quantity: data.quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// 应用部分更新
    ///
    /// 空 patch 不刷新 updated_at
    pub fn apply(&mut self, patch: ProductPatch) {
        if patch.is_empty() {
            return;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        self.updated_at = Utc::now();
    }
}

/// 新建产品的字段
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// 部分更新的字段，None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.quantity.is_none()
    }
}
