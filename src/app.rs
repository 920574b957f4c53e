//! 应用装配

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::pagination::Pagination;
use crate::repository::ProductRepository;
use crate::routes::{health_routes, product_routes};

/// 共享应用状态
///
/// 仓储作为显式依赖注入，测试可以替换为内存实现
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ProductRepository>,
    pub default_pagination: Pagination,
    pub max_page_size: u32,
    pub allow_negative_quantity: bool,
}

impl AppState {
    pub fn new(repo: Arc<dyn ProductRepository>, config: &AppConfig) -> Self {
        Self {
            repo,
            default_pagination: Pagination {
                page: config.default_page,
                page_size: config.default_page_size,
            },
            max_page_size: config.max_page_size,
            allow_negative_quantity: config.allow_negative_quantity,
        }
    }

    /// 库存数校验，是否允许负数由配置决定
    pub fn check_quantity(&self, quantity: i64) -> AppResult<()> {
        if !self.allow_negative_quantity && quantity < 0 {
            return Err(AppError::validation("quantity must be non-negative."));
        }
        Ok(())
    }
}

/// 构建完整路由，挂载请求日志与 CORS（所有来源）
pub fn build_router(state: AppState) -> Router {
    health_routes()
        .merge(product_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
