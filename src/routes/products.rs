//! 产品 CRUD 路由

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::domain::{NewProduct, Product, ProductId, ProductPatch};
use crate::error::{AppError, AppResult};
use crate::pagination::{PageMeta, Pagination};

pub fn product_routes() -> Router<AppState> {
    let collection = get(list_products).post(create_product);
    let item = get(get_product)
        .patch(update_product)
        .delete(delete_product);

    // 带斜杠和不带斜杠的集合路径都接受
    Router::new()
        .route("/products", collection.clone())
        .route("/products/", collection)
        .route("/products/total_balance", get(total_balance))
        .route("/products/{id}", item)
}

/// 创建请求体，三个字段都必填；未知字段拒绝
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// 部分更新请求体，任意子集；未知字段拒绝
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub items: Vec<Product>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct TotalBalanceResponse {
    pub total_balance: f64,
}

/// 路径 ID 必须是 UUID；格式错误返回 400，与 404 区分
fn parse_product_id(raw: &str) -> AppResult<ProductId> {
    ProductId::from_string(raw)
        .map_err(|_| AppError::validation("Invalid product ID format. Must be a UUID."))
}

async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let Json(req) = payload.map_err(|e| AppError::validation(e.body_text()))?;
    state.check_quantity(req.quantity)?;

    let product = state
        .repo
        .insert(NewProduct {
            name: req.name,
            price: req.price,
            quantity: req.quantity,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<ProductListResponse>> {
    let Query(params) =
        params.map_err(|_| AppError::validation("page and page_size must be integers."))?;

    let pagination = Pagination::clamped(
        params.page,
        params.page_size,
        state.default_pagination,
        state.max_page_size,
    );

    let (items, total) = state.repo.list(&pagination).await?;
    let meta = PageMeta::new(total, &pagination);

    Ok(Json(ProductListResponse { items, meta }))
}

async fn total_balance(State(state): State<AppState>) -> AppResult<Json<TotalBalanceResponse>> {
    let total_balance = state.repo.total_balance().await?;
    Ok(Json(TotalBalanceResponse { total_balance }))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = parse_product_id(&id)?;

    let product = state
        .repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found."))?;

    Ok(Json(product))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let id = parse_product_id(&id)?;
    let Json(req) = payload.map_err(|e| AppError::validation(e.body_text()))?;
    if let Some(quantity) = req.quantity {
        state.check_quantity(quantity)?;
    }

    let patch = ProductPatch {
        name: req.name,
        price: req.price,
        quantity: req.quantity,
    };

    let product = state
        .repo
        .update(id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found."))?;

    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_product_id(&id)?;

    if !state.repo.delete(id).await? {
        return Err(AppError::not_found("Product not found."));
    }

    Ok(StatusCode::NO_CONTENT)
}
