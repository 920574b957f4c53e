//! HTTP 路由

mod health;
mod products;

pub use health::health_routes;
pub use products::product_routes;
