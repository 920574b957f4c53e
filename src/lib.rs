//! Products API - 产品 CRUD 服务
//!
//! 单资源 REST 服务：产品的增删改查、分页列表与库存总值聚合

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod telemetry;
