//! 分页参数与分页元数据

use serde::{Deserialize, Serialize};

/// 分页参数（已钳制到合法范围）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl Pagination {
    /// 从请求参数构造
    ///
    /// page < 1 取 1；page_size 钳制到 [1, max_page_size]；
    /// 缺失的参数取 defaults
    pub fn clamped(
        page: Option<i64>,
        page_size: Option<i64>,
        defaults: Pagination,
        max_page_size: u32,
    ) -> Self {
        let page = page
            .unwrap_or(i64::from(defaults.page))
            .clamp(1, i64::from(u32::MAX)) as u32;
        let page_size = page_size
            .unwrap_or(i64::from(defaults.page_size))
            .clamp(1, i64::from(max_page_size)) as u32;
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

/// 分页元数据
///
/// previous_page / next_page 越界时序列化为 null
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub total_pages: u64,
    pub first_page: u64,
    pub last_page: u64,
    pub page: u32,
    pub previous_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl PageMeta {
    /// 由总行数与分页参数派生
    ///
    /// 越界的 page 不截断：items 为空但元数据仍描述完整总量
    pub fn new(total: u64, pagination: &Pagination) -> Self {
        let total_pages = total.div_ceil(u64::from(pagination.page_size));
        let page = pagination.page;
        Self {
            total,
            total_pages,
            first_page: if total > 0 { 1 } else { 0 },
            last_page: total_pages,
            page,
            previous_page: if page > 1 { Some(page - 1) } else { None },
            next_page: if u64::from(page) < total_pages {
                Some(page + 1)
            } else {
                None
            },
        }
    }
}
