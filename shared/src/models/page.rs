//! Pagination

use serde::{Deserialize, Serialize};

/// 默认每页数量
pub const DEFAULT_LIMIT: u32 = 10;
/// 每页数量上限
pub const MAX_LIMIT: u32 = 50;

/// 分页参数 (已规范化)
///
/// `page < 1` or unparsable falls back to 1; `limit` outside `[1, 50]` or
/// unparsable falls back to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// 从原始查询字符串值解析
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| (1..=MAX_LIMIT as i64).contains(l))
            .map(|l| l as u32)
            .unwrap_or(DEFAULT_LIMIT);
        Self { page, limit }
    }

    /// SQL OFFSET
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// `ceil(total / limit)`
    pub fn pages(&self, total: i64) -> i64 {
        let limit = self.limit.max(1) as i64;
        (total.max(0) + limit - 1) / limit
    }
}

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// 数据列表
    pub list: Vec<T>,
    /// 总记录数
    pub total: i64,
    /// 当前页码
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总页数
    pub pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(list: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            list,
            total,
            page: pagination.page,
            limit: pagination.limit,
            pages: pagination.pages(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        assert_eq!(Pagination::parse(None, None), Pagination::default());
    }

    #[test]
    fn test_page_clamps_to_one() {
        assert_eq!(Pagination::parse(Some("0"), None).page, 1);
        assert_eq!(Pagination::parse(Some("-3"), None).page, 1);
        assert_eq!(Pagination::parse(Some("abc"), None).page, 1);
        assert_eq!(Pagination::parse(Some("4"), None).page, 4);
    }

    #[test]
    fn test_limit_out_of_range_falls_back_to_ten() {
        assert_eq!(Pagination::parse(None, Some("0")).limit, 10);
        assert_eq!(Pagination::parse(None, Some("51")).limit, 10);
        assert_eq!(Pagination::parse(None, Some("x")).limit, 10);
        assert_eq!(Pagination::parse(None, Some("50")).limit, 50);
        assert_eq!(Pagination::parse(None, Some("1")).limit, 1);
    }

    #[test]
    fn test_offset_and_pages() {
        let p = Pagination { page: 3, limit: 10 };
        assert_eq!(p.offset(), 20);
        assert_eq!(p.pages(0), 0);
        assert_eq!(p.pages(10), 1);
        assert_eq!(p.pages(11), 2);
        assert_eq!(p.pages(25), 3);
    }

    #[test]
    fn test_paginated_response() {
        let resp = PaginatedResponse::new(vec!["a", "b"], 23, Pagination { page: 2, limit: 10 });
        assert_eq!(resp.total, 23);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.pages, 3);
    }
}
