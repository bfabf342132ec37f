use serde::Deserialize;
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;
/// Highest page whose offset still fits in an `i64` at `MAX_PER_PAGE`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    #[serde(alias = "size")]
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

// Query strings decode every flattened value as a string, so the paging
// fields are repeated here rather than flattened from `Pagination`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    #[serde(alias = "size")]
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_applies_defaults() {
        let (page, per_page, offset) = Pagination::default().normalize();
        assert_eq!((page, per_page, offset), (1, 20, 0));
    }

    #[test]
    fn normalize_clamps_out_of_range_values() {
        let (page, per_page, offset) = Pagination::new(0, 1000).normalize();
        assert_eq!((page, per_page, offset), (1, 100, 0));

        let (page, per_page, offset) = Pagination::new(3, 0).normalize();
        assert_eq!((page, per_page, offset), (3, 1, 2));
    }

    #[test]
    fn huge_page_is_capped_without_overflow() {
        let (page, per_page, offset) = Pagination::new(i64::MAX, 100).normalize();
        assert_eq!(page, MAX_PAGE);
        assert_eq!(per_page, 100);
        assert_eq!(offset, (MAX_PAGE - 1) * 100);

        let (page, _, _) = Pagination::new(i64::MIN, 100).normalize();
        assert_eq!(page, 1);
    }
}
