use kernel::model::list::{ListOptions, PaginatedList};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

pub mod auth;
pub mod availability;
pub mod booking;
pub mod office;
pub mod user;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Success envelope; errors produce `{success: false, message}` from
/// the `AppError` response mapping.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Page-numbered pagination at the HTTP boundary; the stores work in
/// limit/offset.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn list_options(&self) -> AppResult<ListOptions> {
        build_list_options(self.page, self.limit)
    }
}

pub fn build_list_options(page: Option<i64>, limit: Option<i64>) -> AppResult<ListOptions> {
    let page = page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::UnprocessableEntity(
            "page must be 1 or greater".into(),
        ));
    }
    let limit = limit.unwrap_or(ListOptions::default().limit);
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(AppError::UnprocessableEntity(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(ListOptions {
        limit,
        offset: (page - 1) * limit,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        let page = if limit > 0 { offset / limit + 1 } else { 1 };
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn from_list<U: Into<T>>(list: PaginatedList<U>) -> Self {
        let PaginatedList {
            total,
            limit,
            offset,
            items,
        } = list;
        Self::new(
            items.into_iter().map(Into::into).collect(),
            total,
            limit,
            offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_maps_page_to_offset() {
        let options = build_list_options(Some(3), Some(20)).unwrap();
        assert_eq!(options.limit, 20);
        assert_eq!(options.offset, 40);
    }

    #[test]
    fn page_query_defaults_to_first_page() {
        let options = build_list_options(None, None).unwrap();
        assert_eq!(options.limit, 10);
        assert_eq!(options.offset, 0);
    }

    #[test]
    fn oversized_limit_is_rejected() {
        assert!(matches!(
            build_list_options(Some(1), Some(MAX_PAGE_SIZE + 1)),
            Err(AppError::UnprocessableEntity(_))
        ));
        assert!(matches!(
            build_list_options(Some(0), None),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn success_envelope_carries_data() {
        let value = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PaginatedResponse::<i64>::new(vec![], 21, 10, 20);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
    }
}
