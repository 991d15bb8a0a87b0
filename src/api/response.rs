use serde::Serialize;

/// The `{success, message, data?, pagination?}` envelope every endpoint
/// responds with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
            pagination: None,
        }
    }

    pub fn paginated(message: &str, data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
            pagination: Some(pagination),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// `pages = ceil(total / limit)`; `limit` is never zero (clamped by the
    /// query parser).
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        let pages = total.div_ceil(limit);
        Self {
            total,
            page,
            limit,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}
