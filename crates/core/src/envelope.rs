use serde::{Deserialize, Serialize};

use crate::query::Pagination;

/// The uniform JSON envelope every REST response uses.
///
/// `data` is always serialized, as `null` on failure. `errors` and
/// `pagination` are only present when they carry something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: None,
            pagination: None,
        }
    }

    /// A successful response with `data: null`.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
            pagination: None,
        }
    }

    /// A failed response with no detail list.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: None,
            pagination: None,
        }
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn failure_serializes_null_data() {
        let resp: ApiResponse<String> = ApiResponse::failure("Item not found");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            json!({"success": false, "message": "Item not found", "data": null})
        );
    }

    #[test]
    fn pagination_and_errors_appear_when_set() {
        let resp = ApiResponse::ok("Items retrieved successfully", Vec::<u8>::new()).with_pagination(
            Pagination {
                page: 1,
                limit: 20,
                total: 0,
            },
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["pagination"]["limit"], 20);
        assert!(json.get("errors").is_none());

        let resp: ApiResponse<()> =
            ApiResponse::failure("Validation error").with_errors(vec!["\"name\" is required".into()]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["errors"][0], "\"name\" is required");
    }

    #[test]
    fn deserializes_without_optional_members() {
        let resp: ApiResponse<u32> =
            serde_json::from_str(r#"{"success":true,"message":"ok","data":7}"#).unwrap();
        assert_eq!(resp.data, Some(7));
        assert!(resp.pagination.is_none());
    }
}
