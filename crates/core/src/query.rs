use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemType};

/// Page number used when none (or garbage) is supplied.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when none (or garbage) is supplied.
pub const DEFAULT_LIMIT: u32 = 20;

/// Raw listing parameters exactly as they arrive in a query string.
///
/// Nothing here is ever rejected; [`ItemQuery::from_params`] maps
/// unusable values to "no filter" or to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct ListParams {
    /// `lost` or `found`; any other value is ignored.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Case-insensitive substring of the location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Case-insensitive substring of the name or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based page number (default 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Page size (default 20).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// A normalized listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    pub item_type: Option<ItemType>,
    pub location: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            item_type: None,
            location: None,
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn positive_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .map_or(default, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

impl ItemQuery {
    /// Translate raw parameters, applying every fallback rule.
    pub fn from_params(params: &ListParams) -> Self {
        Self {
            item_type: params
                .item_type
                .as_deref()
                .and_then(|t| t.trim().parse().ok()),
            location: non_blank(params.location.as_deref()),
            search: non_blank(params.search.as_deref()),
            page: positive_or(params.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(params.limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    /// The inverse of [`from_params`](Self::from_params), for sending a
    /// query over the wire.
    pub fn to_params(&self) -> ListParams {
        ListParams {
            item_type: self.item_type.map(|t| t.as_str().to_owned()),
            location: self.location.clone(),
            search: self.search.clone(),
            page: Some(self.page.to_string()),
            limit: Some(self.limit.to_string()),
        }
    }

    #[must_use]
    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(Some(&location.into()));
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = non_blank(Some(&search.into()));
        self
    }

    /// Set the page; `0` falls back to the first page.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = if page == 0 { DEFAULT_PAGE } else { page };
        self
    }

    /// Set the page size; `0` falls back to the default size.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        self
    }

    /// Number of filtered items skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    /// Size of the filtered set before pagination.
    pub total: u64,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub pagination: Pagination,
}

impl ItemPage {
    /// An empty page for `query`.
    pub fn empty(query: &ItemQuery) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination {
                page: query.page,
                limit: query.limit,
                total: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (k, v) in pairs {
            let v = Some((*v).to_owned());
            match *k {
                "type" => p.item_type = v,
                "location" => p.location = v,
                "search" => p.search = v,
                "page" => p.page = v,
                "limit" => p.limit = v,
                _ => unreachable!(),
            }
        }
        p
    }

    #[test]
    fn defaults_apply_when_absent() {
        let q = ItemQuery::from_params(&ListParams::default());
        assert_eq!(q, ItemQuery::default());
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn page_and_limit_fall_back_on_garbage() {
        for bad in ["0", "-3", "abc", "", "1.5"] {
            let q = ItemQuery::from_params(&params(&[("page", bad), ("limit", bad)]));
            assert_eq!(q.page, 1, "page {bad:?}");
            assert_eq!(q.limit, 20, "limit {bad:?}");
        }
    }

    #[test]
    fn offset_follows_page_and_limit() {
        let q = ItemQuery::from_params(&params(&[("page", "2"), ("limit", "10")]));
        assert_eq!(q.offset(), 10);
        let q = ItemQuery::from_params(&params(&[("page", " 3 "), ("limit", "7")]));
        assert_eq!(q.offset(), 14);
    }

    #[test]
    fn unknown_type_is_ignored() {
        let q = ItemQuery::from_params(&params(&[("type", "stolen")]));
        assert!(q.item_type.is_none());
        let q = ItemQuery::from_params(&params(&[("type", "Lost")]));
        assert!(q.item_type.is_none());
        let q = ItemQuery::from_params(&params(&[("type", "found")]));
        assert_eq!(q.item_type, Some(ItemType::Found));
    }

    #[test]
    fn blank_filters_mean_no_filter() {
        let q = ItemQuery::from_params(&params(&[("location", "  "), ("search", "")]));
        assert!(q.location.is_none());
        assert!(q.search.is_none());
        let q = ItemQuery::default().with_search(" wallet ");
        assert_eq!(q.search.as_deref(), Some("wallet"));
    }

    #[test]
    fn to_params_round_trips() {
        let q = ItemQuery::default()
            .with_type(ItemType::Lost)
            .with_location("Park")
            .with_page(0)
            .with_limit(5);
        assert_eq!(q.page, 1);
        assert_eq!(ItemQuery::from_params(&q.to_params()), q);
    }
}
