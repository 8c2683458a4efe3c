use std::collections::HashMap;

use serde_json::{Map, Value};

use super::error::QueryError;

pub const DEFAULT_SORT_FIELD: &str = "created_at";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Result<Self, QueryError> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(QueryError::InvalidSortOrder(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Paging and ordering for a GET list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub limit: usize,
    pub offset: usize,
    pub sort_by: String,
    pub sort_order: SortDirection,
}

impl ListParams {
    /// `sortable` is the resource's allow-list; `created_at` is always the default.
    pub fn from_query(
        raw: &HashMap<String, String>,
        sortable: &[&str],
        default_limit: usize,
    ) -> Result<Self, QueryError> {
        let limit = parse_count(raw, "limit")?.unwrap_or(default_limit);
        let offset = parse_count(raw, "offset")?.unwrap_or(0);

        let sort_by = match raw.get("sort_by").map(String::as_str) {
            None | Some("") => DEFAULT_SORT_FIELD.to_string(),
            Some(field) if sortable.contains(&field) => field.to_string(),
            Some(field) => {
                return Err(QueryError::UnknownSortField {
                    field: field.to_string(),
                    allowed: sortable.join(", "),
                })
            }
        };

        let sort_order = match raw.get("sort_order").map(String::as_str) {
            None | Some("") => SortDirection::default(),
            Some(order) => SortDirection::parse(order)?,
        };

        Ok(Self {
            limit,
            offset,
            sort_by,
            sort_order,
        })
    }
}

fn parse_count(raw: &HashMap<String, String>, param: &'static str) -> Result<Option<usize>, QueryError> {
    match raw.get(param).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|_| QueryError::InvalidNumber {
                param,
                value: value.to_string(),
            }),
    }
}

pub fn parse_bool(param: &str, value: &str) -> Result<bool, QueryError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(QueryError::InvalidBoolean {
            param: param.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Copies the supplied, non-empty string parameters named in `keys` into a
/// filter object for the remote store. Unsupplied keys are left out entirely.
pub fn equality_filters(raw: &HashMap<String, String>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| {
            raw.get(*key)
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), Value::String(v.clone())))
        })
        .collect()
}
