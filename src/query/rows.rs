use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::params::SortDirection;

/// Keeps rows where any of `fields` contains `term`, ignoring case.
pub fn search_rows(rows: Vec<Value>, term: &str, fields: &[&str]) -> Vec<Value> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| {
            fields.iter().any(|field| {
                row.get(*field)
                    .and_then(Value::as_str)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

/// Stable sort on one key. Rows without the key (or with `null`) always go
/// last; equal keys keep the order the store returned them in.
pub fn sort_rows(rows: &mut [Value], key: &str, direction: SortDirection) {
    rows.sort_by_cached_key(|row| {
        let sort_key = row.get(key).and_then(SortKey::of);
        let missing = sort_key.is_none();
        match direction {
            SortDirection::Asc => (missing, Directed::Forward(sort_key)),
            SortDirection::Desc => (missing, Directed::Backward(Reverse(sort_key))),
        }
    });
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Directed {
    Forward(Option<SortKey>),
    Backward(Reverse<Option<SortKey>>),
}

/// Totally ordered projection of a JSON value. Mixed kinds rank by variant
/// order, so one column holding numbers and strings still sorts consistently.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Bool(bool),
    Number(Number),
    // RFC 3339 strings compare as instants, whatever their offset or precision
    Instant(DateTime<FixedOffset>),
    Text(String),
    Other(String),
}

impl SortKey {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(Self::Number(Number(n.as_f64().unwrap_or(0.0)))),
            Value::String(s) => Some(match DateTime::parse_from_rfc3339(s) {
                Ok(instant) => Self::Instant(instant),
                Err(_) => Self::Text(s.clone()),
            }),
            other => Some(Self::Other(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Number(f64);

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

pub fn paginate(rows: Vec<Value>, limit: usize, offset: usize) -> Vec<Value> {
    rows.into_iter().skip(offset).take(limit).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageTypeCounts {
    pub rag: usize,
    pub chatbot: usize,
}

/// Aggregate view over a set of chat log rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatStats {
    pub total_sessions: usize,
    pub total_messages: usize,
    pub message_types: MessageTypeCounts,
    pub avg_messages_per_session: f64,
}

impl ChatStats {
    pub fn from_rows(rows: &[Value]) -> Self {
        let mut sessions = HashSet::new();
        let mut message_types = MessageTypeCounts::default();

        for row in rows {
            if let Some(session) = row.get("session_id").and_then(Value::as_str) {
                sessions.insert(session);
            }
            match row.get("message_type").and_then(Value::as_str) {
                Some("rag") => message_types.rag += 1,
                Some("chatbot") => message_types.chatbot += 1,
                _ => {}
            }
        }

        let total_sessions = sessions.len();
        let total_messages = rows.len();
        let avg_messages_per_session = if total_sessions == 0 {
            0.0
        } else {
            total_messages as f64 / total_sessions as f64
        };

        Self {
            total_sessions,
            total_messages,
            message_types,
            avg_messages_per_session,
        }
    }
}
