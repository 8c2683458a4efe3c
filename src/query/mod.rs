//! List-endpoint query handling: parameter parsing, equality filters, free-text
//! search, stable sorting, pagination, and chat statistics.
//!
//! The remote store only does equality filtering, so everything else happens
//! here over the fetched rows.

mod error;
mod params;
mod rows;

pub use error::QueryError;
pub use params::{equality_filters, parse_bool, ListParams, SortDirection};
pub use rows::{paginate, search_rows, sort_rows, ChatStats, MessageTypeCounts};
