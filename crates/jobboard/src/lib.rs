//! # jobboard
//!
//! Record models for a PostgreSQL-backed job board, built around an
//! injection-safe dynamic query construction core:
//!
//! - **SQL explicit**: clause text and bind values travel together as a
//!   [`Fragment`]; placeholders are always `$1, $2, ...` and values never
//!   enter the query text
//! - **`changeset`**: a partially-populated update payload becomes a
//!   parameterized `SET` clause
//! - **`filter`**: named list-endpoint criteria become a parameterized
//!   `WHERE` clause, with unknown keys rejected and range bounds checked
//! - **`organization` / `posting`**: the two entity collections and their
//!   CRUD model functions, usable with a client or inside a transaction
//!
//! ```ignore
//! use jobboard::{FilterCriteria, Organization};
//!
//! let criteria = FilterCriteria::new()
//!     .add("nameLike", "labs")
//!     .add("minEmployees", 10);
//! let orgs = Organization::find_all(&client, &criteria).await?;
//! ```

pub mod changeset;
pub mod client;
pub mod error;
pub mod filter;
pub mod fragment;
pub mod organization;
pub mod posting;
pub mod row;

pub use changeset::{ColumnMap, FieldMap, set_clause};
pub use client::GenericClient;
pub use error::{Error, Result};
pub use filter::{Criterion, FilterCriteria, FilterSchema, FilterValue, Predicate, where_clause};
pub use fragment::Fragment;
pub use organization::{
    NewOrganization, ORGANIZATION_COLUMNS, ORGANIZATION_FILTERS, Organization, OrganizationPatch,
};
pub use posting::{NewPosting, POSTING_COLUMNS, POSTING_FILTERS, Posting, PostingPatch};
pub use row::{FromRow, RowExt};
