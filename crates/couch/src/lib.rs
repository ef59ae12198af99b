pub mod compile;
pub mod field;
pub mod search;

use thiserror::Error;

pub use compile::{compile, match_all, match_none};
pub use field::{AdvisorySearchField, CouchDbField, DbField, ObjectType};
pub use search::build_search_selector;

#[derive(Debug, Error)]
pub enum Error {
    #[error("filter expression error: {0}")]
    Expression(#[from] filter::Error),

    #[error("segment `{segment}` of selector `{selector}` cannot be encoded as a CouchDB field path")]
    PathEncoding { selector: String, segment: String },

    #[error("internal selector translation error: {0}")]
    Internal(String),
}
