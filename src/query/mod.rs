//! Natural-language query understanding and the structured filters it
//! produces for the document store.

pub mod filter;
pub mod translate;

pub use filter::{DocumentFilter, FindOptions, SortOrder};
pub use translate::{ParsedQuery, QueryIntent, translate_query};
