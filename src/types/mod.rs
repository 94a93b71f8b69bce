//! Shared request and response types.

mod pagination;
mod response;

pub use pagination::{DirectoryQuery, SearchQuery};
pub use response::{ApiResponse, CountResponse, Created, MessageResponse};
