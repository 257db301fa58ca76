pub mod bitmask;
pub mod constants;
pub mod error;
pub mod operations;
pub mod query;
pub mod types;

pub use bitmask::OperationBitmaskFilter;
pub use constants::*;
pub use error::{ClientError, ClientResult, ValidationError};
pub use query::{DiscussionQuery, DiscussionSortKey, HistoryStart};
pub use types::*;
