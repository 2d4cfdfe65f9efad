pub mod cursor;
pub mod query;
pub mod rank;
pub mod types;

pub use cursor::Cursor;
pub use query::{paginate, query, FEED_CANDIDATE_CAP};
pub use types::{FeedFilter, FeedMode, FeedPage, FeedRecord};
