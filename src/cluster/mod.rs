pub mod engine;
pub mod keys;
pub mod types;

pub use engine::cluster;
pub use types::{
    ClusterConfig, ClusterExplain, ClusterItem, KeyStrategy, OtherSource, PrimarySelect,
    StoryPrimary,
};

/// Source priority assumed when neither the item nor the priority table has
/// an explicit value.
pub const DEFAULT_SOURCE_PRIORITY: i64 = 50;
