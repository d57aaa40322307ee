// Behavioral evidence: activity snapshots and topic drift.
//
// A snapshot captures what a user posted and favorited since a
// baseline, reduced to a ranked topic frequency list. Comparing the
// newest snapshot against stored history decides whether the account's
// interests moved gradually (consistent) or jumped (suspicious).

pub mod builder;
pub mod drift;
pub mod normalize;
pub mod snapshot;

pub use builder::SnapshotBuilder;
pub use drift::is_consistent;
pub use normalize::TextNormalizer;
pub use snapshot::{ActivitySnapshot, AnchorInteraction, FavoriteRecord, TopicCount};
