// Decision layer: anchor-link evidence, the shared tally rule, and the
// engine that joins evidence into an allow/deny record.

pub mod engine;
pub mod evaluate;
pub mod record;
pub mod verdict;

pub use engine::DecisionEngine;
pub use record::DecisionRecord;
pub use verdict::{majority_vote, AnchorSet, LinkVerdict};
