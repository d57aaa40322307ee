// Topic classification — external labeling of post text.
//
// The classifier is a remote service: it takes a batch of texts and
// returns, per text, a ranked list of (label, probability) pairs. The
// trait in traits.rs is the seam; remote.rs is the HTTP backend.

pub mod rate_limit;
pub mod remote;
pub mod traits;

pub use remote::RemoteClassifier;
pub use traits::{best_label, TopicClassifier, TopicLabel};
