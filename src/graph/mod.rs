// Social-graph provider client — follower/friend ids, timeline, favorites.
//
// Each submodule handles one area of the provider's API surface. The
// `SocialGraphProvider` trait in traits.rs is the seam the decision
// engine sees; `GraphClient` is its HTTP implementation.

pub mod client;
pub mod links;
pub mod timeline;
pub mod traits;

pub use client::GraphClient;
pub use timeline::Post;
pub use traits::SocialGraphProvider;

/// A provider account id. Zero is the sentinel "unset" id and never
/// names a real account.
pub type UserId = i64;
