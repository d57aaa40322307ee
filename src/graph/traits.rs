// Social-graph provider trait — the seam between the decision logic and
// the provider's HTTP API.
//
// The engine and the snapshot builder only ever see this trait, so tests
// can substitute counting fakes and the HTTP client stays swappable.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::client::GraphClient;
use super::timeline::Post;
use super::{links, timeline, UserId};

/// Read access to the social graph around a subject account.
/// Implementations must be async because the real provider is an HTTP API.
#[async_trait]
pub trait SocialGraphProvider: Send + Sync {
    /// All accounts following the subject (the complete paginated set).
    async fn follower_ids(&self, user: UserId) -> Result<Vec<UserId>>;

    /// All accounts the subject follows (the complete paginated set).
    async fn friend_ids(&self, user: UserId) -> Result<Vec<UserId>>;

    /// The subject's own posts created after `since`, newest-first.
    /// `None` means no lower bound (cold start).
    async fn posts_since(&self, user: UserId, since: Option<DateTime<Utc>>)
        -> Result<Vec<Post>>;

    /// Posts the subject favorited after `since`.
    async fn favorites_since(
        &self,
        user: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Post>>;
}

#[async_trait]
impl SocialGraphProvider for GraphClient {
    async fn follower_ids(&self, user: UserId) -> Result<Vec<UserId>> {
        links::fetch_follower_ids(self, user).await
    }

    async fn friend_ids(&self, user: UserId) -> Result<Vec<UserId>> {
        links::fetch_friend_ids(self, user).await
    }

    async fn posts_since(
        &self,
        user: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Post>> {
        timeline::fetch_posts_since(self, user, since).await
    }

    async fn favorites_since(
        &self,
        user: UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Post>> {
        timeline::fetch_favorites_since(self, user, since).await
    }
}
