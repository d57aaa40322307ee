// Relationship id fetching — full follower/friend sets with pagination.
//
// The link evaluator intersects these sets with the anchor list, so each
// fetch unions every page into one running set. Pagination is sequential
// (each cursor comes from the prior response) and capped so a provider
// that never signals exhaustion cannot hold an evidence task forever.

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::client::{GraphClient, IdPage, FIRST_PAGE_CURSOR};
use super::UserId;

/// Hard cap on relationship pages per fetch. The provider returns up to
/// 5000 ids per page, so this bounds a fetch at 125k ids.
const MAX_ID_PAGES: usize = 25;

/// Fetch the complete follower id set for an account (accounts that
/// follow the subject), handling pagination automatically.
pub async fn fetch_follower_ids(client: &GraphClient, user: UserId) -> Result<Vec<UserId>> {
    fetch_relation_ids(client, "followers/ids", user).await
}

/// Fetch the complete friend id set for an account (accounts the subject
/// follows), handling pagination automatically.
pub async fn fetch_friend_ids(client: &GraphClient, user: UserId) -> Result<Vec<UserId>> {
    fetch_relation_ids(client, "friends/ids", user).await
}

async fn fetch_relation_ids(
    client: &GraphClient,
    path: &str,
    user: UserId,
) -> Result<Vec<UserId>> {
    let mut ids: Vec<UserId> = Vec::new();
    let mut cursor = FIRST_PAGE_CURSOR;
    let user_param = user.to_string();

    for _ in 0..MAX_ID_PAGES {
        let cursor_param = cursor.to_string();
        let page: IdPage = client
            .get_json(
                path,
                &[("user_id", user_param.as_str()), ("cursor", &cursor_param)],
            )
            .await
            .with_context(|| format!("Failed to fetch {path} for user {user}"))?;

        debug!(
            page_size = page.ids.len(),
            total = ids.len() + page.ids.len(),
            path = path,
            "Fetched relationship page for user {}",
            user
        );

        let page_empty = page.ids.is_empty();
        ids.extend(page.ids);

        // Exhaustion: next_cursor of zero, or an empty page.
        cursor = page.next_cursor;
        if cursor == 0 || page_empty {
            break;
        }
    }

    info!(count = ids.len(), path = path, user = user, "Collected relationship ids");

    Ok(ids)
}
