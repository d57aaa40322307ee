// Timeline and favorites fetching — paginated post retrieval.
//
// Both endpoints return posts newest-first with the same page shape. The
// timeline fetch stops early once a page reaches posts older than the
// baseline, which avoids walking the whole history on every cycle. The
// favorites fetch cannot take that shortcut: favorites are ordered by when
// they were liked, not by when the liked post was created, so every page
// is examined and filtered by created_at.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::client::{GraphClient, FIRST_PAGE_CURSOR};
use super::UserId;

/// Hard cap on timeline/favorites pages per fetch.
const MAX_POST_PAGES: usize = 10;

/// Posts requested per page (the provider's maximum).
const PAGE_SIZE: usize = 200;

/// A post as the provider reports it — just the fields kith needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// One page of posts from a timeline or favorites endpoint.
#[derive(Debug, Deserialize)]
struct PostPage {
    posts: Vec<Post>,
    next_cursor: i64,
}

/// Fetch the subject's own posts created after `since`, newest-first.
///
/// With `since` set, pagination stops as soon as a page contains a post at
/// or before the baseline — everything older is already covered by prior
/// snapshots. With no baseline (cold start) the fetch is bounded only by
/// the page cap.
pub async fn fetch_posts_since(
    client: &GraphClient,
    user: UserId,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<Post>> {
    let path = format!("users/{user}/timeline");
    let mut posts: Vec<Post> = Vec::new();
    let mut cursor = FIRST_PAGE_CURSOR;
    let count_param = PAGE_SIZE.to_string();

    for _ in 0..MAX_POST_PAGES {
        let cursor_param = cursor.to_string();
        let page: PostPage = client
            .get_json(
                &path,
                &[("count", count_param.as_str()), ("cursor", &cursor_param)],
            )
            .await
            .with_context(|| format!("Failed to fetch timeline for user {user}"))?;

        let page_empty = page.posts.is_empty();
        let mut reached_baseline = false;

        for post in page.posts {
            if let Some(baseline) = since {
                if post.created_at <= baseline {
                    reached_baseline = true;
                    break;
                }
            }
            posts.push(post);
        }

        debug!(
            total = posts.len(),
            reached_baseline = reached_baseline,
            "Fetched timeline page for user {}",
            user
        );

        cursor = page.next_cursor;
        if reached_baseline || cursor == 0 || page_empty {
            break;
        }
    }

    info!(count = posts.len(), user = user, "Collected timeline posts");

    Ok(posts)
}

/// Fetch the posts the subject favorited after `since`.
///
/// Every page is walked up to the cap; filtering happens per post because
/// favorite order does not follow post creation order.
pub async fn fetch_favorites_since(
    client: &GraphClient,
    user: UserId,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<Post>> {
    let path = format!("users/{user}/favorites");
    let mut favorites: Vec<Post> = Vec::new();
    let mut cursor = FIRST_PAGE_CURSOR;
    let count_param = PAGE_SIZE.to_string();

    for _ in 0..MAX_POST_PAGES {
        let cursor_param = cursor.to_string();
        let page: PostPage = client
            .get_json(
                &path,
                &[("count", count_param.as_str()), ("cursor", &cursor_param)],
            )
            .await
            .with_context(|| format!("Failed to fetch favorites for user {user}"))?;

        let page_empty = page.posts.is_empty();

        for post in page.posts {
            let keep = match since {
                Some(baseline) => post.created_at > baseline,
                None => true,
            };
            if keep {
                favorites.push(post);
            }
        }

        debug!(
            total = favorites.len(),
            "Fetched favorites page for user {}",
            user
        );

        cursor = page.next_cursor;
        if cursor == 0 || page_empty {
            break;
        }
    }

    info!(count = favorites.len(), user = user, "Collected favorites");

    Ok(favorites)
}
