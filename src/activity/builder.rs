// Builds activity snapshots: fetch posts and favorites, clean the
// text, classify it, tally topics.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::activity::normalize::TextNormalizer;
use crate::activity::snapshot::{
    rank_topics, ActivitySnapshot, AnchorInteraction, FavoriteRecord, InteractionKind,
};
use crate::classify::{best_label, TopicClassifier};
use crate::graph::{Post, SocialGraphProvider, UserId};

/// Favorites classified in flight at once. Order of the resulting
/// records still follows the fetched order; the classifier's own rate
/// limiter paces the actual requests.
const FAVORITE_CONCURRENCY: usize = 4;

pub struct SnapshotBuilder {
    provider: Arc<dyn SocialGraphProvider>,
    classifier: Arc<dyn TopicClassifier>,
    normalizer: TextNormalizer,
}

impl SnapshotBuilder {
    pub fn new(
        provider: Arc<dyn SocialGraphProvider>,
        classifier: Arc<dyn TopicClassifier>,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            classifier,
            normalizer: TextNormalizer::new()?,
        })
    }

    /// Builds one snapshot of the subject's activity since `baseline`.
    /// A None baseline means no prior history exists; the fetch then
    /// reaches as far back as the page caps allow, and the snapshot
    /// records its own generation time as the baseline. Provider and
    /// classifier failures degrade to empty sections with a warning
    /// rather than failing the build.
    pub async fn build(
        &self,
        subject: UserId,
        anchors: &[UserId],
        baseline: Option<DateTime<Utc>>,
    ) -> ActivitySnapshot {
        let generated_at = Utc::now();

        let posts = match self.provider.posts_since(subject, baseline).await {
            Ok(posts) => posts,
            Err(error) => {
                warn!(subject, error = %error, "Post fetch failed, continuing with none");
                Vec::new()
            }
        };
        let favorite_posts = match self.provider.favorites_since(subject, baseline).await {
            Ok(posts) => posts,
            Err(error) => {
                warn!(subject, error = %error, "Favorites fetch failed, continuing with none");
                Vec::new()
            }
        };

        let post_texts: Vec<String> = posts
            .iter()
            .filter_map(|post| self.normalizer.clean(&post.text))
            .collect();

        let topic_ranking = rank_topics(self.feed_labels(&post_texts).await);

        let favorites = self.favorite_records(favorite_posts).await;
        let interactions = anchor_interactions(anchors, &favorites);

        info!(
            subject,
            posts = post_texts.len(),
            favorites = favorites.len(),
            topics = topic_ranking.len(),
            interactions = interactions.len(),
            "Built activity snapshot"
        );

        ActivitySnapshot {
            subject_id: subject,
            generated_at,
            baseline: baseline.unwrap_or(generated_at),
            topic_ranking,
            post_texts,
            favorites,
            interactions,
        }
    }

    /// The winning label per cleaned post. Undetermined posts drop out
    /// of the tally; a classifier failure drops the whole feed.
    async fn feed_labels(&self, cleaned: &[String]) -> Vec<String> {
        if cleaned.is_empty() {
            return Vec::new();
        }
        match self.classifier.classify_batch(cleaned).await {
            Ok(results) => results
                .iter()
                .filter_map(|candidates| best_label(candidates))
                .map(|winner| winner.label.clone())
                .collect(),
            Err(error) => {
                warn!(error = %error, "Feed classification failed, no topics this cycle");
                Vec::new()
            }
        }
    }

    async fn favorite_records(&self, posts: Vec<Post>) -> Vec<FavoriteRecord> {
        stream::iter(posts)
            .map(|post| self.classify_favorite(post))
            .buffered(FAVORITE_CONCURRENCY)
            .collect()
            .await
    }

    async fn classify_favorite(&self, post: Post) -> FavoriteRecord {
        let mut record = FavoriteRecord {
            post_id: post.id,
            author_id: post.author_id,
            created_at: post.created_at,
            text: post.text,
            topic: None,
            probability: None,
        };

        let cleaned = match self.normalizer.clean(&record.text) {
            Some(cleaned) => cleaned,
            None => return record,
        };

        match self.classifier.classify_single(&cleaned).await {
            Ok(candidates) => {
                if let Some(winner) = best_label(&candidates) {
                    record.topic = Some(winner.label.clone());
                    record.probability = Some(winner.probability);
                }
            }
            Err(error) => {
                warn!(
                    post_id = record.post_id,
                    error = %error,
                    "Favorite classification failed"
                );
            }
        }
        record
    }
}

/// Favorites whose author is an anchor become interaction records.
fn anchor_interactions(anchors: &[UserId], favorites: &[FavoriteRecord]) -> Vec<AnchorInteraction> {
    favorites
        .iter()
        .filter(|favorite| anchors.contains(&favorite.author_id))
        .map(|favorite| AnchorInteraction {
            anchor_id: favorite.author_id,
            kind: InteractionKind::Favorite,
            occurred_at: favorite.created_at,
        })
        .collect()
}
