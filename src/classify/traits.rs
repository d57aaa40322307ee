// Trait for topic classifiers, plus label-selection helpers.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One candidate topic for a text, with the classifier's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicLabel {
    pub label: String,
    pub probability: f64,
}

/// Assigns topic labels to text. Implementations must be Send + Sync
/// so they can be shared across concurrent evidence tasks.
#[async_trait]
pub trait TopicClassifier: Send + Sync {
    /// Classify a batch of texts in one call. The returned outer Vec
    /// corresponds position-for-position to `texts`: result `i` holds
    /// the candidate labels for `texts[i]`.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Vec<TopicLabel>>>;

    /// Classify a single text. Default goes through the batch path.
    async fn classify_single(&self, text: &str) -> Result<Vec<TopicLabel>> {
        let mut results = self.classify_batch(&[text.to_string()]).await?;
        Ok(results.pop().unwrap_or_default())
    }
}

/// Pick the winning label from a candidate list: highest probability,
/// first wins on exact ties. Returns None when no candidate beats a
/// zero baseline or when the winner's label text is empty, both of
/// which mean the topic is undetermined.
pub fn best_label(candidates: &[TopicLabel]) -> Option<&TopicLabel> {
    let mut winner: Option<&TopicLabel> = None;
    let mut high = 0.0_f64;
    for candidate in candidates {
        if candidate.probability > high {
            high = candidate.probability;
            winner = Some(candidate);
        }
    }
    winner.filter(|w| !w.label.is_empty())
}
