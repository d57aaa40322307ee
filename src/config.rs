use std::env;
use std::time::Duration;

use anyhow::Result;

use crate::graph::UserId;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Social-graph provider base URL (followers/friends/timeline/favorites).
    pub graph_api_url: String,
    /// Bearer token for the social-graph provider.
    pub graph_api_token: String,
    /// Topic classifier endpoint (classify POST target).
    pub classifier_api_url: String,
    /// Token for the classifier's `Authorization: Token <key>` header.
    pub classifier_api_key: String,
    pub db_path: String,
    /// Anchor account ids forming the fixed trust network, in declaration order.
    pub anchors: Vec<UserId>,
    /// Wall-clock budget for each of the three evidence tasks.
    pub evidence_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only db_path and the timeout have defaults — the provider and
    /// classifier endpoints are required for anything beyond `init`,
    /// `history`, `decisions`, and `status`.
    pub fn load() -> Result<Self> {
        let anchors = parse_anchor_list(&env::var("KITH_ANCHORS").unwrap_or_default())?;

        let evidence_timeout_secs = match env::var("KITH_EVIDENCE_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                anyhow::anyhow!("KITH_EVIDENCE_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'")
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            graph_api_url: env::var("GRAPH_API_URL").unwrap_or_default(),
            graph_api_token: env::var("GRAPH_API_TOKEN").unwrap_or_default(),
            classifier_api_url: env::var("CLASSIFIER_API_URL").unwrap_or_default(),
            classifier_api_key: env::var("CLASSIFIER_API_KEY").unwrap_or_default(),
            db_path: env::var("KITH_DB_PATH").unwrap_or_else(|_| "./kith.db".to_string()),
            anchors,
            evidence_timeout: Duration::from_secs(evidence_timeout_secs),
        })
    }

    /// Check that the social-graph provider is configured.
    /// Call this before any operation that talks to the provider.
    pub fn require_graph(&self) -> Result<()> {
        if self.graph_api_url.is_empty() {
            anyhow::bail!(
                "GRAPH_API_URL not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        if self.graph_api_token.is_empty() {
            anyhow::bail!(
                "GRAPH_API_TOKEN not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that the topic classifier is configured.
    /// Call this before any operation that builds an activity snapshot.
    pub fn require_classifier(&self) -> Result<()> {
        if self.classifier_api_url.is_empty() {
            anyhow::bail!(
                "CLASSIFIER_API_URL not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        if self.classifier_api_key.is_empty() {
            anyhow::bail!(
                "CLASSIFIER_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that at least one anchor id is configured.
    /// `decide` without anchors is a guaranteed deny, so refuse to start.
    pub fn require_anchors(&self) -> Result<()> {
        if self.anchors.is_empty() {
            anyhow::bail!(
                "KITH_ANCHORS not set. Add a comma-separated list of anchor\n\
                 account ids to your .env file, or pass --anchor on the command line."
            );
        }
        Ok(())
    }
}

/// Parse a comma-separated anchor id list ("123,456,789").
/// Empty input yields an empty list; malformed entries are an error.
fn parse_anchor_list(raw: &str) -> Result<Vec<UserId>> {
    let mut anchors = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id: UserId = part
            .parse()
            .map_err(|_| anyhow::anyhow!("KITH_ANCHORS contains a non-numeric id: '{part}'"))?;
        anchors.push(id);
    }
    Ok(anchors)
}
