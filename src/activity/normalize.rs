// Text cleanup applied to posts before they reach the classifier.

use anyhow::{Context, Result};
use regex_lite::Regex;

/// Runs of this many identical characters (or more) collapse to one.
const RUN_COLLAPSE_AT: usize = 4;

/// Strips the noise that skews topic classification: links, mentions
/// and stretched-out letters. Compiled once, shared by reference.
pub struct TextNormalizer {
    url: Regex,
    mention: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        let url = Regex::new(r"(https?://\S+)|(www\.\S+)")
            .context("Failed to compile URL pattern")?;
        let mention = Regex::new(r"@\w+").context("Failed to compile mention pattern")?;
        Ok(Self { url, mention })
    }

    /// Cleans one post. Returns None when nothing classifiable is left,
    /// so link-only and mention-only posts drop out of the feed.
    pub fn clean(&self, text: &str) -> Option<String> {
        let text = self.url.replace_all(text, "");
        let text = self.mention.replace_all(&text, "");
        let text = collapse_runs(&text);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Shrinks runs of 4+ identical characters down to a single one, so
/// "yessssss" and "yes" land on the same tokens. Shorter repeats stay
/// untouched; plenty of real words have doubled letters.
fn collapse_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Option<(char, usize)> = None;

    for ch in text.chars() {
        match run {
            Some((current, count)) if current == ch => {
                run = Some((current, count + 1));
            }
            Some((current, count)) => {
                push_run(&mut out, current, count);
                run = Some((ch, 1));
            }
            None => {
                run = Some((ch, 1));
            }
        }
    }
    if let Some((current, count)) = run {
        push_run(&mut out, current, count);
    }
    out
}

fn push_run(out: &mut String, ch: char, count: usize) {
    let emit = if count >= RUN_COLLAPSE_AT { 1 } else { count };
    for _ in 0..emit {
        out.push(ch);
    }
}
