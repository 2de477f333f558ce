//! Markdown serialization of blog series roadmaps.
//!
//! The grammar is fixed:
//!
//! ```text
//! # Blog Series Roadmap
//!
//! ## Topic: {topic}
//!
//! ## Goal
//! {goal}
//!
//! ## Planned Posts
//!
//! ### 1. {title}
//!
//! {description}
//!
//! ```
//!
//! Decoding is tolerant: a missing topic or goal decodes as an empty string and
//! a document without `### N.` headers decodes with no entries. A description
//! containing a line of the form `### N. text` is indistinguishable from the
//! next entry and will be split there.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Document title line.
pub const ROADMAP_HEADER: &str = "# Blog Series Roadmap";

static TOPIC_RE: OnceLock<Regex> = OnceLock::new();
static GOAL_RE: OnceLock<Regex> = OnceLock::new();
static POSTS_RE: OnceLock<Regex> = OnceLock::new();
static ENTRY_RE: OnceLock<Regex> = OnceLock::new();

fn topic_re() -> &'static Regex {
    TOPIC_RE.get_or_init(|| Regex::new(r"(?m)^## Topic: (.*)$").expect("topic pattern is valid"))
}

fn goal_re() -> &'static Regex {
    GOAL_RE.get_or_init(|| {
        Regex::new(r"(?s)## Goal\r?\n(.*?)\r?\n\r?\n## Planned Posts").expect("goal pattern is valid")
    })
}

fn posts_re() -> &'static Regex {
    POSTS_RE.get_or_init(|| {
        Regex::new(r"(?m)^## Planned Posts[ \t]*\r?$").expect("posts pattern is valid")
    })
}

fn entry_re() -> &'static Regex {
    ENTRY_RE.get_or_init(|| Regex::new(r"(?m)^### \d+\. (.*)$").expect("entry pattern is valid"))
}

/// One planned post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapEntry {
    /// Post title.
    pub title: String,
    /// Free-form, possibly multi-line description.
    #[serde(default)]
    pub description: String,
}

impl RoadmapEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A blog series plan: topic, goal and ordered posts.
///
/// Serializes to JSON as `{topic, goal, posts: [{title, description}]}`, the
/// shape the planning prompt asks the model for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    /// Series topic.
    #[serde(default)]
    pub topic: String,
    /// Series goal.
    #[serde(default)]
    pub goal: String,
    /// Posts in narrative order.
    #[serde(default, rename = "posts")]
    pub entries: Vec<RoadmapEntry>,
}

impl Roadmap {
    /// Creates an empty roadmap.
    #[must_use]
    pub fn new(topic: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            goal: goal.into(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry, builder style.
    #[must_use]
    pub fn with_entry(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.entries.push(RoadmapEntry::new(title, description));
        self
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the markdown document.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        encode(&self.topic, &self.goal, &self.entries)
    }

    /// Parses a markdown document.
    #[must_use]
    pub fn from_markdown(text: &str) -> Self {
        decode(text)
    }

    /// Numbered one-line-per-post summary used in writing prompts.
    #[must_use]
    pub fn outline(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}: {}", i + 1, e.title, e.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Roadmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

/// Encodes a roadmap as markdown.
///
/// Entries are numbered 1..N in slice order.
#[must_use]
pub fn encode(topic: &str, goal: &str, entries: &[RoadmapEntry]) -> String {
    let mut out = format!(
        "{ROADMAP_HEADER}\n\n## Topic: {topic}\n\n## Goal\n{goal}\n\n## Planned Posts\n\n"
    );
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "### {}. {}\n\n{}\n\n",
            i + 1,
            entry.title,
            entry.description
        ));
    }
    out
}

/// Decodes a markdown roadmap. Never fails.
#[must_use]
pub fn decode(text: &str) -> Roadmap {
    let topic = topic_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let goal = goal_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    // Entry headers only count after the posts marker, so a goal may
    // contain `### N.` lines.
    let posts = posts_re()
        .find(text)
        .map_or(text, |marker| &text[marker.end()..]);

    let headers: Vec<_> = entry_re().captures_iter(posts).collect();
    let entries = headers
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let title = caps.get(1)?.as_str().trim();
            let body_end = headers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(posts.len(), |m| m.start());
            let description = posts[whole.end()..body_end].trim();
            Some(RoadmapEntry::new(title, description))
        })
        .collect();

    Roadmap {
        topic,
        goal,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::distributions::Alphanumeric;
    use rand::{Rng, SeedableRng};

    fn llm_roadmap() -> Roadmap {
        Roadmap::new("LLMs", "Explain transformers")
            .with_entry("Intro", "Basics...")
            .with_entry("Deep Dive", "Details...")
    }

    #[test]
    fn test_encode_concrete_document() {
        let doc = llm_roadmap().to_markdown();
        assert_eq!(
            doc,
            "# Blog Series Roadmap\n\n\
             ## Topic: LLMs\n\n\
             ## Goal\nExplain transformers\n\n\
             ## Planned Posts\n\n\
             ### 1. Intro\n\nBasics...\n\n\
             ### 2. Deep Dive\n\nDetails...\n\n"
        );

        let topic = doc.find("## Topic: LLMs").unwrap();
        let first = doc.find("### 1. Intro").unwrap();
        let second = doc.find("### 2. Deep Dive").unwrap();
        assert!(topic < first && first < second);
    }

    #[test]
    fn test_decode_concrete_document() {
        let decoded = decode(&llm_roadmap().to_markdown());
        assert_eq!(decoded, llm_roadmap());
        let titles: Vec<_> = decoded.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Deep Dive"]);
    }

    #[test]
    fn test_decode_without_posts() {
        let decoded = decode("# Blog Series Roadmap\n\n## Topic: Rust\n\n## Goal\nLearn\n\n## Planned Posts\n\n");
        assert_eq!(decoded.topic, "Rust");
        assert_eq!(decoded.goal, "Learn");
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        let decoded = decode("just some notes\nwith no structure");
        assert_eq!(decoded, Roadmap::default());
        assert_eq!(decode(""), Roadmap::default());
    }

    #[test]
    fn test_numbering_ignores_original_positions() {
        let roadmap = Roadmap::new("t", "g")
            .with_entry("c", "3")
            .with_entry("a", "1")
            .with_entry("b", "2");
        let doc = roadmap.to_markdown();

        let numbers: Vec<_> = entry_re()
            .find_iter(&doc)
            .map(|m| m.as_str().split('.').next().unwrap().trim_start_matches("### ").to_string())
            .collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_decode_trims_and_keeps_multiline_descriptions() {
        let text = "## Topic: Async Rust\n\n## Goal\n\n  Teach futures.  \n\n## Planned Posts\n\n\
                    ### 1.   Pinning  \n\nFirst paragraph.\n\nSecond paragraph.\n\n\
                    ### 7. Executors\n\nRun queues.";
        let decoded = decode(text);

        assert_eq!(decoded.topic, "Async Rust");
        assert_eq!(decoded.goal, "Teach futures.");
        assert_eq!(
            decoded.entries,
            vec![
                RoadmapEntry::new("Pinning", "First paragraph.\n\nSecond paragraph."),
                RoadmapEntry::new("Executors", "Run queues."),
            ]
        );
    }

    #[test]
    fn test_decode_crlf_document() {
        let doc = llm_roadmap().to_markdown().replace('\n', "\r\n");
        assert_eq!(decode(&doc), llm_roadmap());
    }

    #[test]
    fn test_empty_fields_round_trip() {
        let roadmap = Roadmap::new("", "").with_entry("Only", "");
        assert_eq!(decode(&roadmap.to_markdown()), roadmap);
    }

    #[test]
    fn test_goal_with_entry_like_line_round_trips() {
        let roadmap = Roadmap::new("Rust", "Follow-up to:\n### 3. Ownership").with_entry("Intro", "Basics");

        let decoded = decode(&roadmap.to_markdown());

        assert_eq!(decoded, roadmap);
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn test_empty_title_round_trips() {
        let roadmap = Roadmap::new("t", "g").with_entry("A", "a").with_entry("", "b");

        let decoded = decode(&roadmap.to_markdown());

        assert_eq!(decoded, roadmap);
        assert_eq!(decoded.entries[1], RoadmapEntry::new("", "b"));
    }

    #[test]
    fn test_decode_without_posts_marker_scans_whole_text() {
        let decoded = decode("### 1. Loose\n\nStill found");
        assert_eq!(decoded.entries, vec![RoadmapEntry::new("Loose", "Still found")]);
    }

    fn random_text(rng: &mut impl Rng, words: usize) -> String {
        (0..words)
            .map(|_| {
                let len = rng.gen_range(1..8);
                (0..len)
                    .map(|_| char::from(rng.sample(Alphanumeric)))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_round_trip_random_safe_roadmaps() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let mut roadmap = Roadmap::new(random_text(&mut rng, 3), random_text(&mut rng, 12));
            for _ in 0..rng.gen_range(0..6) {
                let paragraphs = rng.gen_range(1..3);
                let description = (0..paragraphs)
                    .map(|_| random_text(&mut rng, 10))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                roadmap = roadmap.with_entry(random_text(&mut rng, 4), description);
            }

            assert_eq!(decode(&roadmap.to_markdown()), roadmap);
        }
    }

    #[test]
    fn test_json_shape_uses_posts() {
        let json = serde_json::to_value(llm_roadmap()).unwrap();
        assert_eq!(json["posts"][1]["title"], "Deep Dive");

        let parsed: Roadmap =
            serde_json::from_str(r#"{"topic":"T","posts":[{"title":"A"}]}"#).unwrap();
        assert_eq!(parsed.goal, "");
        assert_eq!(parsed.entries, vec![RoadmapEntry::new("A", "")]);
    }
}
