//! Degraded final documents built from partial pipeline state.

use crate::context::{Blackboard, NOT_SET};

/// One section of a fallback document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSection {
    /// Markdown heading text (without the `##`).
    pub heading: String,
    /// Blackboard field rendered under the heading.
    pub key: String,
}

/// A fixed markdown template filled from whatever fields a run produced.
///
/// Rendering is a pure function of the blackboard and never fails: absent
/// fields are replaced by the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackDocument {
    title: String,
    intro: Option<String>,
    sections: Vec<FallbackSection>,
    placeholder: String,
}

impl FallbackDocument {
    /// Creates a template with a top-level title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            intro: None,
            sections: Vec::new(),
            placeholder: NOT_SET.to_string(),
        }
    }

    /// Derives a template with one section per field, headed by the field name.
    #[must_use]
    pub fn for_fields<'a>(title: impl Into<String>, keys: impl IntoIterator<Item = &'a str>) -> Self {
        keys.into_iter()
            .fold(Self::new(title), |doc, key| doc.section(heading_for(key), key))
    }

    /// Sets an introductory paragraph.
    #[must_use]
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    /// Adds a section.
    #[must_use]
    pub fn section(mut self, heading: impl Into<String>, key: impl Into<String>) -> Self {
        self.sections.push(FallbackSection {
            heading: heading.into(),
            key: key.into(),
        });
        self
    }

    /// Overrides the placeholder for absent fields.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Returns the sections.
    #[must_use]
    pub fn sections(&self) -> &[FallbackSection] {
        &self.sections
    }

    /// Renders the document.
    #[must_use]
    pub fn render(&self, board: &Blackboard) -> String {
        let title = if self.title.trim().is_empty() {
            "# Partial Result"
        } else {
            self.title.trim()
        };

        let mut out = String::new();
        out.push_str(title);
        out.push_str("\n\n");

        if let Some(intro) = &self.intro {
            out.push_str(intro.trim());
            out.push_str("\n\n");
        }

        for section in &self.sections {
            let body = board.text_or(&section.key, &self.placeholder);
            out.push_str(&format!("## {}\n{}\n\n", section.heading, body.trim()));
        }

        out.trim_end().to_string() + "\n"
    }
}

/// "agent_descriptions" becomes "Agent Descriptions".
fn heading_for(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
