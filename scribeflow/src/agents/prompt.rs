//! Prompt templates.

use crate::context::StageContext;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE
        .get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"))
}

/// Fills `{field}` placeholders for each declared input of the stage.
///
/// Absent fields render as the `Not set` placeholder so the model sees the
/// gap instead of a dangling brace. Unknown placeholders are left as is.
/// The template is scanned once; substituted values are not expanded again.
#[must_use]
pub fn render_prompt(template: &str, ctx: &StageContext<'_>) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            if ctx.declared_inputs().iter().any(|declared| declared == key) {
                ctx.input_or_placeholder(key)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
