//! Prompt builders for planning and writing.

use crate::roadmap::{Roadmap, RoadmapEntry};

pub(super) const PLANNER_INSTRUCTION: &str =
    "You are a technical content strategist who plans coherent blog series.";

pub(super) const WRITER_INSTRUCTION: &str =
    "You are a professional technical writer. You answer with JSON only.";

pub(super) fn planning_prompt(topic: &str, goal: &str, research: Option<&str>) -> String {
    let mut prompt = format!(
        "Plan a blog series of 5 to 7 posts.\n\n\
         Topic: {topic}\n\
         Goal: {goal}\n\n\
         Each post builds on the previous ones. Give every post a title and a description of at \
         least three sentences.\n\n\
         Answer with JSON in exactly this shape:\n\
         {{\"topic\": \"...\", \"goal\": \"...\", \"posts\": [{{\"title\": \"...\", \"description\": \"...\"}}]}}"
    );
    if let Some(notes) = research {
        prompt.push_str("\n\nResearch notes:\n");
        prompt.push_str(notes);
    }
    prompt
}

pub(super) fn writing_prompt(
    roadmap: &Roadmap,
    entry: &RoadmapEntry,
    index: usize,
    research: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Write a technical blog post.\n\n\
         Series topic: {topic}\n\
         Series goal: {goal}\n\n\
         Post title: {title}\n\
         Post description: {description}\n\
         Post number: {number} of {total}\n\n\
         Series outline:\n{outline}\n\n\
         Open with a hook, cover everything in the description, include code examples where they \
         help, use Markdown headings, refer to neighbouring posts where relevant and close with a \
         summary.\n\n\
         Answer with JSON: {{\"title\": \"...\", \"content\": \"<markdown>\"}}",
        topic = roadmap.topic,
        goal = roadmap.goal,
        title = entry.title,
        description = entry.description,
        number = index + 1,
        total = roadmap.len(),
        outline = roadmap.outline(),
    );
    if let Some(notes) = research {
        prompt.push_str("\n\nResearch notes:\n");
        prompt.push_str(notes);
    }
    prompt
}
