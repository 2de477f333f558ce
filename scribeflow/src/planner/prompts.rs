//! Prompt templates for the planner stages.

pub(super) const TASK_ANALYZER_INSTRUCTION: &str =
    "You are a systems analyst who decomposes goals into concrete, independently executable subtasks.";

pub(super) const TASK_ANALYZER_TEMPLATE: &str = "\
Analyze the following task and break it down into a numbered list of subtasks.
For each subtask give a one-line summary, the inputs it needs and the output it produces.

Task:
{task}";

pub(super) const AGENT_DESIGNER_INSTRUCTION: &str =
    "You design specialised AI agents. Each agent has a single clear responsibility.";

pub(super) const AGENT_DESIGNER_TEMPLATE: &str = "\
Design the agents needed to carry out this task.

Task:
{task}

Subtasks:
{subtasks}

For every agent give its name, its responsibility, the subtasks it covers, the tools it needs \
and what it hands to other agents.";

pub(super) const WORKFLOW_DESIGNER_INSTRUCTION: &str =
    "You are an architect of multi-agent workflows (sequential, parallel, loop and hierarchical patterns).";

pub(super) const WORKFLOW_DESIGNER_TEMPLATE: &str = "\
Choose and describe the workflow pattern that coordinates these agents.

Task:
{task}

Subtasks:
{subtasks}

Agents:
{agent_descriptions}

Explain the order of execution, where agents run in parallel or loop, how state flows between \
them and how failures are handled.";

pub(super) const FINAL_DESCRIPTION_INSTRUCTION: &str =
    "You write clear technical design documents in Markdown.";

pub(super) const FINAL_DESCRIPTION_TEMPLATE: &str = "\
Write a complete Markdown description of the agent system below. Start with a level-one title, \
then sections for Overview, Subtasks, Agents, Workflow and Implementation Notes.

Task:
{task}

Subtasks:
{subtasks}

Agents:
{agent_descriptions}

Workflow:
{workflow_pattern}";
