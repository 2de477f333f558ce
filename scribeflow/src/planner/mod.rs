//! Agents planner: turns a task description into a multi-agent system plan.
//!
//! Four model stages share one blackboard:
//!
//! | Stage             | Reads                                   | Writes               |
//! |-------------------|-----------------------------------------|----------------------|
//! | TaskAnalyzer      | task                                    | subtasks             |
//! | AgentDesigner     | task, subtasks                          | agent_descriptions   |
//! | WorkflowDesigner  | task, subtasks, agent_descriptions      | workflow_pattern     |
//! | FinalDescription  | all of the above                        | final_description    |
//!
//! The first three form the `PlanningAgents` group. When the last stage does
//! not produce its field the plan is assembled from the intermediate fields.

mod pipeline;
mod prompts;
mod service;

pub use pipeline::{build_planner_pipeline, plan_fallback_document, PlannerSearch};
pub use service::{save_plan, AgentsPlanner, PlanOutcome};

/// The task being planned.
pub const STATE_TASK: &str = "task";
/// Subtasks produced by the task analyzer.
pub const STATE_SUBTASKS: &str = "subtasks";
/// Agent roster produced by the agent designer.
pub const STATE_AGENT_DESCRIPTIONS: &str = "agent_descriptions";
/// Coordination pattern produced by the workflow designer.
pub const STATE_WORKFLOW_PATTERN: &str = "workflow_pattern";
/// The final markdown plan.
pub const STATE_FINAL_DESCRIPTION: &str = "final_description";

/// All planner fields with their display labels, in pipeline order.
pub const PLANNER_FIELDS: [(&str, &str); 5] = [
    (STATE_TASK, "Task"),
    (STATE_SUBTASKS, "Subtasks"),
    (STATE_AGENT_DESCRIPTIONS, "Agent Descriptions"),
    (STATE_WORKFLOW_PATTERN, "Workflow Pattern"),
    (STATE_FINAL_DESCRIPTION, "Final Description"),
];

/// Session application name.
pub const APP_NAME: &str = "agents_planner_app";
/// Session user ID.
pub const USER_ID: &str = "planner_user_01";
/// Session ID.
pub const SESSION_ID: &str = "planner_session_01";

/// File name the plan is saved under.
pub const PLAN_FILENAME: &str = "agent_system_plan.md";

/// Task planned when none is given on the command line.
pub const DEFAULT_TASK: &str = "Create a system that helps users plan and book travel itineraries. \
The system should be able to suggest destinations based on user preferences, find flights and \
accommodations, create daily itineraries, and provide real-time updates during the trip.";
