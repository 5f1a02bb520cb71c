use crate::engine::error::{Result, TaskError};
use crate::engine::goal::GoalValue;
use crate::engine::runner::StepMonitor;
use crate::engine::source::{AsyncGoalSource, GoalRequest};
use crate::engine::task::Task;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Declarative form of a task, loadable from JSON.
///
/// ```json
/// {
///     "name": "Print Setup",
///     "steps": [
///         {
///             "name": "Preheat the bed to 65 degrees",
///             "goal": 65,
///             "request": { "url": "http://device/api/v1/printer/bed/temperature" }
///         },
///         { "name": "Start the print", "goal": "PRINTING" }
///     ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    #[serde(default)]
    pub step_suffix: Option<String>,
    pub steps: Vec<StepDefinition>,
}

/// One step of a [`TaskDefinition`]: a required goal, an optional display
/// name, and optionally the request that observes the step.
#[derive(Debug, Clone, Deserialize)]
pub struct StepDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub goal: GoalValue,
    #[serde(default)]
    pub request: Option<GoalRequest>,
}

impl TaskDefinition {
    /// Load a definition from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(TaskError::from_serde)
    }

    /// Load a definition from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json_str = fs::read_to_string(path).map_err(TaskError::from_io)?;
        Self::from_json(&json_str)
    }

    /// Build a configured (but not yet activated) [`Task`].
    ///
    /// A definition with zero steps builds fine; activation will then fail,
    /// matching direct construction.
    pub fn build(&self) -> Result<Task> {
        let mut task = Task::new(&self.name, self.steps.len());
        if let Some(suffix) = &self.step_suffix {
            task.set_step_suffix(suffix.clone());
        }
        for (i, step) in self.steps.iter().enumerate() {
            let index = i + 1;
            task.set_step_objective(index, step.goal.clone())?;
            if let Some(name) = &step.name {
                task.set_step_name(index, name.clone());
            }
        }
        Ok(task)
    }

    /// Build the task and pair it with `source`, wiring each step's request
    /// into a [`StepMonitor`].
    pub fn into_monitor<S: AsyncGoalSource>(self, source: S) -> Result<StepMonitor<S>> {
        let task = self.build()?;
        let mut monitor = StepMonitor::new(task, source);
        for (i, step) in self.steps.into_iter().enumerate() {
            if let Some(request) = step.request {
                monitor.set_step_request(i + 1, request)?;
            }
        }
        Ok(monitor)
    }
}
