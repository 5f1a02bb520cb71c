//! # Task Progression Module
//!
//! The core entity of the engine: an ordered, goal-gated procedure. A `Task`
//! owns step ordering, naming, dynamic step insertion and goal comparison; it
//! is agnostic to how observed values are obtained (see `engine::source`) or
//! how the current step is rendered to a user.

use crate::engine::error::{Result, TaskError};
use crate::engine::goal::GoalValue;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::collections::HashMap;

/// Reserved label stored at name index 0. Index 0 is a sentinel, never a
/// checkable step.
pub const PREPROCESSING_STAGE: &str = "preprocessing stage";

/// Placeholder returned by [`Task::all_step_names`] for steps without a
/// configured name.
pub const UNNAMED_STEP: &str = "No name set";

/// Record of a successful check, kept in the task's progression history.
#[derive(Debug, Clone, PartialEq)]
pub struct StepCompletion {
    /// The step that was satisfied
    pub step: usize,
    /// The observed value that matched the step's goal
    pub observed: GoalValue,
    /// When the match happened
    pub completed_at: DateTime<Utc>,
}

/// A sequential, goal-gated procedure.
///
/// A task moves through three states: **Unconfigured** (constructed, goals
/// being assigned), **Active** (after a successful [`begin`](Task::begin)) and
/// **Complete** (the cursor has passed the last step). The cursor starts at 0,
/// runs `1..=step_count` while active, and only ever increases — by exactly
/// one per successful [`check`](Task::check).
///
/// A task is a single-owner object: all operations mutate shared fields
/// without internal locking, so route all calls through one owner and never
/// overlap two `check` calls for the same task.
#[derive(Debug, Clone)]
pub struct Task {
    name: String,
    step_count: usize,
    current_step: usize,
    goals: HashMap<usize, GoalValue>,
    names: HashMap<usize, String>,
    active: bool,
    step_suffix: String,
    history: Vec<StepCompletion>,
}

impl Task {
    /// Create a task with `step_count` steps, no goals set, cursor at 0,
    /// inactive.
    ///
    /// A zero step count is stored as given; [`begin`](Task::begin) will then
    /// fail until the task is rebuilt with real steps.
    pub fn new(name: impl Into<String>, step_count: usize) -> Self {
        let mut names = HashMap::new();
        names.insert(0, PREPROCESSING_STAGE.to_string());
        Self {
            name: name.into(),
            step_count,
            current_step: 0,
            goals: HashMap::new(),
            names,
            active: false,
            step_suffix: ".".to_string(),
            history: Vec::new(),
        }
    }

    /// The task's identifying label, set at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of steps. Grows only through
    /// [`add_dynamic_step`](Task::add_dynamic_step).
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Assign the goal value for `step`.
    ///
    /// Steps are 1-based; index 0 is reserved and both bounds are enforced, so
    /// a goal can only land in `1..=step_count`.
    pub fn set_step_objective(&mut self, step: usize, goal: impl Into<GoalValue>) -> Result<()> {
        if step == 0 || step > self.step_count {
            warn!(
                "task '{}': attempted to set objective for step {} outside 1..={}",
                self.name, step, self.step_count
            );
            return Err(TaskError::OutOfBounds {
                step,
                max: self.step_count,
            });
        }
        self.goals.insert(step, goal.into());
        Ok(())
    }

    /// Assign (or re-assign) the display name for `step`, replacing any prior
    /// value for that index.
    pub fn set_step_name(&mut self, step: usize, name: impl Into<String>) {
        self.names.insert(step, name.into());
    }

    /// Bulk-assign names to steps `1..=step_count`, in order.
    ///
    /// The sequence length must equal the step count exactly; on mismatch no
    /// existing name is touched.
    pub fn set_all_step_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.step_count {
            warn!(
                "task '{}': set_all_step_names got {} names for {} steps",
                self.name,
                names.len(),
                self.step_count
            );
            return Err(TaskError::LengthMismatch {
                expected: self.step_count,
                got: names.len(),
            });
        }
        for (i, name) in names.into_iter().enumerate() {
            self.set_step_name(i + 1, name);
        }
        Ok(())
    }

    /// Override the separator placed between a step number and its name in
    /// numbered display (default `"."`).
    pub fn set_step_suffix(&mut self, suffix: impl Into<String>) {
        self.step_suffix = suffix.into();
    }

    /// Activate the task, moving the cursor to step 1.
    ///
    /// Requires a positive step count and a goal for every step in
    /// `1..=step_count`. On failure the task stays Unconfigured and `begin`
    /// may be retried once the configuration is fixed.
    pub fn begin(&mut self) -> Result<()> {
        if self.step_count == 0 {
            return Err(TaskError::Configuration(format!(
                "task '{}' has no steps",
                self.name
            )));
        }
        if self.goals.len() < self.step_count {
            return Err(TaskError::Configuration(format!(
                "task '{}' has {} of {} step goals assigned",
                self.name,
                self.goals.len(),
                self.step_count
            )));
        }
        self.current_step = 1;
        self.active = true;
        debug!("task '{}' activated with {} steps", self.name, self.step_count);
        Ok(())
    }

    /// Compare an observed value to the current step's goal.
    ///
    /// Returns `true` and advances the cursor by one when the values match
    /// (possibly completing the task); returns `false` with no state change
    /// otherwise. Before a successful [`begin`](Task::begin) this is a logged
    /// no-op returning `false`, and once the task is complete no further
    /// comparisons are performed.
    pub fn check(&mut self, observed: impl Into<GoalValue>) -> bool {
        if !self.active {
            warn!("task '{}' not initialized (call begin() first)", self.name);
            return false;
        }
        let Some(goal) = self.goals.get(&self.current_step) else {
            // Past the last step, or the cursor points at an inserted slot
            // whose goal was never stored; either way there is nothing to
            // compare against.
            return false;
        };
        let observed = observed.into();
        if *goal == observed {
            debug!(
                "task '{}': step {} satisfied by {}",
                self.name, self.current_step, observed
            );
            self.history.push(StepCompletion {
                step: self.current_step,
                observed,
                completed_at: Utc::now(),
            });
            self.current_step += 1;
            true
        } else {
            false
        }
    }

    /// Insert a new step immediately after the current one.
    ///
    /// The step count grows by one, the new goal lands at
    /// `current_step + 1`, and every goal previously at that index or later
    /// moves up by one. The cursor then lands on the inserted slot, so the
    /// step that was in progress at insertion time is never re-checked.
    ///
    /// Step names are **not** shifted: a caller that inserts a step must set
    /// its name separately, and names for later steps will be misaligned with
    /// their goals until the caller updates them.
    pub fn add_dynamic_step(&mut self, goal: impl Into<GoalValue>) {
        let inserted = self.current_step + 1;
        let mut shifted = HashMap::with_capacity(self.goals.len() + 1);
        for (step, value) in self.goals.drain() {
            let slot = if step >= inserted { step + 1 } else { step };
            shifted.insert(slot, value);
        }
        shifted.insert(inserted, goal.into());
        self.goals = shifted;
        self.step_count += 1;
        self.current_step = inserted;
        debug!(
            "task '{}': inserted dynamic step at {}, now {} steps",
            self.name, inserted, self.step_count
        );
    }

    /// True iff the cursor has passed the last step.
    pub fn is_complete(&self) -> bool {
        self.current_step > self.step_count
    }

    /// True iff [`begin`](Task::begin) has succeeded.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The cursor: 0 before activation, `1..=step_count` while active,
    /// `step_count + 1` once complete.
    pub fn current_step_number(&self) -> usize {
        self.current_step
    }

    /// The configured name for `step`, optionally prefixed with
    /// `"<step><suffix> "`.
    pub fn step_name(&self, step: usize, numbered: bool) -> Result<String> {
        match self.names.get(&step) {
            Some(name) => Ok(if numbered {
                format!("{step}{} {name}", self.step_suffix)
            } else {
                name.clone()
            }),
            None => {
                warn!("task '{}': no name set for step {}", self.name, step);
                Err(TaskError::NameNotFound { step })
            }
        }
    }

    /// Names for steps `1..=step_count`, in order, substituting
    /// [`UNNAMED_STEP`] for any step without a configured name. The result
    /// always has exactly `step_count` entries.
    pub fn all_step_names(&self, numbered: bool) -> Vec<String> {
        (1..=self.step_count)
            .map(|step| {
                let name = self.names.get(&step).map_or(UNNAMED_STEP, String::as_str);
                if numbered {
                    format!("{step}{} {name}", self.step_suffix)
                } else {
                    name.to_string()
                }
            })
            .collect()
    }

    /// User-facing text for the current state: the current step's name while
    /// the task is running (the reserved index-0 label before activation),
    /// and a completion message once done.
    pub fn prompt(&self) -> String {
        if self.is_complete() {
            return "All done!".to_string();
        }
        self.names
            .get(&self.current_step)
            .cloned()
            .unwrap_or_else(|| UNNAMED_STEP.to_string())
    }

    /// The progression history: one entry per successful check, oldest first.
    pub fn history(&self) -> &[StepCompletion] {
        &self.history
    }
}
