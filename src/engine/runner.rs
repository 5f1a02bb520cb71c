//! # Step Monitoring Module
//!
//! Glue between a [`Task`] and a goal source: once per cycle, fetch the
//! current step's observed value and run it through `check`. The task core
//! never sees transport failures; a failed retrieval just means no check that
//! cycle.

use crate::engine::error::{Result, TaskError};
use crate::engine::source::{AsyncGoalSource, GoalRequest};
use crate::engine::task::Task;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::time::Duration;

/// What a single poll cycle did.
#[derive(Debug)]
pub enum PollOutcome {
    /// The task is complete; nothing was fetched
    Complete,
    /// The observed value matched; `step` was satisfied and the cursor moved
    Advanced { step: usize },
    /// A value was fetched but did not match the goal for `step`
    Pending { step: usize },
    /// Retrieval failed, so no check happened this cycle
    Skipped { step: usize, error: TaskError },
}

/// Drives a [`Task`] by polling a goal source.
///
/// Each step is paired with the [`GoalRequest`] that observes it. The monitor
/// runs strictly sequentially: one fetch and at most one `check` per cycle,
/// never overlapping retrievals for the same task.
///
/// Requests are a parallel map keyed by step index, with the same caveat as
/// step names: [`Task::add_dynamic_step`] does not shift them, so after an
/// insertion the caller must set the request for the inserted slot and
/// re-set any later ones.
pub struct StepMonitor<S> {
    task: Task,
    requests: HashMap<usize, GoalRequest>,
    source: S,
}

impl<S: AsyncGoalSource> StepMonitor<S> {
    pub fn new(task: Task, source: S) -> Self {
        Self {
            task,
            requests: HashMap::new(),
            source,
        }
    }

    /// Pair `step` with the request that observes it. Bounds are the same as
    /// for goal assignment: `1..=step_count`.
    pub fn set_step_request(&mut self, step: usize, request: GoalRequest) -> Result<()> {
        if step == 0 || step > self.task.step_count() {
            return Err(TaskError::OutOfBounds {
                step,
                max: self.task.step_count(),
            });
        }
        self.requests.insert(step, request);
        Ok(())
    }

    /// Read access to the underlying task, e.g. for a display collaborator.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Mutable access to the underlying task, e.g. for dynamic insertion.
    pub fn task_mut(&mut self) -> &mut Task {
        &mut self.task
    }

    /// Give the task back to the caller.
    pub fn into_task(self) -> Task {
        self.task
    }

    /// Run one poll cycle: fetch the current step's value and check it.
    ///
    /// Errors are reserved for setup problems (task not begun, no request
    /// configured for the current step); transport failures are reported as
    /// [`PollOutcome::Skipped`] so the caller can keep polling.
    pub async fn poll_once(&mut self) -> Result<PollOutcome> {
        if self.task.is_complete() {
            return Ok(PollOutcome::Complete);
        }
        if !self.task.is_active() {
            return Err(TaskError::NotInitialized);
        }

        let step = self.task.current_step_number();
        let Some(request) = self.requests.get(&step) else {
            return Err(TaskError::Configuration(format!(
                "no goal request configured for step {step}"
            )));
        };

        match self.source.fetch(request).await {
            Ok(observed) => {
                if self.task.check(observed) {
                    if self.task.is_complete() {
                        info!("task '{}' complete", self.task.name());
                        Ok(PollOutcome::Complete)
                    } else {
                        debug!("task '{}': advanced past step {step}", self.task.name());
                        Ok(PollOutcome::Advanced { step })
                    }
                } else {
                    Ok(PollOutcome::Pending { step })
                }
            }
            Err(error) => {
                warn!(
                    "task '{}': goal retrieval for step {step} failed: {error}",
                    self.task.name()
                );
                Ok(PollOutcome::Skipped { step, error })
            }
        }
    }

    /// Poll once per `period` until the task completes.
    ///
    /// Transient transport failures (see [`TaskError::retryable`]) are logged
    /// and polling continues; a non-retryable transport failure stops the loop
    /// and is returned, since it would fail identically every cycle.
    pub async fn run(&mut self, period: Duration) -> Result<()> {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match self.poll_once().await? {
                PollOutcome::Complete => return Ok(()),
                PollOutcome::Advanced { .. } | PollOutcome::Pending { .. } => {}
                PollOutcome::Skipped { error, .. } => {
                    if !error.retryable() {
                        return Err(error);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::goal::GoalValue;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns a scripted sequence of fetch results, one per call.
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<GoalValue>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<GoalValue>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl AsyncGoalSource for ScriptedSource {
        async fn fetch(&self, _request: &GoalRequest) -> Result<GoalValue> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted source exhausted")
        }
    }

    fn bed_and_status_task() -> Task {
        let mut task = Task::new("warmup", 2);
        task.set_step_objective(1, 65).unwrap();
        task.set_step_objective(2, "PRINTING").unwrap();
        task.begin().unwrap();
        task
    }

    fn monitor(task: Task, source: ScriptedSource) -> StepMonitor<ScriptedSource> {
        let mut monitor = StepMonitor::new(task, source);
        monitor
            .set_step_request(1, GoalRequest::get("http://device/bed/temperature"))
            .unwrap();
        monitor
            .set_step_request(2, GoalRequest::get("http://device/status"))
            .unwrap();
        monitor
    }

    #[tokio::test]
    async fn test_poll_cycle_progression() {
        let source = ScriptedSource::new(vec![
            Ok(GoalValue::Number(40.0)),
            Ok(GoalValue::Number(65.0)),
            Ok(GoalValue::Text("PRINTING".into())),
        ]);
        let mut monitor = monitor(bed_and_status_task(), source);

        assert!(matches!(
            monitor.poll_once().await.unwrap(),
            PollOutcome::Pending { step: 1 }
        ));
        assert!(matches!(
            monitor.poll_once().await.unwrap(),
            PollOutcome::Advanced { step: 1 }
        ));
        assert!(matches!(
            monitor.poll_once().await.unwrap(),
            PollOutcome::Complete
        ));
        assert!(monitor.task().is_complete());
    }

    #[tokio::test]
    async fn test_failed_retrieval_skips_the_cycle() {
        let source = ScriptedSource::new(vec![
            Err(TaskError::Timeout("no response".into())),
            Ok(GoalValue::Number(65.0)),
        ]);
        let mut monitor = monitor(bed_and_status_task(), source);

        let outcome = monitor.poll_once().await.unwrap();
        assert!(matches!(outcome, PollOutcome::Skipped { step: 1, .. }));
        // The cursor was not touched by the failure
        assert_eq!(monitor.task().current_step_number(), 1);

        assert!(matches!(
            monitor.poll_once().await.unwrap(),
            PollOutcome::Advanced { step: 1 }
        ));
    }

    #[tokio::test]
    async fn test_poll_requires_activation() {
        let mut task = Task::new("inactive", 1);
        task.set_step_objective(1, 1).unwrap();
        let mut monitor = StepMonitor::new(task, ScriptedSource::new(vec![]));
        monitor
            .set_step_request(1, GoalRequest::get("http://device/x"))
            .unwrap();

        assert_eq!(
            monitor.poll_once().await.unwrap_err(),
            TaskError::NotInitialized
        );
    }

    #[tokio::test]
    async fn test_poll_requires_a_request_for_the_current_step() {
        let mut monitor = StepMonitor::new(bed_and_status_task(), ScriptedSource::new(vec![]));
        let err = monitor.poll_once().await.unwrap_err();
        assert!(matches!(err, TaskError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_run_loops_until_complete() {
        let source = ScriptedSource::new(vec![
            Ok(GoalValue::Number(30.0)),
            Err(TaskError::http(503, "device busy")),
            Ok(GoalValue::Number(65.0)),
            Ok(GoalValue::Text("PRINTING".into())),
        ]);
        let mut monitor = monitor(bed_and_status_task(), source);

        monitor.run(Duration::from_millis(1)).await.unwrap();
        assert!(monitor.task().is_complete());
        assert_eq!(monitor.task().history().len(), 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_non_retryable_transport_error() {
        let source = ScriptedSource::new(vec![Ok(GoalValue::Number(30.0)), Err(TaskError::http(404, "no such endpoint"))]);
        let mut monitor = monitor(bed_and_status_task(), source);

        let err = monitor.run(Duration::from_millis(1)).await.unwrap_err();
        assert_eq!(err, TaskError::http(404, "no such endpoint"));
        // The task itself is untouched and could be resumed with a fixed request
        assert_eq!(monitor.task().current_step_number(), 1);
    }
}
