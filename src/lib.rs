/*!
# Stepflow-rs

A step-progression engine for guided, device-driven procedures in Rust.

## Overview

Stepflow-rs models a multi-step procedure — preparing a 3D printer, bringing
up a lab instrument, walking an operator through a checklist — where each step
has a named objective and a goal value that must be observed from an external
system before the procedure may advance. The engine owns step ordering,
naming, dynamic step insertion and goal comparison; how observed values are
fetched and how the current step is shown to a user are pluggable
collaborators.

## Key Components

* **Task**: the core entity — an ordered set of steps with goals and display
  names, a monotonic cursor, and an Unconfigured → Active → Complete state
  machine
* **GoalValue**: a closed tagged value (number, text, bool) compared with the
  natural equality of its variant; cross-variant comparisons are never equal
* **GoalSource / AsyncGoalSource**: the retrieval contract — one observed
  value per invocation, blocking or async, with HTTP implementations over
  `reqwest`
* **StepMonitor**: the polling glue that fetches the current step's value
  once per cycle and runs it through the task
* **TaskDefinition**: declarative JSON form of a task, loadable from a string
  or file

## Usage Example

```rust
use stepflow_rs::Task;

fn main() -> stepflow_rs::Result<()> {
    let mut task = Task::new("Print Setup", 3);
    task.set_step_objective(1, 65)?;
    task.set_step_objective(2, 210)?;
    task.set_step_objective(3, "PRINTING")?;
    task.set_all_step_names([
        "Preheat the bed to 65 degrees",
        "Set the nozzle temperature to 210 degrees",
        "Start the print",
    ])?;

    task.begin()?;
    assert_eq!(task.prompt(), "Preheat the bed to 65 degrees");

    // Feed in externally-observed values; the cursor advances on a match
    assert!(task.check(65));
    assert!(!task.check(150)); // not at goal yet, no state change
    assert!(task.check(210));
    assert!(task.check("PRINTING"));
    assert!(task.is_complete());
    Ok(())
}
```

## Polling a device

```rust,no_run
use std::time::Duration;
use stepflow_rs::{GoalRequest, HttpGoalSource, TaskDefinition};

#[tokio::main]
async fn main() -> stepflow_rs::Result<()> {
    let definition = TaskDefinition::from_file("print_setup.json")?;
    let mut monitor = definition.into_monitor(HttpGoalSource::new(5)?)?;

    monitor.task_mut().begin()?;
    monitor.run(Duration::from_secs(1)).await?;

    println!("{}", monitor.task().prompt()); // "All done!"
    Ok(())
}
```

## Error Handling

All task-level failures (incomplete configuration, out-of-bounds steps,
missing names, length mismatches) are local, recoverable [`TaskError`]s
reported to the immediate caller — none terminate the process. Transport
failures from goal retrieval never reach the task's cursor; the monitor skips
that cycle and [`TaskError::retryable`] classifies whether another cycle is
worth attempting.
*/

pub mod engine;

// Re-export all public APIs for easier access
pub use engine::error::{Result, TaskError};
pub use engine::goal::GoalValue;
pub use engine::runner::{PollOutcome, StepMonitor};
pub use engine::source::{
    AsyncGoalSource, BlockingHttpGoalSource, GoalRequest, GoalSource, HttpGoalSource,
};
pub use engine::task::{StepCompletion, Task, PREPROCESSING_STAGE, UNNAMED_STEP};
pub use engine::{StepDefinition, TaskDefinition};
