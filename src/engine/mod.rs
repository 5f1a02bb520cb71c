pub mod definition;
pub mod error;
pub mod goal;
pub mod runner;
pub mod source;
pub mod task;

// Re-export key types for easier access
pub use definition::{StepDefinition, TaskDefinition};
pub use goal::GoalValue;
pub use runner::{PollOutcome, StepMonitor};
pub use source::{AsyncGoalSource, GoalRequest, GoalSource};
pub use task::{StepCompletion, Task};
