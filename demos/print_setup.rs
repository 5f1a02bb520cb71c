//! Guided 3D-printer setup against a mock device.
//!
//! Spins up a loopback HTTP server that behaves like a printer warming up,
//! then drives a three-step task to completion by polling it:
//!
//! ```text
//! cargo run --example print_setup
//! ```

use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use stepflow_rs::{HttpGoalSource, PollOutcome, TaskDefinition};

/// A printer that needs a few polls before each reading hits its target.
fn mock_printer() -> Router {
    let bed_polls = Arc::new(AtomicUsize::new(0));
    let status_polls = Arc::new(AtomicUsize::new(0));

    Router::new()
        .route(
            "/api/v1/printer/bed/temperature",
            get({
                let bed_polls = Arc::clone(&bed_polls);
                move || {
                    let bed_polls = Arc::clone(&bed_polls);
                    async move {
                        // Warms from 25 toward 65 across polls
                        let reading = 25 + 20 * bed_polls.fetch_add(1, Ordering::SeqCst);
                        reading.min(65).to_string()
                    }
                }
            }),
        )
        .route(
            "/api/v1/printer/heads/0/extruders/0/hotend/temperature",
            get(|| async { "210" }),
        )
        .route(
            "/api/v1/printer/status",
            get({
                let status_polls = Arc::clone(&status_polls);
                move || {
                    let status_polls = Arc::clone(&status_polls);
                    async move {
                        if status_polls.fetch_add(1, Ordering::SeqCst) < 2 {
                            "IDLE"
                        } else {
                            "PRINTING"
                        }
                    }
                }
            }),
        )
}

#[tokio::main]
async fn main() -> stepflow_rs::Result<()> {
    env_logger::init();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock printer");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, mock_printer())
            .await
            .expect("serve mock printer");
    });

    let definition = TaskDefinition::from_json(&format!(
        r#"
        {{
            "name": "Print Setup",
            "steps": [
                {{
                    "name": "Preheat the bed to 65 degrees",
                    "goal": 65,
                    "request": {{ "url": "http://{addr}/api/v1/printer/bed/temperature" }}
                }},
                {{
                    "name": "Set the nozzle temperature to 210 degrees",
                    "goal": 210,
                    "request": {{ "url": "http://{addr}/api/v1/printer/heads/0/extruders/0/hotend/temperature" }}
                }},
                {{
                    "name": "Start the print",
                    "goal": "PRINTING",
                    "request": {{ "url": "http://{addr}/api/v1/printer/status" }}
                }}
            ]
        }}
        "#
    ))?;

    let mut monitor = definition.into_monitor(HttpGoalSource::new(5)?)?;
    monitor.task_mut().begin()?;

    println!("Steps:");
    for name in monitor.task().all_step_names(true) {
        println!("  {name}");
    }

    // One poll per cycle, updating the helper text each time, like a display
    // collaborator refreshing once per frame
    loop {
        println!("> {}", monitor.task().prompt());
        match monitor.poll_once().await? {
            PollOutcome::Complete => break,
            PollOutcome::Advanced { step } => println!("  step {step} done"),
            PollOutcome::Pending { .. } => {}
            PollOutcome::Skipped { step, error } => {
                println!("  step {step}: retrieval failed ({error}), skipping this cycle");
            }
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    println!("> {}", monitor.task().prompt());
    for completion in monitor.task().history() {
        println!(
            "  [{}] step {} satisfied by {}",
            completion.completed_at.format("%H:%M:%S%.3f"),
            completion.step,
            completion.observed
        );
    }

    Ok(())
}
