//! Pipeline run service: engine construction and SSE forwarding.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use promptline_config::PipelineConfig;
use promptline_engine::{PipelineEngine, RunEvent};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info};

use crate::dto::RunError;
use crate::error::AppError;
use crate::ServerState;

type EventSender = mpsc::Sender<Result<Event, Infallible>>;

/// Builds an engine for the pipeline with this request's step model overrides.
pub fn build_engine(
    state: &ServerState,
    pipeline: &PipelineConfig,
    step_models: HashMap<String, String>,
) -> Result<PipelineEngine, AppError> {
    Ok(PipelineEngine::new(
        pipeline.clone(),
        state.models.clone(),
        state.generator.clone(),
        state.search.clone(),
        step_models,
    )?)
}

fn sse_event(name: &str, data: &impl Serialize) -> Event {
    Event::default().event(name).json_data(data).unwrap_or_else(|e| {
        error!("Failed to serialize '{}' event: {}", name, e);
        Event::default().event("error").data("event serialization failed")
    })
}

async fn send(tx: &EventSender, event: Event) {
    let _ = tx.send(Ok(event)).await;
}

/// Runs the engine on its own task and streams its progress.
///
/// Events: `step` when a step starts, `block` when it finishes, then either
/// `end` after the last step or `error` on the first failure.
pub fn stream(
    engine: PipelineEngine,
    inputs: HashMap<String, String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(100);

    tokio::spawn(async move {
        let (events_tx, mut events_rx) = mpsc::channel::<RunEvent>(16);

        let forward_tx = tx.clone();
        let forward = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                let name = match &event {
                    RunEvent::StepStarted { .. } => "step",
                    RunEvent::Block(_) => "block",
                    RunEvent::Finished { .. } => "end",
                };
                send(&forward_tx, sse_event(name, &event)).await;
            }
        });

        let result = engine.execute_with_events(inputs, &events_tx).await;
        drop(events_tx);
        let _ = forward.await;

        match result {
            Ok(run) => info!("Run of '{}' streamed {} blocks", run.pipeline_id, run.blocks.len()),
            Err(e) => {
                error!("Run of '{}' failed: {}", engine.config().id, e);
                send(&tx, sse_event("error", &RunError { error: e.to_string() })).await;
            }
        }
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default())
}
