//! Story Worker Thread
//!
//! Runs all network calls on a background thread with its own tokio runtime
//! so the UI never blocks. The UI sends [`WorkerRequest`]s and drains
//! [`WorkerResponse`]s once per frame.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;

use crate::client::{ClientError, StoryClient, StreamKind};
use crate::stream::StreamEvent;

/// Request messages sent to the worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerRequest {
    /// Open a suggestion or completion stream
    Stream {
        kind: StreamKind,
        context: String,
        /// Unique ID for this request, used to filter stale responses
        request_id: u64,
    },
    /// Fetch candidate character names
    Extract { context: String, request_id: u64 },
    /// Abort the running stream of this kind, if any
    Cancel { kind: StreamKind },
}

/// Response messages received from the worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    /// One decoded stream record
    Event {
        kind: StreamKind,
        request_id: u64,
        event: StreamEvent,
    },
    /// The service closed the stream
    Finished { kind: StreamKind, request_id: u64 },
    /// The stream could not be opened or broke; `message` is user-facing
    Failed {
        kind: StreamKind,
        request_id: u64,
        message: String,
    },
    /// The stream was cancelled on request
    Cancelled { kind: StreamKind, request_id: u64 },
    /// Raw character names from `/extract`
    Characters { request_id: u64, names: Vec<String> },
    /// Character detection failed; `message` is user-facing
    ExtractFailed { request_id: u64, message: String },
}

/// The UI side of the worker channels
///
/// Dropping the handle closes the request channel, which stops the worker
/// and cancels whatever it still has running.
pub struct WorkerHandle {
    request_tx: UnboundedSender<WorkerRequest>,
    response_rx: Receiver<WorkerResponse>,
}

impl WorkerHandle {
    /// Wrap existing channels
    pub fn from_channels(
        request_tx: UnboundedSender<WorkerRequest>,
        response_rx: Receiver<WorkerResponse>,
    ) -> Self {
        Self {
            request_tx,
            response_rx,
        }
    }

    /// Returns false if the worker has gone away
    pub fn send(&self, request: WorkerRequest) -> bool {
        self.request_tx.send(request).is_ok()
    }

    /// Next pending response, without blocking
    pub fn try_recv(&self) -> Option<WorkerResponse> {
        match self.response_rx.try_recv() {
            Ok(response) => Some(response),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Spawn the worker thread
///
/// # Arguments
/// * `client` - Story service client the worker calls
pub fn spawn_worker(client: StoryClient) -> std::io::Result<WorkerHandle> {
    let (request_tx, request_rx) = unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel();

    std::thread::Builder::new()
        .name("costory-worker".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::error!("Failed to start worker runtime: {}", e);
                    return;
                }
            };
            runtime.block_on(worker_loop(client, request_rx, response_tx));
        })?;

    Ok(WorkerHandle::from_channels(request_tx, response_rx))
}

/// Main worker loop - processes requests until the channel is closed
async fn worker_loop(
    client: StoryClient,
    mut request_rx: UnboundedReceiver<WorkerRequest>,
    response_tx: Sender<WorkerResponse>,
) {
    let mut running: HashMap<StreamKind, CancellationToken> = HashMap::new();

    while let Some(request) = request_rx.recv().await {
        match request {
            WorkerRequest::Stream {
                kind,
                context,
                request_id,
            } => {
                let token = CancellationToken::new();
                if let Some(previous) = running.insert(kind, token.clone()) {
                    previous.cancel();
                }
                tokio::spawn(run_stream(
                    client.clone(),
                    kind,
                    context,
                    request_id,
                    token,
                    response_tx.clone(),
                ));
            }
            WorkerRequest::Extract {
                context,
                request_id,
            } => {
                tokio::spawn(run_extract(
                    client.clone(),
                    context,
                    request_id,
                    response_tx.clone(),
                ));
            }
            WorkerRequest::Cancel { kind } => match running.remove(&kind) {
                Some(token) => {
                    log::debug!("Cancelling {} stream", kind.label());
                    token.cancel();
                }
                None => log::debug!("Cancel for {} with no stream running", kind.label()),
            },
        }
    }

    for token in running.values() {
        token.cancel();
    }
    log::debug!("Story worker shutting down");
}

/// Stream one endpoint, forwarding every event to the UI
async fn run_stream(
    client: StoryClient,
    kind: StreamKind,
    context: String,
    request_id: u64,
    cancel: CancellationToken,
    response_tx: Sender<WorkerResponse>,
) {
    let event_tx = response_tx.clone();
    let result = client
        .stream_with_cancel(kind, &context, &cancel, |event| {
            let response = WorkerResponse::Event {
                kind,
                request_id,
                event,
            };
            match event_tx.send(response) {
                Ok(()) => ControlFlow::Continue(()),
                // UI is gone
                Err(_) => ControlFlow::Break(()),
            }
        })
        .await;

    let response = match result {
        Ok(_) => WorkerResponse::Finished { kind, request_id },
        Err(ClientError::Cancelled) => WorkerResponse::Cancelled { kind, request_id },
        Err(e) => {
            log::debug!("{} stream {} failed: {}", kind.label(), request_id, e);
            WorkerResponse::Failed {
                kind,
                request_id,
                message: stream_failure_message(&e),
            }
        }
    };
    let _ = response_tx.send(response);
}

async fn run_extract(
    client: StoryClient,
    context: String,
    request_id: u64,
    response_tx: Sender<WorkerResponse>,
) {
    let response = match client.extract_characters(&context).await {
        Ok(names) => WorkerResponse::Characters { request_id, names },
        Err(e) => WorkerResponse::ExtractFailed {
            request_id,
            message: extract_failure_message(&e),
        },
    };
    let _ = response_tx.send(response);
}

/// User-facing text for a failed stream
///
/// A bad status shows the body the service sent; anything else is a
/// transport failure.
fn stream_failure_message(error: &ClientError) -> String {
    match error {
        ClientError::Status { body, .. } => format!("Stream error: {}", body),
        ClientError::Network(message) | ClientError::Parse(message) => {
            format!("Streaming failed: {}", message)
        }
        ClientError::Cancelled => "Streaming failed: request cancelled".to_string(),
    }
}

/// User-facing text for a failed character detection
fn extract_failure_message(error: &ClientError) -> String {
    match error {
        ClientError::Network(message) | ClientError::Parse(message) => {
            format!("Error: {}", message)
        }
        ClientError::Status { .. } | ClientError::Cancelled => format!("Error: {}", error),
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
