//! Tests for the story worker thread

use super::*;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NDJSON: &str = "application/x-ndjson";

/// Drain responses until `is_last` matches one, failing after five seconds
async fn collect_until<F>(handle: &WorkerHandle, is_last: F) -> Vec<WorkerResponse>
where
    F: Fn(&WorkerResponse) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    let mut responses = Vec::new();
    loop {
        while let Some(response) = handle.try_recv() {
            let last = is_last(&response);
            responses.push(response);
            if last {
                return responses;
            }
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "Timed out waiting for worker, got {:?}",
            responses
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn is_stream_terminal(response: &WorkerResponse) -> bool {
    matches!(
        response,
        WorkerResponse::Finished { .. }
            | WorkerResponse::Failed { .. }
            | WorkerResponse::Cancelled { .. }
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_suggestion_stream_events_then_finished() {
    let server = MockServer::start().await;
    let body = concat!(
        "{\"type\":\"chunk\",\"idx\":0,\"text\":\"Rain \"}\n",
        "{\"type\":\"chunk\",\"idx\":1,\"text\":\"Snow\"}\n",
        "{\"type\":\"chunk\",\"idx\":0,\"text\":\"fell.\"}\n",
        "{\"type\":\"done\",\"idx\":0}\n",
    );
    Mock::given(method("POST"))
        .and(path("/suggestions_stream"))
        .and(body_json(serde_json::json!({"context": "It was late."})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, NDJSON))
        .expect(1)
        .mount(&server)
        .await;

    let handle = spawn_worker(StoryClient::new(server.uri())).unwrap();
    assert!(handle.send(WorkerRequest::Stream {
        kind: StreamKind::Suggestions,
        context: "It was late.".to_string(),
        request_id: 7,
    }));

    let responses = collect_until(&handle, is_stream_terminal).await;
    assert_eq!(responses.len(), 5);
    assert_eq!(
        responses[0],
        WorkerResponse::Event {
            kind: StreamKind::Suggestions,
            request_id: 7,
            event: StreamEvent::Chunk {
                idx: 0,
                text: "Rain ".to_string()
            },
        }
    );
    assert_eq!(
        responses[4],
        WorkerResponse::Finished {
            kind: StreamKind::Suggestions,
            request_id: 7
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_error_status_reports_stream_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/complete_stream"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model unavailable"))
        .mount(&server)
        .await;

    let handle = spawn_worker(StoryClient::new(server.uri())).unwrap();
    handle.send(WorkerRequest::Stream {
        kind: StreamKind::Completion,
        context: "x".to_string(),
        request_id: 1,
    });

    let responses = collect_until(&handle, is_stream_terminal).await;
    assert_eq!(
        responses,
        vec![WorkerResponse::Failed {
            kind: StreamKind::Completion,
            request_id: 1,
            message: "Stream error: model unavailable".to_string(),
        }]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_service_reports_streaming_failed() {
    let handle = spawn_worker(StoryClient::new("http://127.0.0.1:1")).unwrap();
    handle.send(WorkerRequest::Stream {
        kind: StreamKind::Suggestions,
        context: "x".to_string(),
        request_id: 3,
    });

    let responses = collect_until(&handle, is_stream_terminal).await;
    match &responses[..] {
        [WorkerResponse::Failed { message, .. }] => {
            assert!(message.starts_with("Streaming failed: "), "{}", message);
        }
        other => panic!("Expected a single failure, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_stops_a_slow_stream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/suggestions_stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{\"type\":\"done\",\"idx\":0}\n", NDJSON)
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let handle = spawn_worker(StoryClient::new(server.uri())).unwrap();
    handle.send(WorkerRequest::Stream {
        kind: StreamKind::Suggestions,
        context: "x".to_string(),
        request_id: 9,
    });
    handle.send(WorkerRequest::Cancel {
        kind: StreamKind::Suggestions,
    });

    let responses = collect_until(&handle, is_stream_terminal).await;
    assert_eq!(
        responses,
        vec![WorkerResponse::Cancelled {
            kind: StreamKind::Suggestions,
            request_id: 9
        }]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_extract_returns_raw_names() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"characters": ["Alice", "The", "alice"]})),
        )
        .mount(&server)
        .await;

    let handle = spawn_worker(StoryClient::new(server.uri())).unwrap();
    handle.send(WorkerRequest::Extract {
        context: "Alice met the Queen.".to_string(),
        request_id: 2,
    });

    let responses = collect_until(&handle, |_| true).await;
    assert_eq!(
        responses,
        vec![WorkerResponse::Characters {
            request_id: 2,
            names: vec!["Alice".to_string(), "The".to_string(), "alice".to_string()],
        }]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_extract_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let handle = spawn_worker(StoryClient::new(server.uri())).unwrap();
    handle.send(WorkerRequest::Extract {
        context: "x".to_string(),
        request_id: 4,
    });

    let responses = collect_until(&handle, |_| true).await;
    match &responses[..] {
        [WorkerResponse::ExtractFailed { request_id, message }] => {
            assert_eq!(*request_id, 4);
            assert!(message.starts_with("Error: "));
            assert!(message.contains("503"));
        }
        other => panic!("Expected extract failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_worker_loop_exits_when_channel_closed() {
    let (request_tx, request_rx) = unbounded_channel();
    let (response_tx, _response_rx) = mpsc::channel();
    drop(request_tx);

    // Returns instead of waiting forever
    worker_loop(StoryClient::new("http://127.0.0.1:1"), request_rx, response_tx).await;
}

#[test]
fn test_failure_messages() {
    assert_eq!(
        stream_failure_message(&ClientError::Status {
            code: 502,
            body: "bad gateway".to_string()
        }),
        "Stream error: bad gateway"
    );
    assert_eq!(
        stream_failure_message(&ClientError::Network("connection refused".to_string())),
        "Streaming failed: connection refused"
    );
}

#[test]
fn test_extract_failure_messages_carry_a_single_prefix() {
    assert_eq!(
        extract_failure_message(&ClientError::Network("connection refused".to_string())),
        "Error: connection refused"
    );
    assert_eq!(
        extract_failure_message(&ClientError::Parse("expected value".to_string())),
        "Error: expected value"
    );
    assert_eq!(
        extract_failure_message(&ClientError::Status {
            code: 503,
            body: "busy".to_string()
        }),
        "Error: HTTP 503: busy"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_extract_on_unreachable_service_is_not_double_prefixed() {
    let handle = spawn_worker(StoryClient::new("http://127.0.0.1:1")).unwrap();
    handle.send(WorkerRequest::Extract {
        context: "x".to_string(),
        request_id: 9,
    });

    let responses = collect_until(&handle, |_| true).await;
    match &responses[..] {
        [WorkerResponse::ExtractFailed { message, .. }] => {
            assert!(message.starts_with("Error: "), "{}", message);
            assert!(!message.contains("Network error"), "{}", message);
        }
        other => panic!("Expected extract failure, got {:?}", other),
    }
}

#[test]
fn test_handle_reports_closed_worker() {
    let (request_tx, request_rx) = unbounded_channel();
    let (_response_tx, response_rx) = mpsc::channel();
    let handle = WorkerHandle::from_channels(request_tx, response_rx);

    drop(request_rx);
    assert!(!handle.send(WorkerRequest::Cancel {
        kind: StreamKind::Completion
    }));
    assert!(handle.try_recv().is_none());
}
