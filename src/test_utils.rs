#[cfg(test)]
pub mod test_helpers {
    use std::sync::mpsc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    use crate::app::App;
    use crate::client::StreamKind;
    use crate::config::ExportConfig;
    use crate::stream::StreamEvent;
    use crate::worker::{WorkerHandle, WorkerRequest, WorkerResponse};

    pub const TEST_STORY: &str = "The lighthouse keeper counted the ships.\nNone came.";

    /// The far side of a worker, driven by hand from tests
    pub struct FakeWorker {
        pub requests: UnboundedReceiver<WorkerRequest>,
        pub responses: mpsc::Sender<WorkerResponse>,
    }

    impl FakeWorker {
        /// Next request the app sent, if any
        pub fn next_request(&mut self) -> Option<WorkerRequest> {
            self.requests.try_recv().ok()
        }

        /// Request id of the next request, panicking if there is none
        pub fn next_request_id(&mut self) -> u64 {
            match self.next_request() {
                Some(WorkerRequest::Stream { request_id, .. })
                | Some(WorkerRequest::Extract { request_id, .. }) => request_id,
                other => panic!("Expected a stream or extract request, got {:?}", other),
            }
        }

        pub fn respond(&self, response: WorkerResponse) {
            self.responses.send(response).unwrap();
        }

        pub fn chunk(&self, kind: StreamKind, request_id: u64, idx: usize, text: &str) {
            self.respond(WorkerResponse::Event {
                kind,
                request_id,
                event: StreamEvent::Chunk {
                    idx,
                    text: text.to_string(),
                },
            });
        }

        pub fn done(&self, kind: StreamKind, request_id: u64, idx: usize) {
            self.respond(WorkerResponse::Event {
                kind,
                request_id,
                event: StreamEvent::Done { idx },
            });
        }

        pub fn finished(&self, kind: StreamKind, request_id: u64) {
            self.respond(WorkerResponse::Finished { kind, request_id });
        }
    }

    /// App without a worker; export goes to the working directory
    pub fn test_app(story: &str) -> App {
        App::new(story, ExportConfig::default(), None)
    }

    /// App wired to a [`FakeWorker`]
    pub fn app_with_worker(story: &str) -> (App, FakeWorker) {
        let (request_tx, requests) = unbounded_channel();
        let (responses, response_rx) = mpsc::channel();
        let handle = WorkerHandle::from_channels(request_tx, response_rx);
        let app = App::new(story, ExportConfig::default(), Some(handle));
        (
            app,
            FakeWorker {
                requests,
                responses,
            },
        )
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    pub fn key_with_mods(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }
}
