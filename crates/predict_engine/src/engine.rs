use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use predict_logging::predict_debug;
use thiserror::Error;

use crate::fetch::{FetchSettings, PredictionFetcher, ReqwestFetcher};
use crate::{EngineEvent, FetchError, PredictionRequest, RequestId};

enum EngineCommand {
    Fetch(PredictionRequest),
    CheckImage { request_id: RequestId, path: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(FetchError),
    #[error("failed to spawn engine thread: {0}")]
    Thread(std::io::Error),
}

/// Runs fetches on a background tokio runtime and reports back over a channel.
///
/// Every submitted request produces exactly one `PredictionCompleted` event,
/// success or failure. Requests run concurrently and settle in any order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, EngineError> {
        let fetcher = ReqwestFetcher::new(settings).map_err(EngineError::Client)?;
        Self::with_fetcher(Arc::new(fetcher))
    }

    pub fn with_fetcher(fetcher: Arc<dyn PredictionFetcher>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("predict-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let fetcher = fetcher.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(fetcher.as_ref(), command, event_tx).await;
                    });
                }
                predict_debug!("engine command channel closed");
            })
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, request: PredictionRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch(request));
    }

    pub fn check_image(&self, request_id: RequestId, path: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::CheckImage {
            request_id,
            path: path.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    fetcher: &dyn PredictionFetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Fetch(request) => {
            let result = fetcher.fetch_prediction(&request).await;
            let _ = event_tx.send(EngineEvent::PredictionCompleted {
                request_id: request.request_id,
                domain: request.domain,
                query: request.query,
                result,
            });
        }
        EngineCommand::CheckImage { request_id, path } => {
            let result = fetcher.check_image(&path).await;
            let _ = event_tx.send(EngineEvent::ImageChecked {
                request_id,
                path,
                result,
            });
        }
    }
}
