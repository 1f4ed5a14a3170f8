//! Scan Services Coordinator
//!
//! Owns the tokio runtime the recognition and upload requests run on, and
//! the channel their results come back over. Requests are fire-and-forget
//! from the UI thread; results are drained once per frame.

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

use crate::backend::BackendConfig;
use crate::capture::frame::CapturedFrame;
use crate::recognition::{HttpRecognitionService, RecognitionService};
use crate::scan::ScanRequest;
use crate::shared::ScanEvent;
use crate::storage::Session;
use crate::upload::{HttpUploadService, UploadService};

/// Runs backend requests off the UI thread
pub struct ScanServices {
    runtime: Runtime,
    recognition: Arc<dyn RecognitionService>,
    upload: Arc<dyn UploadService>,
    events_tx: Sender<ScanEvent>,
    events_rx: Receiver<ScanEvent>,
    /// Woken when an event is sent so the UI drains it promptly
    repaint: Option<egui::Context>,
}

impl ScanServices {
    /// Create the coordinator with the given service implementations
    pub fn new(
        recognition: Arc<dyn RecognitionService>,
        upload: Arc<dyn UploadService>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("scan-net")
            .enable_all()
            .build()
            .context("failed to start network runtime")?;
        let (events_tx, events_rx) = unbounded();

        Ok(Self {
            runtime,
            recognition,
            upload,
            events_tx,
            events_rx,
            repaint: None,
        })
    }

    /// Create the coordinator with the HTTP services
    pub fn from_backend(config: &BackendConfig) -> Result<Self> {
        info!("Using backend at {}", config.base_url);
        let recognition = HttpRecognitionService::new(config)
            .context("failed to create recognition client")?;
        let upload = HttpUploadService::new(config).context("failed to create upload client")?;
        Self::new(Arc::new(recognition), Arc::new(upload))
    }

    /// Request a repaint of this context whenever an event arrives
    pub fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    /// Send a captured still for recognition
    pub fn spawn_recognition(&self, request: ScanRequest, session: Session) {
        let service = self.recognition.clone();
        let tx = self.events_tx.clone();
        let repaint = self.repaint.clone();

        self.runtime.spawn(async move {
            let result = service
                .recognize(&request.frame, &session)
                .await
                .map_err(|e| {
                    warn!("Recognition for scan {} failed: {}", request.scan_id, e);
                    e.to_string()
                });
            send_event(
                &tx,
                repaint.as_ref(),
                ScanEvent::RecognitionFinished {
                    scan_id: request.scan_id,
                    result,
                },
            );
        });
    }

    /// Save a scan to the gallery
    pub fn spawn_upload(&self, frame: CapturedFrame, session: Session, recognition_text: String) {
        let service = self.upload.clone();
        let tx = self.events_tx.clone();
        let repaint = self.repaint.clone();

        self.runtime.spawn(async move {
            let result = service
                .upload(&frame, &session, &recognition_text)
                .await
                .map_err(|e| {
                    error!("Upload failed: {}", e);
                    e.to_string()
                });
            send_event(&tx, repaint.as_ref(), ScanEvent::UploadFinished { result });
        });
    }

    /// Events that arrived since the last call
    pub fn drain_events(&self) -> Vec<ScanEvent> {
        self.events_rx.try_iter().collect()
    }
}

fn send_event(tx: &Sender<ScanEvent>, repaint: Option<&egui::Context>, event: ScanEvent) {
    if tx.send(event).is_err() {
        // Receiver lives as long as the coordinator; only hit during shutdown
        return;
    }
    if let Some(ctx) = repaint {
        ctx.request_repaint();
    }
}
