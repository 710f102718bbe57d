mod state;
mod ui;

use std::sync::mpsc::{channel, Receiver};

use eframe::egui;

use crate::config::StorageConfig;
use crate::upload::{BucketTransfer, TransferEvent};
pub use state::{SelectedFile, UploadMachine};

pub struct DropzoneApp {
    machine: UploadMachine,
    config: StorageConfig,
    event_receiver: Option<Receiver<TransferEvent>>,
}

impl DropzoneApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: StorageConfig) -> Self {
        tracing::info!(bucket = %config.bucket, region = %config.region, "starting uploader");
        Self {
            machine: UploadMachine::default(),
            config,
            event_receiver: None,
        }
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        tracing::info!(file = %file.name, size = file.size, "file selected");
        self.machine.select_file(file);
    }

    pub fn remove_file(&mut self) {
        self.machine.remove_file();
    }

    pub fn dismiss_dialog(&mut self) {
        self.machine.dismiss_dialog();
    }

    /// Spawns the transfer worker. A no-op when nothing is selected or
    /// an upload is already running.
    pub fn start_upload(&mut self) {
        let Some(file) = self.machine.selected_file().cloned() else {
            return;
        };
        if !self.machine.begin_upload() {
            return;
        }
        tracing::info!(file = %file.name, size = file.size, "starting upload");

        let (sender, receiver) = channel();
        self.event_receiver = Some(receiver);
        let config = self.config.clone();

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(err) => {
                    let _ = sender.send(TransferEvent::Failed(format!(
                        "failed to build worker runtime: {err}"
                    )));
                    return;
                }
            };
            rt.block_on(async {
                let client = config.connect().await;
                let transfer = BucketTransfer::new(client, config.bucket.clone());
                // Object key is the original file name; an existing
                // object with the same name gets overwritten.
                match transfer.upload(&file.path, &file.name, &sender).await {
                    Ok(()) => {
                        let _ = sender.send(TransferEvent::Completed);
                    }
                    Err(err) => {
                        let _ = sender.send(TransferEvent::Failed(err.to_string()));
                    }
                }
            });
        });
    }

    /// Drains worker events into the state machine. Failure detail is
    /// logged here, at the controller boundary; the UI only ever shows
    /// a generic banner.
    fn drain_events(&mut self, ctx: &egui::Context) {
        ctx.request_repaint();

        let Some(receiver) = &self.event_receiver else {
            return;
        };
        let mut finished = false;

        while let Ok(event) = receiver.try_recv() {
            match &event {
                TransferEvent::Completed => {
                    tracing::info!("upload completed");
                    finished = true;
                }
                TransferEvent::Failed(detail) => {
                    tracing::error!(error = %detail, "upload failed");
                    finished = true;
                }
                TransferEvent::Progress { .. } => {}
            }
            self.machine.apply(&event);
        }

        if finished {
            self.event_receiver = None;
        }
    }
}

impl eframe::App for DropzoneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.render(ctx);
    }
}
