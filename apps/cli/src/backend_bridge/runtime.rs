//! Runtime bridge between the session command queue and the render thread.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use client_core::{PincodeDirectory, PincodeLookupController};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::session::events::UiEvent;

/// Spawns the backend worker. The worker exits once `cmd_rx` disconnects and
/// every lookup it started has resolved.
pub fn spawn_backend_thread(
    directory: Arc<dyn PincodeDirectory>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let controller = Arc::new(PincodeLookupController::new(directory));
            let forwarder = tokio::spawn(forward_state_changes(
                controller.subscribe(),
                ui_tx.clone(),
            ));
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            let mut in_flight: Vec<tokio::task::JoinHandle<()>> = Vec::new();
            while let Ok(cmd) = cmd_rx.recv() {
                in_flight.retain(|task| !task.is_finished());
                match cmd {
                    BackendCommand::Lookup { input } => {
                        let controller = controller.clone();
                        in_flight.push(tokio::spawn(async move {
                            let outcome = controller.submit(&input).await;
                            tracing::debug!(input = %input, ?outcome, "lookup resolved");
                        }));
                    }
                    BackendCommand::SetFilter { text } => controller.set_filter(text),
                    BackendCommand::Show => {
                        let _ = ui_tx.try_send(UiEvent::Redraw(controller.snapshot()));
                    }
                }
            }

            for task in in_flight {
                if let Err(err) = task.await {
                    tracing::error!("lookup task failed: {err}");
                }
            }
            // Dropping the controller closes the state channel, which ends the
            // forwarder after it has delivered the last change.
            drop(controller);
            let _ = forwarder.await;
        });
    })
}

async fn forward_state_changes(
    mut state_rx: tokio::sync::watch::Receiver<client_core::LookupState>,
    ui_tx: Sender<UiEvent>,
) {
    while state_rx.changed().await.is_ok() {
        let snapshot = state_rx.borrow_and_update().clone();
        match ui_tx.try_send(UiEvent::State(snapshot)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("render queue is full; dropping intermediate state");
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }
}
