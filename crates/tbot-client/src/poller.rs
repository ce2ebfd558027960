//! The long-polling loop.
//!
//! One task owns the cursor, fetches batches from an [`UpdateSource`] and
//! pushes events one at a time into a bounded channel. Fetch errors are
//! delivered as `Err` items and the loop carries on; only [`Poller::close`]
//! (or the consumer going away) stops it.

use std::sync::Arc;

use tokio::{
    sync::{mpsc, watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use tbot_core::{
    ports::{sort_updates, UpdateSource},
    types::Update,
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closing,
    Closed,
}

pub struct Poller {
    cancel: CancellationToken,
    state_tx: Arc<watch::Sender<LoopState>>,
    state_rx: watch::Receiver<LoopState>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    /// Start polling `source`, delivering into `tx`.
    pub fn spawn<S>(source: Arc<S>, tx: mpsc::Sender<Result<Update>>) -> Self
    where
        S: UpdateSource + ?Sized,
    {
        let cancel = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(LoopState::Running);
        let state_tx = Arc::new(state_tx);

        let handle = tokio::spawn(run(source, tx, cancel.clone(), state_tx.clone()));
        info!("update polling started");

        Self {
            cancel,
            state_tx,
            state_rx,
            handle: Mutex::new(Some(handle)),
        }
    }

    pub fn state(&self) -> LoopState {
        *self.state_rx.borrow()
    }

    /// Stop the loop and wait for its task to finish.
    ///
    /// Safe to call more than once and from several tasks; every call returns
    /// only once the task is gone. An in-flight fetch, retry wait or blocked
    /// delivery is abandoned.
    pub async fn close(&self) {
        self.cancel.cancel();
        self.state_tx.send_if_modified(|s| {
            if *s == LoopState::Running {
                *s = LoopState::Closing;
                true
            } else {
                false
            }
        });

        let mut slot = self.handle.lock().await;
        if let Some(handle) = slot.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "polling task ended abnormally");
            }
            info!("update polling stopped");
        }
        self.state_tx.send_replace(LoopState::Closed);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<S>(
    source: Arc<S>,
    tx: mpsc::Sender<Result<Update>>,
    cancel: CancellationToken,
    state: Arc<watch::Sender<LoopState>>,
) where
    S: UpdateSource + ?Sized,
{
    poll(source.as_ref(), &tx, &cancel).await;
    state.send_if_modified(|s| {
        if *s == LoopState::Running {
            *s = LoopState::Closed;
            true
        } else {
            false
        }
    });
}

async fn poll<S>(source: &S, tx: &mpsc::Sender<Result<Update>>, cancel: &CancellationToken)
where
    S: UpdateSource + ?Sized,
{
    let mut offset: Option<i64> = None;

    loop {
        if cancel.is_cancelled() {
            return;
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => return,
            r = source.fetch_updates(offset) => r,
        };

        match fetched {
            Ok(mut updates) => {
                sort_updates(&mut updates);
                for update in updates {
                    let id = update.id;
                    let sent = tokio::select! {
                        _ = cancel.cancelled() => return,
                        r = tx.send(Ok(update)) => r,
                    };
                    if sent.is_err() {
                        debug!("update receiver dropped, stopping");
                        return;
                    }
                    offset = Some(id + 1);
                }
            }
            Err(e) => {
                error!(error = %e, ?offset, "fetching updates failed");
                let sent = tokio::select! {
                    _ = cancel.cancelled() => return,
                    r = tx.send(Err(e)) => r,
                };
                if sent.is_err() {
                    debug!("update receiver dropped, stopping");
                    return;
                }
            }
        }
    }
}
