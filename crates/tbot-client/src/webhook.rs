use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use tbot_core::{types::Update, Error, Result};

/// Feeds webhook deliveries into the same channel the poller would use.
///
/// Framework agnostic: hand it the raw request body and answer with the
/// returned status. There is no ordering or cursor here; the remote pushes
/// each update once and considers it delivered on any 2xx.
#[derive(Clone)]
pub struct WebhookHandler {
    tx: mpsc::Sender<Result<Update>>,
    shutdown: CancellationToken,
}

impl WebhookHandler {
    pub(crate) fn new(tx: mpsc::Sender<Result<Update>>, shutdown: CancellationToken) -> Self {
        Self { tx, shutdown }
    }

    /// Decode one update (or the decode error) and forward it. Always 200,
    /// so the remote does not redeliver a body that will never decode.
    pub async fn handle(&self, body: &[u8]) -> u16 {
        let item = serde_json::from_slice::<Update>(body).map_err(Error::from);
        match &item {
            Ok(u) => debug!(update_id = u.id, kind = %u.kind(), "webhook update"),
            Err(e) => warn!(error = %e, "undecodable webhook body"),
        }

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => {
                debug!("client closed, dropping webhook update");
            }
            r = self.tx.send(item) => {
                if r.is_err() {
                    debug!("update receiver dropped, dropping webhook update");
                }
            }
        }
        200
    }
}
