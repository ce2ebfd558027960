use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use tbot_core::{
    config::Config,
    outgoing::{ApiRequest, InputFile, Outgoing, SetWebhook},
    types::{File, Message, Update, User},
    Method, Result,
};

use crate::{
    poller::{LoopState, Poller},
    transport::Transport,
    updates::UpdateFetcher,
    webhook::WebhookHandler,
};

/// A client bound to one bot token.
///
/// Cheap to clone; clones share the transport and the update stream's
/// lifecycle. Requests run in the caller's task.
#[derive(Clone)]
pub struct BotApi {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Transport,
    config: Config,
    me: User,
    poller: Option<Poller>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for BotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApi")
            .field("me", &self.inner.me)
            .field("api_url", &self.inner.config.api_url)
            .finish_non_exhaustive()
    }
}

/// The consumer side of the update channel.
#[derive(Debug)]
pub struct Updates {
    rx: mpsc::Receiver<Result<Update>>,
    shutdown: CancellationToken,
}

impl Updates {
    /// Next update or fetch error, in id order. `None` once the client is
    /// closed, even if items were still queued.
    pub async fn recv(&mut self) -> Option<Result<Update>> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            item = self.rx.recv() => item,
        }
    }
}

impl BotApi {
    /// Check the token, drop any webhook and start long polling.
    pub async fn new(config: Config) -> Result<(BotApi, Updates)> {
        let transport = Transport::new(&config)?;
        let me = fetch_me(&transport).await?;
        transport.call(SetWebhook::remove()).await?;

        let (tx, rx) = mpsc::channel(1);
        let shutdown = CancellationToken::new();
        let fetcher = Arc::new(UpdateFetcher::new(transport.clone(), &config));
        let poller = Poller::spawn(fetcher, tx);
        info!(bot = %me, "client started in polling mode");

        let api = BotApi {
            inner: Arc::new(Inner {
                transport,
                config,
                me,
                poller: Some(poller),
                shutdown: shutdown.clone(),
            }),
        };
        Ok((api, Updates { rx, shutdown }))
    }

    /// Check the token and register `webhook_url` together with the
    /// certificate at `cert_path`. Updates arrive through the returned
    /// handler, which the application mounts on its HTTP server.
    pub async fn new_with_webhook(
        config: Config,
        webhook_url: &str,
        cert_path: impl AsRef<Path>,
    ) -> Result<(BotApi, Updates, WebhookHandler)> {
        let transport = Transport::new(&config)?;
        let me = fetch_me(&transport).await?;

        let cert = InputFile::from_path(cert_path).await?;
        transport
            .call(SetWebhook::new(webhook_url).certificate(cert))
            .await?;

        let (tx, rx) = mpsc::channel(1);
        let shutdown = CancellationToken::new();
        let handler = WebhookHandler::new(tx, shutdown.clone());
        info!(bot = %me, "client started in webhook mode");

        let api = BotApi {
            inner: Arc::new(Inner {
                transport,
                config,
                me,
                poller: None,
                shutdown: shutdown.clone(),
            }),
        };
        Ok((api, Updates { rx, shutdown }, handler))
    }

    /// The bot's own identity, as checked at construction.
    pub fn me(&self) -> &User {
        &self.inner.me
    }

    pub async fn get_me(&self) -> Result<User> {
        fetch_me(&self.inner.transport).await
    }

    /// Look up a file for download; see [`BotApi::file_url`].
    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        self.inner
            .transport
            .get::<File>(Method::GetFile, &[("file_id", file_id.to_string())])
            .await?
            .into_result()
    }

    /// Download URL for a file from [`BotApi::get_file`]. Contains the token.
    pub fn file_url(&self, file: &File) -> Option<String> {
        file.path
            .as_deref()
            .map(|p| format!("{}/{}", self.inner.config.file_url(), p))
    }

    /// Send any message-producing request.
    pub async fn send(&self, msg: impl Into<Outgoing>) -> Result<Message> {
        self.execute(msg.into()).await
    }

    pub async fn execute<R: ApiRequest>(&self, req: R) -> Result<R::Response> {
        self.inner.transport.call(req).await
    }

    /// Polling state; `None` in webhook mode.
    pub fn polling_state(&self) -> Option<LoopState> {
        self.inner.poller.as_ref().map(Poller::state)
    }

    /// Stop delivering updates. Returns once polling has fully stopped; from
    /// then on [`Updates::recv`] yields `None`. Idempotent.
    pub async fn close(&self) {
        self.inner.shutdown.cancel();
        if let Some(poller) = &self.inner.poller {
            poller.close().await;
        }
    }
}

async fn fetch_me(transport: &Transport) -> Result<User> {
    transport
        .get::<User>(Method::GetMe, &[])
        .await?
        .into_result()
}

/// Lets every request builder send itself: `msg.send(&api).await`.
#[async_trait]
pub trait Request: ApiRequest + Send {
    async fn send(self, api: &BotApi) -> Result<Self::Response>;
}

#[async_trait]
impl<R> Request for R
where
    R: ApiRequest + Send + 'static,
{
    async fn send(self, api: &BotApi) -> Result<R::Response> {
        api.execute(self).await
    }
}
