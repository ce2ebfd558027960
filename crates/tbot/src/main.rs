//! Echo bot: replies to every text message with the same text.
//!
//! Long polls by default. With `TBOT_WEBHOOK_URL` and `TBOT_WEBHOOK_CERT`
//! set it registers the webhook and serves it on `TBOT_WEBHOOK_LISTEN`
//! (plain HTTP; terminate TLS in front of it).

use anyhow::Context;
use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use tokio::net::TcpListener;

use tbot_client::{BotApi, Updates, WebhookHandler};
use tbot_core::{
    config::Config,
    outgoing::{MessageBuilder, OutgoingMessage, Recipient},
    types::{Message, Update},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tbot_core::logging::init("tbot")?;

    let cfg = Config::load()?;
    let listen = cfg.webhook_listen;

    let (api, updates) = match (cfg.webhook_url.clone(), cfg.webhook_cert.clone()) {
        (Some(url), Some(cert)) => {
            let (api, updates, handler) = BotApi::new_with_webhook(cfg, &url, &cert)
                .await
                .context("webhook registration failed")?;
            tokio::spawn(async move {
                if let Err(e) = serve_webhook(listen, handler).await {
                    tracing::error!(error = %e, "webhook server stopped");
                }
            });
            (api, updates)
        }
        (Some(_), None) => anyhow::bail!("TBOT_WEBHOOK_URL is set but TBOT_WEBHOOK_CERT is not"),
        _ => BotApi::new(cfg).await.context("client start failed")?,
    };
    tracing::info!(bot = %api.me(), "ready");

    tokio::select! {
        _ = echo(&api, updates) => {}
        r = tokio::signal::ctrl_c() => {
            r.context("ctrl-c handler failed")?;
            tracing::info!("shutting down");
        }
    }

    api.close().await;
    Ok(())
}

async fn echo(api: &BotApi, mut updates: Updates) {
    while let Some(item) = updates.recv().await {
        let update = match item {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(error = %e, "update error");
                continue;
            }
        };
        if let Err(e) = reply(api, &update).await {
            tracing::error!(update_id = update.id, error = %e, "reply failed");
        }
    }
}

async fn reply(api: &BotApi, update: &Update) -> tbot_core::Result<()> {
    let Some(Message {
        id,
        chat,
        text: Some(text),
        ..
    }) = &update.message
    else {
        tracing::debug!(update_id = update.id, kind = %update.kind(), "ignored");
        return Ok(());
    };

    let out =
        OutgoingMessage::new(Recipient::from(chat), text.clone()).reply_to_message_id(*id);
    api.send(out).await?;
    Ok(())
}

async fn serve_webhook(
    listen: std::net::SocketAddr,
    handler: WebhookHandler,
) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/", post(webhook))
        .route("/*path", post(webhook))
        .with_state(handler);

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {listen}"))?;
    tracing::info!(%listen, "webhook listening");
    axum::serve(listener, app).await.context("webhook server failed")
}

async fn webhook(State(handler): State<WebhookHandler>, body: Bytes) -> StatusCode {
    let status = handler.handle(&body).await;
    StatusCode::from_u16(status).unwrap_or(StatusCode::OK)
}
