//! HTTP side of the bot API client.
//!
//! [`BotApi`] sends requests over a reqwest [`transport::Transport`] and
//! delivers inbound updates through [`Updates`], fed either by the
//! long-polling [`poller::Poller`] or by a [`WebhookHandler`].

pub mod api;
pub mod poller;
pub mod transport;
pub mod updates;
pub mod webhook;

pub use api::{BotApi, Request, Updates};
pub use poller::LoopState;
pub use webhook::WebhookHandler;
