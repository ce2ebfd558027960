//! Outgoing requests: typed builders that render to a JSON body or a
//! multipart upload for one remote method.

use std::{collections::BTreeMap, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{errors::Error, methods::Method, types::Chat, Result};

pub mod inline;
pub mod markup;
pub mod messages;
pub mod requests;

pub use inline::*;
pub use markup::*;
pub use messages::*;
pub use requests::*;

use messages::media_payload;

/// Where a message goes: a chat by id, or a channel by `@name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Recipient {
    Chat(i64),
    Channel(String),
}

impl Recipient {
    pub fn chat(id: i64) -> Self {
        Recipient::Chat(id)
    }

    pub fn channel(name: impl Into<String>) -> Self {
        Recipient::Channel(name.into())
    }

    /// Form-field rendering for multipart uploads.
    pub fn to_field(&self) -> String {
        match self {
            Recipient::Chat(id) => id.to_string(),
            Recipient::Channel(name) => name.clone(),
        }
    }
}

impl From<&Chat> for Recipient {
    // Bots never receive messages from channels, so a chat id is always enough.
    fn from(chat: &Chat) -> Self {
        Recipient::Chat(chat.id)
    }
}

/// A file attachment: either new bytes to upload, or a file the remote
/// already knows about.
#[derive(Clone, PartialEq, Eq)]
pub enum InputFile {
    Upload { file_name: String, data: Vec<u8> },
    Resend { file_id: String },
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFile::Upload { file_name, data } => f
                .debug_struct("Upload")
                .field("file_name", file_name)
                .field("len", &data.len())
                .finish(),
            InputFile::Resend { file_id } => {
                f.debug_struct("Resend").field("file_id", file_id).finish()
            }
        }
    }
}

impl InputFile {
    /// The remote may look at the extension of `file_name`.
    pub fn upload(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        InputFile::Upload {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    pub fn resend(file_id: impl Into<String>) -> Self {
        InputFile::Resend {
            file_id: file_id.into(),
        }
    }

    /// Read a local file for upload, naming it after its last path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file")
            .to_string();
        debug!(path = %path.display(), %file_name, bytes = data.len(), "read upload");
        Ok(InputFile::Upload { file_name, data })
    }

    /// Rejects an upload without a file name and a resend without an id.
    pub fn validate(&self) -> Result<()> {
        let specified = match self {
            InputFile::Upload { file_name, .. } => !file_name.trim().is_empty(),
            InputFile::Resend { file_id } => !file_id.trim().is_empty(),
        };
        if specified {
            Ok(())
        } else {
            Err(Error::NoFileSpecified)
        }
    }
}

/// The file part of a multipart request.
#[derive(Clone, Debug)]
pub struct FileField {
    pub field_name: &'static str,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// How a request goes over the wire.
#[derive(Debug)]
pub enum Payload {
    Json(serde_json::Value),
    Multipart {
        file: FileField,
        fields: BTreeMap<String, String>,
    },
}

/// A request for one remote method with a typed result.
pub trait ApiRequest: Sized {
    type Response: DeserializeOwned + Send + 'static;

    fn method(&self) -> Method;

    /// Validate and render. Validation failures happen here, before any IO.
    fn into_payload(self) -> Result<Payload>;
}

pub(crate) fn json_payload<T: Serialize>(value: &T) -> Result<Payload> {
    Ok(Payload::Json(serde_json::to_value(value)?))
}

/// Options shared by every message-producing request.
#[derive(Clone, Debug, Serialize)]
pub struct MessageOptions {
    pub chat_id: Recipient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_notification: bool,
}

impl MessageOptions {
    pub fn new(chat_id: Recipient) -> Self {
        Self {
            chat_id,
            reply_to_message_id: None,
            reply_markup: None,
            disable_notification: false,
        }
    }

    /// String form fields for multipart uploads.
    pub fn query_fields(&self) -> Result<BTreeMap<String, String>> {
        let mut out = BTreeMap::new();
        out.insert("chat_id".to_string(), self.chat_id.to_field());
        if let Some(id) = self.reply_to_message_id {
            out.insert("reply_to_message_id".to_string(), id.to_string());
        }
        if let Some(markup) = &self.reply_markup {
            out.insert("reply_markup".to_string(), serde_json::to_string(markup)?);
        }
        if self.disable_notification {
            out.insert("disable_notification".to_string(), "true".to_string());
        }
        Ok(out)
    }
}

/// Fluent setters for [`MessageOptions`], available on every message builder.
pub trait MessageBuilder: Sized {
    fn options(&self) -> &MessageOptions;
    fn options_mut(&mut self) -> &mut MessageOptions;

    fn disable_notification(mut self, to: bool) -> Self {
        self.options_mut().disable_notification = to;
        self
    }

    fn reply_to_message_id(mut self, id: i64) -> Self {
        self.options_mut().reply_to_message_id = Some(id);
        self
    }

    /// Attach reply markup.
    ///
    /// # Panics
    ///
    /// If markup was already set on this message; only one kind may be sent.
    fn reply_markup(mut self, markup: impl Into<ReplyMarkup>) -> Self {
        let markup = markup.into();
        let slot = &mut self.options_mut().reply_markup;
        if let Some(existing) = slot.as_ref() {
            panic!(
                "only one reply markup can be set per message (already have {}, got {})",
                existing.kind(),
                markup.kind()
            );
        }
        *slot = Some(markup);
        self
    }
}

/// Every request that produces a sent [`crate::types::Message`].
#[derive(Clone, Debug)]
pub enum Outgoing {
    Message(OutgoingMessage),
    Location(OutgoingLocation),
    Venue(OutgoingVenue),
    Forward(OutgoingForward),
    Audio(OutgoingAudio),
    Document(OutgoingDocument),
    Photo(OutgoingPhoto),
    Sticker(OutgoingSticker),
    Video(OutgoingVideo),
    Voice(OutgoingVoice),
}

impl ApiRequest for Outgoing {
    type Response = crate::types::Message;

    fn method(&self) -> Method {
        match self {
            Outgoing::Message(m) => m.method(),
            Outgoing::Location(m) => m.method(),
            Outgoing::Venue(m) => m.method(),
            Outgoing::Forward(m) => m.method(),
            Outgoing::Audio(m) => m.method(),
            Outgoing::Document(m) => m.method(),
            Outgoing::Photo(m) => m.method(),
            Outgoing::Sticker(m) => m.method(),
            Outgoing::Video(m) => m.method(),
            Outgoing::Voice(m) => m.method(),
        }
    }

    fn into_payload(self) -> Result<Payload> {
        match self {
            Outgoing::Message(m) => json_payload(&m),
            Outgoing::Location(m) => json_payload(&m),
            Outgoing::Venue(m) => json_payload(&m),
            Outgoing::Forward(m) => json_payload(&m),
            Outgoing::Audio(m) => media_payload(m),
            Outgoing::Document(m) => media_payload(m),
            Outgoing::Photo(m) => media_payload(m),
            Outgoing::Sticker(m) => media_payload(m),
            Outgoing::Video(m) => media_payload(m),
            Outgoing::Voice(m) => media_payload(m),
        }
    }
}
