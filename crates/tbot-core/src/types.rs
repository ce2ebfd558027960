//! Inbound wire types (updates, messages, users, chats, files).
//!
//! Field names follow the Bot API JSON exactly; unknown fields are ignored so
//! newer API versions keep decoding.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inbound event. `id` is assigned by the remote and strictly increasing.
///
/// The remote sets at most one payload field. Decoding does not enforce that;
/// see [`Update::kind`] for which field wins when a body carries several.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Update {
    #[serde(rename = "update_id")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_query: Option<InlineQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_inline_result: Option<ChosenInlineResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    Message,
    EditedMessage,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    /// Probably a payload added by a newer API version.
    Unknown,
}

impl Update {
    /// The payload this update carries. When more than one field is set the
    /// first present one wins, in this order: `message`, `edited_message`,
    /// `inline_query`, `chosen_inline_result`, `callback_query`. No payload
    /// field (or only fields this crate does not model) gives `Unknown`.
    pub fn kind(&self) -> UpdateKind {
        if self.message.is_some() {
            UpdateKind::Message
        } else if self.edited_message.is_some() {
            UpdateKind::EditedMessage
        } else if self.inline_query.is_some() {
            UpdateKind::InlineQuery
        } else if self.chosen_inline_result.is_some() {
            UpdateKind::ChosenInlineResult
        } else if self.callback_query.is_some() {
            UpdateKind::CallbackQuery
        } else {
            UpdateKind::Unknown
        }
    }
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdateKind::Message => "Message",
            UpdateKind::EditedMessage => "EditedMessage",
            UpdateKind::InlineQuery => "InlineQuery",
            UpdateKind::ChosenInlineResult => "ChosenInlineResult",
            UpdateKind::CallbackQuery => "CallbackQuery",
            UpdateKind::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// A Telegram user or bot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.first_name)?;
        if let Some(last) = &self.last_name {
            write!(f, " {last}")?;
        }
        if let Some(username) = &self.username {
            write!(f, " (@{username})")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    #[default]
    Private,
    Group,
    Supergroup,
    Channel,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.chat_type == ChatType::Private
    }

    pub fn is_group(&self) -> bool {
        self.chat_type == ChatType::Group
    }

    pub fn is_supergroup(&self) -> bool {
        self.chat_type == ChatType::Supergroup
    }

    pub fn is_channel(&self) -> bool {
        self.chat_type == ChatType::Channel
    }
}

impl fmt::Display for Chat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.chat_type {
            ChatType::Private => "P",
            ChatType::Group => "G",
            ChatType::Supergroup => "S",
            ChatType::Channel | ChatType::Unknown => "C",
        };
        write!(f, "{} ({tag})", self.id)?;
        if let Some(title) = &self.title {
            write!(f, " \"{title}\"")?;
        }
        if let Some(first) = &self.first_name {
            write!(f, " {first}")?;
        }
        if let Some(last) = &self.last_name {
            write!(f, " {last}")?;
        }
        if let Some(username) = &self.username {
            write!(f, " (@{username})")?;
        }
        Ok(())
    }
}

/// Fields present in every file-like object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileBase {
    #[serde(rename = "file_id")]
    pub id: String,
    #[serde(rename = "file_size", default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// A file ready to be downloaded; see `BotApi::file_url`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct File {
    #[serde(flatten)]
    pub base: FileBase,
    #[serde(rename = "file_path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhotoSize {
    #[serde(flatten)]
    pub base: FileBase,
    pub width: i64,
    pub height: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Audio {
    #[serde(flatten)]
    pub base: FileBase,
    #[serde(default)]
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Document {
    #[serde(flatten)]
    pub base: FileBase,
    #[serde(rename = "thumb", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PhotoSize>,
    #[serde(rename = "file_name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Sticker {
    #[serde(flatten)]
    pub base: FileBase,
    pub width: i64,
    pub height: i64,
    #[serde(rename = "thumb", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PhotoSize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Video {
    #[serde(flatten)]
    pub base: FileBase,
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(rename = "thumb", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PhotoSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Voice {
    #[serde(flatten)]
    pub base: FileBase,
    #[serde(default)]
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contact {
    pub phone_number: String,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Venue {
    pub location: Location,
    pub title: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foursquare_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageEntityType {
    Mention,
    Hashtag,
    BotCommand,
    Url,
    Email,
    Bold,
    Italic,
    Code,
    Pre,
    TextLink,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: MessageEntityType,
    pub offset: i64,
    pub length: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Message {
    #[serde(rename = "message_id")]
    pub id: i64,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    /// Unix timestamp.
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_from: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message: Option<Box<Message>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<MessageEntity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Sticker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_chat_member: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_chat_member: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_chat_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_chat_photo: Option<Vec<PhotoSize>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub delete_chat_photo: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub group_chat_created: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub supergroup_chat_created: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub channel_chat_created: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrate_from_chat_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_message: Option<Box<Message>>,
}

/// What a message carries. Forwarded messages and replies still have one of
/// these kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Pinned,
    Audio,
    Document,
    Photo,
    Sticker,
    Video,
    Voice,
    Contact,
    Location,
    Venue,
    NewChatMember,
    LeftChatMember,
    NewChatTitle,
    NewChatPhoto,
    DeletedChatPhoto,
    GroupChatCreated,
    SupergroupChatCreated,
    ChannelChatCreated,
    MigrationToSupergroup,
    MigrationFromGroup,
    Unknown,
}

impl MessageKind {
    /// Service messages about the chat itself rather than content.
    pub fn is_chat_action(self) -> bool {
        matches!(
            self,
            MessageKind::NewChatMember
                | MessageKind::LeftChatMember
                | MessageKind::NewChatTitle
                | MessageKind::NewChatPhoto
                | MessageKind::DeletedChatPhoto
                | MessageKind::GroupChatCreated
                | MessageKind::SupergroupChatCreated
                | MessageKind::ChannelChatCreated
                | MessageKind::MigrationToSupergroup
                | MessageKind::MigrationFromGroup
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        if self.text.is_some() {
            MessageKind::Text
        } else if self.audio.is_some() {
            MessageKind::Audio
        } else if self.document.is_some() {
            MessageKind::Document
        } else if self.photo.is_some() {
            MessageKind::Photo
        } else if self.sticker.is_some() {
            MessageKind::Sticker
        } else if self.video.is_some() {
            MessageKind::Video
        } else if self.voice.is_some() {
            MessageKind::Voice
        } else if self.contact.is_some() {
            MessageKind::Contact
        } else if self.venue.is_some() {
            // Venues also carry a location, so check them first.
            MessageKind::Venue
        } else if self.location.is_some() {
            MessageKind::Location
        } else if self.new_chat_member.is_some() {
            MessageKind::NewChatMember
        } else if self.left_chat_member.is_some() {
            MessageKind::LeftChatMember
        } else if self.new_chat_title.is_some() {
            MessageKind::NewChatTitle
        } else if self.new_chat_photo.is_some() {
            MessageKind::NewChatPhoto
        } else if self.delete_chat_photo {
            MessageKind::DeletedChatPhoto
        } else if self.group_chat_created {
            MessageKind::GroupChatCreated
        } else if self.supergroup_chat_created {
            MessageKind::SupergroupChatCreated
        } else if self.channel_chat_created {
            MessageKind::ChannelChatCreated
        } else if self.migrate_to_chat_id.is_some() {
            MessageKind::MigrationToSupergroup
        } else if self.migrate_from_chat_id.is_some() {
            MessageKind::MigrationFromGroup
        } else if self.pinned_message.is_some() {
            MessageKind::Pinned
        } else {
            MessageKind::Unknown
        }
    }

    pub fn is_forwarded(&self) -> bool {
        self.forward_from.is_some()
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to_message.is_some()
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
    #[serde(default)]
    pub offset: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ChosenInlineResult {
    #[serde(rename = "result_id")]
    pub id: String,
    pub from: User,
    pub query: String,
}

/// A press on an inline keyboard button.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_message_id: Option<String>,
    /// Client supplied; do not trust it.
    #[serde(default)]
    pub data: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserProfilePhotos {
    pub total_count: i64,
    /// Up to four sizes per photo.
    pub photos: Vec<Vec<PhotoSize>>,
}
