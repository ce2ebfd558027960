//! Requests that do not produce a message: chat actions, callback answers,
//! member management, profile photos and webhook registration.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{json_payload, ApiRequest, FileField, InputFile, Payload, Recipient};
use crate::{methods::Method, types::UserProfilePhotos, Result};

/// Status shown to the user while the bot prepares a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    Typing,
    UploadPhoto,
    RecordVideo,
    UploadVideo,
    RecordAudio,
    UploadAudio,
    UploadDocument,
    FindLocation,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingChatAction {
    pub chat_id: Recipient,
    pub action: ChatAction,
}

impl OutgoingChatAction {
    pub fn new(to: Recipient, action: ChatAction) -> Self {
        Self {
            chat_id: to,
            action,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CallbackQueryAnswer {
    pub callback_query_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_alert: bool,
}

impl CallbackQueryAnswer {
    pub fn new(callback_query_id: impl Into<String>) -> Self {
        Self {
            callback_query_id: callback_query_id.into(),
            text: None,
            show_alert: false,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Show `text` as a modal alert instead of a toast.
    pub fn show_alert(mut self, to: bool) -> Self {
        self.show_alert = to;
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct KickChatMember {
    pub chat_id: Recipient,
    pub user_id: i64,
}

impl KickChatMember {
    pub fn new(chat: Recipient, user_id: i64) -> Self {
        Self {
            chat_id: chat,
            user_id,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct UnbanChatMember {
    pub chat_id: Recipient,
    pub user_id: i64,
}

impl UnbanChatMember {
    pub fn new(chat: Recipient, user_id: i64) -> Self {
        Self {
            chat_id: chat,
            user_id,
        }
    }
}

/// Permissions granted by a restriction; unset flags are sent as absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChatPermissions {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub can_send_messages: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub can_send_media_messages: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub can_send_other_messages: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub can_add_web_page_previews: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct RestrictChatMember {
    pub chat_id: Recipient,
    pub user_id: i64,
    /// Unix time the restriction ends; absent means forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until_date: Option<i64>,
    #[serde(flatten)]
    pub permissions: ChatPermissions,
}

impl RestrictChatMember {
    pub fn new(chat: Recipient, user_id: i64) -> Self {
        Self {
            chat_id: chat,
            user_id,
            until_date: None,
            permissions: ChatPermissions::default(),
        }
    }

    pub fn until(mut self, unix_time: i64) -> Self {
        self.until_date = Some(unix_time);
        self
    }

    pub fn permissions(mut self, permissions: ChatPermissions) -> Self {
        self.permissions = permissions;
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct UserProfilePhotosRequest {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl UserProfilePhotosRequest {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            offset: None,
            limit: None,
        }
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Registers (or, with an empty url, removes) the webhook.
#[derive(Clone, Debug)]
pub struct SetWebhook {
    pub url: String,
    pub certificate: Option<InputFile>,
}

impl SetWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            certificate: None,
        }
    }

    pub fn remove() -> Self {
        Self::new("")
    }

    /// Public key certificate, for self-signed setups.
    pub fn certificate(mut self, cert: InputFile) -> Self {
        self.certificate = Some(cert);
        self
    }
}

impl ApiRequest for SetWebhook {
    type Response = bool;

    fn method(&self) -> Method {
        Method::SetWebhook
    }

    fn into_payload(self) -> Result<Payload> {
        match self.certificate {
            None => Ok(Payload::Json(serde_json::json!({ "url": self.url }))),
            Some(cert) => {
                cert.validate()?;
                match cert {
                    InputFile::Upload { file_name, data } => {
                        let mut fields = BTreeMap::new();
                        fields.insert("url".to_string(), self.url);
                        Ok(Payload::Multipart {
                            file: FileField {
                                field_name: "certificate",
                                file_name,
                                data,
                            },
                            fields,
                        })
                    }
                    InputFile::Resend { file_id } => Ok(Payload::Json(
                        serde_json::json!({ "url": self.url, "certificate": file_id }),
                    )),
                }
            }
        }
    }
}

macro_rules! json_request {
    ($($ty:ident => $method:ident, $resp:ty;)*) => {
        $(
            impl ApiRequest for $ty {
                type Response = $resp;

                fn method(&self) -> Method {
                    Method::$method
                }

                fn into_payload(self) -> Result<Payload> {
                    json_payload(&self)
                }
            }
        )*
    };
}

json_request! {
    OutgoingChatAction => SendChatAction, bool;
    CallbackQueryAnswer => AnswerCallbackQuery, bool;
    KickChatMember => KickChatMember, bool;
    UnbanChatMember => UnbanChatMember, bool;
    RestrictChatMember => RestrictChatMember, bool;
    UserProfilePhotosRequest => GetUserProfilePhotos, UserProfilePhotos;
}
