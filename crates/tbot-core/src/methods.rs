use std::fmt;

/// Remote operations this crate knows how to call.
///
/// A closed set: an endpoint for an unknown operation cannot be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    GetMe,
    GetUpdates,
    SetWebhook,
    GetFile,
    GetUserProfilePhotos,
    SendMessage,
    ForwardMessage,
    SendPhoto,
    SendAudio,
    SendDocument,
    SendSticker,
    SendVideo,
    SendVoice,
    SendLocation,
    SendVenue,
    SendChatAction,
    AnswerInlineQuery,
    AnswerCallbackQuery,
    KickChatMember,
    UnbanChatMember,
    RestrictChatMember,
}

impl Method {
    pub const ALL: [Method; 21] = [
        Method::GetMe,
        Method::GetUpdates,
        Method::SetWebhook,
        Method::GetFile,
        Method::GetUserProfilePhotos,
        Method::SendMessage,
        Method::ForwardMessage,
        Method::SendPhoto,
        Method::SendAudio,
        Method::SendDocument,
        Method::SendSticker,
        Method::SendVideo,
        Method::SendVoice,
        Method::SendLocation,
        Method::SendVenue,
        Method::SendChatAction,
        Method::AnswerInlineQuery,
        Method::AnswerCallbackQuery,
        Method::KickChatMember,
        Method::UnbanChatMember,
        Method::RestrictChatMember,
    ];

    /// Path segment appended to `<api_url>/bot<token>/`.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GetMe => "getMe",
            Method::GetUpdates => "getUpdates",
            Method::SetWebhook => "setWebhook",
            Method::GetFile => "getFile",
            Method::GetUserProfilePhotos => "getUserProfilePhotos",
            Method::SendMessage => "sendMessage",
            Method::ForwardMessage => "forwardMessage",
            Method::SendPhoto => "sendPhoto",
            Method::SendAudio => "sendAudio",
            Method::SendDocument => "sendDocument",
            Method::SendSticker => "sendSticker",
            Method::SendVideo => "sendVideo",
            Method::SendVoice => "sendVoice",
            Method::SendLocation => "sendLocation",
            Method::SendVenue => "sendVenue",
            Method::SendChatAction => "sendChatAction",
            Method::AnswerInlineQuery => "answerInlineQuery",
            Method::AnswerCallbackQuery => "answerCallbackQuery",
            Method::KickChatMember => "kickChatMember",
            Method::UnbanChatMember => "unbanChatMember",
            Method::RestrictChatMember => "restrictChatMember",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
