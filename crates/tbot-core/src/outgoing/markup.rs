//! Reply markup attached to outgoing messages.

use serde::Serialize;

/// At most one of these can accompany a message.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    ReplyKeyboard(ReplyKeyboardMarkup),
    HideKeyboard(ReplyKeyboardHide),
    ForceReply(ForceReply),
    InlineKeyboard(InlineKeyboardMarkup),
}

impl ReplyMarkup {
    pub fn kind(&self) -> &'static str {
        match self {
            ReplyMarkup::ReplyKeyboard(_) => "ReplyKeyboardMarkup",
            ReplyMarkup::HideKeyboard(_) => "ReplyKeyboardHide",
            ReplyMarkup::ForceReply(_) => "ForceReply",
            ReplyMarkup::InlineKeyboard(_) => "InlineKeyboardMarkup",
        }
    }
}

/// A custom keyboard with reply options.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
    pub one_time_keyboard: bool,
    pub selective: bool,
}

impl ReplyKeyboardMarkup {
    pub fn new(keyboard: Vec<Vec<KeyboardButton>>) -> Self {
        Self {
            keyboard,
            ..Default::default()
        }
    }

    pub fn resize(mut self, to: bool) -> Self {
        self.resize_keyboard = to;
        self
    }

    pub fn one_time(mut self, to: bool) -> Self {
        self.one_time_keyboard = to;
        self
    }

    pub fn selective(mut self, to: bool) -> Self {
        self.selective = to;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
    pub request_contact: bool,
    pub request_location: bool,
}

impl KeyboardButton {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn request_contact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: true,
            request_location: false,
        }
    }

    pub fn request_location(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: false,
            request_location: true,
        }
    }
}

/// Removes a previously shown custom keyboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplyKeyboardHide {
    pub selective: bool,
}

impl Serialize for ReplyKeyboardHide {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ReplyKeyboardHide", 2)?;
        s.serialize_field("hide_keyboard", &true)?;
        s.serialize_field("selective", &self.selective)?;
        s.end()
    }
}

/// Shows a reply interface to the user, as if they had tapped "reply".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForceReply {
    pub selective: bool,
}

impl Serialize for ForceReply {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ForceReply", 2)?;
        s.serialize_field("force_reply", &true)?;
        s.serialize_field("selective", &self.selective)?;
        s.end()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn new(rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        Self {
            inline_keyboard: rows,
        }
    }

    /// One button per row.
    pub fn column(buttons: Vec<InlineKeyboardButton>) -> Self {
        Self::new(buttons.into_iter().map(|b| vec![b]).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_inline_query: Option<String>,
}

impl InlineKeyboardButton {
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn switch_inline_query(text: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            switch_inline_query: Some(query.into()),
            ..Default::default()
        }
    }
}

impl From<ReplyKeyboardMarkup> for ReplyMarkup {
    fn from(v: ReplyKeyboardMarkup) -> Self {
        ReplyMarkup::ReplyKeyboard(v)
    }
}

impl From<ReplyKeyboardHide> for ReplyMarkup {
    fn from(v: ReplyKeyboardHide) -> Self {
        ReplyMarkup::HideKeyboard(v)
    }
}

impl From<ForceReply> for ReplyMarkup {
    fn from(v: ForceReply) -> Self {
        ReplyMarkup::ForceReply(v)
    }
}

impl From<InlineKeyboardMarkup> for ReplyMarkup {
    fn from(v: InlineKeyboardMarkup) -> Self {
        ReplyMarkup::InlineKeyboard(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hide_and_force_reply_always_carry_their_flag() {
        let hide = serde_json::to_value(ReplyMarkup::from(ReplyKeyboardHide { selective: true }))
            .unwrap();
        assert_eq!(hide, json!({"hide_keyboard": true, "selective": true}));

        let force = serde_json::to_value(ReplyMarkup::from(ForceReply::default())).unwrap();
        assert_eq!(force, json!({"force_reply": true, "selective": false}));
    }

    #[test]
    fn inline_buttons_omit_unset_actions() {
        let markup = InlineKeyboardMarkup::column(vec![
            InlineKeyboardButton::callback("Yes", "answer:yes"),
            InlineKeyboardButton::url("Docs", "https://example.org"),
        ]);
        let v = serde_json::to_value(ReplyMarkup::from(markup)).unwrap();
        assert_eq!(
            v,
            json!({"inline_keyboard": [
                [{"text": "Yes", "callback_data": "answer:yes"}],
                [{"text": "Docs", "url": "https://example.org"}]
            ]})
        );
    }
}
