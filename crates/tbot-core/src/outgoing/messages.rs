//! Builders for requests that produce a sent message.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    ApiRequest, FileField, InputFile, MessageBuilder, MessageOptions, Outgoing, Payload,
    Recipient,
};
use crate::{methods::Method, types::Message, Result};

/// How the client renders message text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
    #[serde(rename = "HTML")]
    Html,
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingMessage {
    #[serde(flatten)]
    pub options: MessageOptions,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_web_page_preview: bool,
}

impl OutgoingMessage {
    pub fn new(to: Recipient, text: impl Into<String>) -> Self {
        Self {
            options: MessageOptions::new(to),
            text: text.into(),
            parse_mode: None,
            disable_web_page_preview: false,
        }
    }

    /// Parse as Markdown (`true`) or plain text (`false`).
    pub fn markdown(mut self, to: bool) -> Self {
        self.parse_mode = to.then_some(ParseMode::Markdown);
        self
    }

    /// Parse as HTML (`true`) or plain text (`false`).
    pub fn html(mut self, to: bool) -> Self {
        self.parse_mode = to.then_some(ParseMode::Html);
        self
    }

    pub fn disable_web_page_preview(mut self, to: bool) -> Self {
        self.disable_web_page_preview = to;
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingLocation {
    #[serde(flatten)]
    pub options: MessageOptions,
    pub latitude: f64,
    pub longitude: f64,
}

impl OutgoingLocation {
    pub fn new(to: Recipient, latitude: f64, longitude: f64) -> Self {
        Self {
            options: MessageOptions::new(to),
            latitude,
            longitude,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingVenue {
    #[serde(flatten)]
    pub options: MessageOptions,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foursquare_id: Option<String>,
}

impl OutgoingVenue {
    pub fn new(
        to: Recipient,
        latitude: f64,
        longitude: f64,
        title: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            options: MessageOptions::new(to),
            latitude,
            longitude,
            title: title.into(),
            address: address.into(),
            foursquare_id: None,
        }
    }

    pub fn foursquare_id(mut self, id: impl Into<String>) -> Self {
        self.foursquare_id = Some(id.into());
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingForward {
    #[serde(flatten)]
    pub options: MessageOptions,
    pub from_chat_id: Recipient,
    pub message_id: i64,
}

impl OutgoingForward {
    pub fn new(to: Recipient, from: Recipient, message_id: i64) -> Self {
        Self {
            options: MessageOptions::new(to),
            from_chat_id: from,
            message_id,
        }
    }
}

/// A message that carries one file.
pub trait MediaRequest: MessageBuilder + Serialize {
    /// Name of the file field, both in multipart bodies and (as a file id)
    /// in JSON resends.
    const FIELD: &'static str;

    fn file(&self) -> &InputFile;
    fn into_file(self) -> InputFile;

    /// Type-specific form fields beyond [`MessageOptions::query_fields`].
    fn extra_fields(&self, _out: &mut BTreeMap<String, String>) {}

    fn query_fields(&self) -> Result<BTreeMap<String, String>> {
        let mut out = self.options().query_fields()?;
        self.extra_fields(&mut out);
        Ok(out)
    }
}

pub(crate) fn media_payload<M: MediaRequest>(media: M) -> Result<Payload> {
    media.file().validate()?;

    let fields = media.query_fields()?;
    let mut body = serde_json::to_value(&media)?;
    match media.into_file() {
        InputFile::Resend { file_id } => {
            if let serde_json::Value::Object(map) = &mut body {
                map.insert(M::FIELD.to_string(), serde_json::Value::String(file_id));
            }
            Ok(Payload::Json(body))
        }
        InputFile::Upload { file_name, data } => Ok(Payload::Multipart {
            file: FileField {
                field_name: M::FIELD,
                file_name,
                data,
            },
            fields,
        }),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingAudio {
    #[serde(flatten)]
    pub options: MessageOptions,
    #[serde(skip)]
    pub file: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl OutgoingAudio {
    pub fn new(to: Recipient, file: InputFile) -> Self {
        Self {
            options: MessageOptions::new(to),
            file,
            duration: None,
            performer: None,
            title: None,
        }
    }

    pub fn duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn performer(mut self, performer: impl Into<String>) -> Self {
        self.performer = Some(performer.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl MediaRequest for OutgoingAudio {
    const FIELD: &'static str = "audio";

    fn file(&self) -> &InputFile {
        &self.file
    }

    fn into_file(self) -> InputFile {
        self.file
    }

    fn extra_fields(&self, out: &mut BTreeMap<String, String>) {
        if let Some(d) = self.duration {
            out.insert("duration".to_string(), d.to_string());
        }
        if let Some(p) = &self.performer {
            out.insert("performer".to_string(), p.clone());
        }
        if let Some(t) = &self.title {
            out.insert("title".to_string(), t.clone());
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingDocument {
    #[serde(flatten)]
    pub options: MessageOptions,
    #[serde(skip)]
    pub file: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl OutgoingDocument {
    pub fn new(to: Recipient, file: InputFile) -> Self {
        Self {
            options: MessageOptions::new(to),
            file,
            caption: None,
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl MediaRequest for OutgoingDocument {
    const FIELD: &'static str = "document";

    fn file(&self) -> &InputFile {
        &self.file
    }

    fn into_file(self) -> InputFile {
        self.file
    }

    fn extra_fields(&self, out: &mut BTreeMap<String, String>) {
        if let Some(c) = &self.caption {
            out.insert("caption".to_string(), c.clone());
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingPhoto {
    #[serde(flatten)]
    pub options: MessageOptions,
    #[serde(skip)]
    pub file: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl OutgoingPhoto {
    pub fn new(to: Recipient, file: InputFile) -> Self {
        Self {
            options: MessageOptions::new(to),
            file,
            caption: None,
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl MediaRequest for OutgoingPhoto {
    const FIELD: &'static str = "photo";

    fn file(&self) -> &InputFile {
        &self.file
    }

    fn into_file(self) -> InputFile {
        self.file
    }

    fn extra_fields(&self, out: &mut BTreeMap<String, String>) {
        if let Some(c) = &self.caption {
            out.insert("caption".to_string(), c.clone());
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingSticker {
    #[serde(flatten)]
    pub options: MessageOptions,
    #[serde(skip)]
    pub file: InputFile,
}

impl OutgoingSticker {
    pub fn new(to: Recipient, file: InputFile) -> Self {
        Self {
            options: MessageOptions::new(to),
            file,
        }
    }
}

impl MediaRequest for OutgoingSticker {
    const FIELD: &'static str = "sticker";

    fn file(&self) -> &InputFile {
        &self.file
    }

    fn into_file(self) -> InputFile {
        self.file
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingVideo {
    #[serde(flatten)]
    pub options: MessageOptions,
    #[serde(skip)]
    pub file: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl OutgoingVideo {
    pub fn new(to: Recipient, file: InputFile) -> Self {
        Self {
            options: MessageOptions::new(to),
            file,
            duration: None,
            caption: None,
        }
    }

    pub fn duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl MediaRequest for OutgoingVideo {
    const FIELD: &'static str = "video";

    fn file(&self) -> &InputFile {
        &self.file
    }

    fn into_file(self) -> InputFile {
        self.file
    }

    fn extra_fields(&self, out: &mut BTreeMap<String, String>) {
        if let Some(d) = self.duration {
            out.insert("duration".to_string(), d.to_string());
        }
        if let Some(c) = &self.caption {
            out.insert("caption".to_string(), c.clone());
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OutgoingVoice {
    #[serde(flatten)]
    pub options: MessageOptions,
    #[serde(skip)]
    pub file: InputFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl OutgoingVoice {
    pub fn new(to: Recipient, file: InputFile) -> Self {
        Self {
            options: MessageOptions::new(to),
            file,
            duration: None,
        }
    }

    pub fn duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }
}

impl MediaRequest for OutgoingVoice {
    const FIELD: &'static str = "voice";

    fn file(&self) -> &InputFile {
        &self.file
    }

    fn into_file(self) -> InputFile {
        self.file
    }

    fn extra_fields(&self, out: &mut BTreeMap<String, String>) {
        if let Some(d) = self.duration {
            out.insert("duration".to_string(), d.to_string());
        }
    }
}

// Fluent options, the `Outgoing` conversion, and `ApiRequest` through the
// single dispatcher on `Outgoing`.
macro_rules! message_variant {
    ($($ty:ident => $variant:ident, $method:ident;)*) => {
        $(
            impl MessageBuilder for $ty {
                fn options(&self) -> &MessageOptions {
                    &self.options
                }

                fn options_mut(&mut self) -> &mut MessageOptions {
                    &mut self.options
                }
            }

            impl From<$ty> for Outgoing {
                fn from(v: $ty) -> Self {
                    Outgoing::$variant(v)
                }
            }

            impl ApiRequest for $ty {
                type Response = Message;

                fn method(&self) -> Method {
                    Method::$method
                }

                fn into_payload(self) -> Result<Payload> {
                    Outgoing::from(self).into_payload()
                }
            }
        )*
    };
}

message_variant! {
    OutgoingMessage => Message, SendMessage;
    OutgoingLocation => Location, SendLocation;
    OutgoingVenue => Venue, SendVenue;
    OutgoingForward => Forward, ForwardMessage;
    OutgoingAudio => Audio, SendAudio;
    OutgoingDocument => Document, SendDocument;
    OutgoingPhoto => Photo, SendPhoto;
    OutgoingSticker => Sticker, SendSticker;
    OutgoingVideo => Video, SendVideo;
    OutgoingVoice => Voice, SendVoice;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::Error,
        outgoing::{ForceReply, InlineKeyboardButton, InlineKeyboardMarkup, ReplyKeyboardHide},
    };
    use serde_json::json;

    #[test]
    fn text_message_json() {
        let msg = OutgoingMessage::new(Recipient::chat(10), "*hi*")
            .markdown(true)
            .disable_web_page_preview(true)
            .reply_to_message_id(3);
        let Payload::Json(body) = msg.into_payload().unwrap() else {
            panic!("text messages go as JSON");
        };
        assert_eq!(
            body,
            json!({
                "chat_id": 10,
                "text": "*hi*",
                "parse_mode": "Markdown",
                "disable_web_page_preview": true,
                "reply_to_message_id": 3
            })
        );
    }

    #[test]
    fn html_false_resets_parse_mode() {
        let msg = OutgoingMessage::new(Recipient::chat(1), "x")
            .html(true)
            .html(false);
        assert_eq!(msg.parse_mode, None);
    }

    #[test]
    fn reply_markup_is_rendered_once() {
        let msg = OutgoingMessage::new(Recipient::chat(1), "pick")
            .reply_markup(InlineKeyboardMarkup::column(vec![
                InlineKeyboardButton::callback("A", "a"),
            ]));
        let Payload::Json(body) = msg.into_payload().unwrap() else {
            panic!("expected JSON");
        };
        assert_eq!(
            body["reply_markup"],
            json!({"inline_keyboard": [[{"text": "A", "callback_data": "a"}]]})
        );
    }

    #[test]
    #[should_panic(expected = "only one reply markup")]
    fn second_reply_markup_panics() {
        let _ = OutgoingMessage::new(Recipient::chat(1), "x")
            .reply_markup(ForceReply::default())
            .reply_markup(ReplyKeyboardHide::default());
    }

    #[test]
    fn photo_resend_goes_as_json_with_file_id() {
        let photo = OutgoingPhoto::new(Recipient::channel("@pics"), InputFile::resend("AgAD"))
            .caption("sunset");
        let Payload::Json(body) = photo.into_payload().unwrap() else {
            panic!("resend should be JSON");
        };
        assert_eq!(
            body,
            json!({"chat_id": "@pics", "photo": "AgAD", "caption": "sunset"})
        );
    }

    #[test]
    fn audio_upload_goes_as_multipart_with_query_fields() {
        let file = InputFile::upload("song.mp3", vec![7; 4]);
        let audio = OutgoingAudio::new(Recipient::chat(5), file)
            .duration(180)
            .performer("Band")
            .title("Song")
            .disable_notification(true);
        let Payload::Multipart { file, fields } = audio.into_payload().unwrap() else {
            panic!("upload should be multipart");
        };
        assert_eq!(file.field_name, "audio");
        assert_eq!(file.file_name, "song.mp3");
        assert_eq!(file.data.len(), 4);
        assert_eq!(fields["chat_id"], "5");
        assert_eq!(fields["duration"], "180");
        assert_eq!(fields["performer"], "Band");
        assert_eq!(fields["title"], "Song");
        assert_eq!(fields["disable_notification"], "true");
    }

    #[test]
    fn voice_uses_voice_field() {
        let voice = OutgoingVoice::new(Recipient::chat(5), InputFile::upload("a.ogg", vec![1]));
        let Payload::Multipart { file, .. } = voice.into_payload().unwrap() else {
            panic!("upload should be multipart");
        };
        assert_eq!(file.field_name, "voice");
    }

    #[test]
    fn media_without_file_fails_validation() {
        let no_upload = OutgoingDocument::new(Recipient::chat(1), InputFile::upload("", vec![]));
        assert!(matches!(no_upload.into_payload(), Err(Error::NoFileSpecified)));

        let no_resend = OutgoingVideo::new(Recipient::chat(1), InputFile::resend(""));
        assert!(matches!(no_resend.into_payload(), Err(Error::NoFileSpecified)));
    }

    #[test]
    fn venue_and_forward_json() {
        let venue = OutgoingVenue::new(Recipient::chat(1), 1.5, 2.5, "Cafe", "Main St")
            .foursquare_id("4sq");
        let Payload::Json(body) = venue.into_payload().unwrap() else {
            panic!("expected JSON");
        };
        assert_eq!(body["foursquare_id"], "4sq");
        assert_eq!(body["latitude"], 1.5);

        let fwd = OutgoingForward::new(Recipient::chat(1), Recipient::chat(2), 77);
        let Payload::Json(body) = fwd.into_payload().unwrap() else {
            panic!("expected JSON");
        };
        assert_eq!(body, json!({"chat_id": 1, "from_chat_id": 2, "message_id": 77}));
    }
}
