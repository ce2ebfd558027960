//! Answers to inline queries.

use serde::Serialize;

use super::{json_payload, ApiRequest, ParseMode, Payload};
use crate::{methods::Method, Result};

#[derive(Clone, Debug, Serialize)]
pub struct InlineQueryAnswer {
    pub inline_query_id: String,
    pub results: Vec<InlineQueryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_time: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_personal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<String>,
}

impl InlineQueryAnswer {
    pub fn new(inline_query_id: impl Into<String>, results: Vec<InlineQueryResult>) -> Self {
        Self {
            inline_query_id: inline_query_id.into(),
            results,
            cache_time: None,
            is_personal: false,
            next_offset: None,
        }
    }

    /// Seconds the remote may cache these results.
    pub fn cache_time(mut self, seconds: u32) -> Self {
        self.cache_time = Some(seconds);
        self
    }

    /// Cache only for the user who sent the query.
    pub fn personal(mut self, to: bool) -> Self {
        self.is_personal = to;
        self
    }

    pub fn next_offset(mut self, offset: impl Into<String>) -> Self {
        self.next_offset = Some(offset.into());
        self
    }
}

impl ApiRequest for InlineQueryAnswer {
    type Response = bool;

    fn method(&self) -> Method {
        Method::AnswerInlineQuery
    }

    fn into_payload(self) -> Result<Payload> {
        json_payload(&self)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum InlineQueryResult {
    #[serde(rename = "article")]
    Article(InlineArticle),
    #[serde(rename = "photo")]
    Photo(InlinePhoto),
    #[serde(rename = "gif")]
    Gif(InlineGif),
    #[serde(rename = "mpeg4_gif")]
    Mpeg4Gif(InlineMpeg4Gif),
    #[serde(rename = "video")]
    Video(InlineVideo),
}

/// Formatting of the message sent when a result is picked.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResultFormatting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_web_page_preview: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InlineArticle {
    pub id: String,
    #[serde(flatten)]
    pub formatting: ResultFormatting,
    pub title: String,
    pub message_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_url: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InlinePhoto {
    pub id: String,
    #[serde(flatten)]
    pub formatting: ResultFormatting,
    pub photo_url: String,
    pub thumb_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InlineGif {
    pub id: String,
    #[serde(flatten)]
    pub formatting: ResultFormatting,
    pub gif_url: String,
    pub thumb_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gif_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gif_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A silent looping MP4.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InlineMpeg4Gif {
    pub id: String,
    #[serde(flatten)]
    pub formatting: ResultFormatting,
    pub mpeg4_url: String,
    pub thumb_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpeg4_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpeg4_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InlineVideo {
    pub id: String,
    #[serde(flatten)]
    pub formatting: ResultFormatting,
    pub video_url: String,
    /// `text/html` for an embedded player, `video/mp4` for a file.
    pub mime_type: String,
    pub thumb_url: String,
    pub title: String,
    pub message_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InlineQueryResult {
    pub fn article(
        id: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        InlineQueryResult::Article(InlineArticle {
            id: id.into(),
            title: title.into(),
            message_text: text.into(),
            ..Default::default()
        })
    }

    pub fn photo(
        id: impl Into<String>,
        photo_url: impl Into<String>,
        thumb_url: impl Into<String>,
    ) -> Self {
        InlineQueryResult::Photo(InlinePhoto {
            id: id.into(),
            photo_url: photo_url.into(),
            thumb_url: thumb_url.into(),
            ..Default::default()
        })
    }

    pub fn gif(
        id: impl Into<String>,
        gif_url: impl Into<String>,
        thumb_url: impl Into<String>,
    ) -> Self {
        InlineQueryResult::Gif(InlineGif {
            id: id.into(),
            gif_url: gif_url.into(),
            thumb_url: thumb_url.into(),
            ..Default::default()
        })
    }

    pub fn mpeg4_gif(
        id: impl Into<String>,
        mpeg4_url: impl Into<String>,
        thumb_url: impl Into<String>,
    ) -> Self {
        InlineQueryResult::Mpeg4Gif(InlineMpeg4Gif {
            id: id.into(),
            mpeg4_url: mpeg4_url.into(),
            thumb_url: thumb_url.into(),
            ..Default::default()
        })
    }

    pub fn video(
        id: impl Into<String>,
        video_url: impl Into<String>,
        mime_type: impl Into<String>,
        thumb_url: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        InlineQueryResult::Video(InlineVideo {
            id: id.into(),
            video_url: video_url.into(),
            mime_type: mime_type.into(),
            thumb_url: thumb_url.into(),
            title: title.into(),
            message_text: text.into(),
            ..Default::default()
        })
    }

    pub fn id(&self) -> &str {
        match self {
            InlineQueryResult::Article(r) => &r.id,
            InlineQueryResult::Photo(r) => &r.id,
            InlineQueryResult::Gif(r) => &r.id,
            InlineQueryResult::Mpeg4Gif(r) => &r.id,
            InlineQueryResult::Video(r) => &r.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn each_result_carries_its_own_type_tag() {
        let results = vec![
            InlineQueryResult::article("1", "T", "text"),
            InlineQueryResult::photo("2", "p", "t"),
            InlineQueryResult::gif("3", "g", "t"),
            InlineQueryResult::mpeg4_gif("4", "m", "t"),
            InlineQueryResult::video("5", "v", "video/mp4", "t", "title", "text"),
        ];
        let tags: Vec<String> = results
            .iter()
            .map(|r| serde_json::to_value(r).unwrap()["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(tags, ["article", "photo", "gif", "mpeg4_gif", "video"]);
    }

    #[test]
    fn answer_body_omits_defaults() {
        let results = vec![InlineQueryResult::article("a", "Title", "Body")];
        let answer = InlineQueryAnswer::new("q1", results)
            .cache_time(30)
            .personal(true);
        assert_eq!(answer.method(), Method::AnswerInlineQuery);

        let Payload::Json(body) = answer.into_payload().unwrap() else {
            panic!("inline answers go as JSON");
        };
        assert_eq!(
            body,
            json!({
                "inline_query_id": "q1",
                "results": [{"type": "article", "id": "a", "title": "Title", "message_text": "Body"}],
                "cache_time": 30,
                "is_personal": true
            })
        );
    }
}
