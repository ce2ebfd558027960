//! One HTTP call per remote method.

use std::collections::BTreeMap;

use reqwest::{header::CONTENT_TYPE, multipart};
use serde::de::DeserializeOwned;
use tracing::debug;

use tbot_core::{
    config::Config,
    outgoing::{ApiRequest, FileField, Payload},
    response::ApiResponse,
    Error, Method, Result,
};

/// Owns the HTTP client and the `<api_url>/bot<token>` prefix.
///
/// Errors name the method only. reqwest errors are stripped of their URL
/// before they are wrapped, since the URL carries the token.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    bot_url: String,
}

impl Transport {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                Error::Transport(format!("http client build error: {}", e.without_url()))
            })?;
        Ok(Self {
            http,
            bot_url: config.bot_url(),
        })
    }

    fn endpoint(&self, method: Method) -> String {
        format!("{}/{}", self.bot_url, method.as_str())
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        method: Method,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        debug!(%method, "GET");
        let resp = self
            .http
            .get(self.endpoint(method))
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(method, e))?;
        decode(method, resp).await
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        method: Method,
        body: &serde_json::Value,
    ) -> Result<ApiResponse<T>> {
        debug!(%method, "POST json");
        let resp = self
            .http
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(method, e))?;
        decode(method, resp).await
    }

    /// Multipart POST with one file part plus string form fields.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        method: Method,
        file: FileField,
        fields: BTreeMap<String, String>,
    ) -> Result<ApiResponse<T>> {
        debug!(
            %method,
            field = file.field_name,
            file_name = %file.file_name,
            bytes = file.data.len(),
            "POST multipart"
        );

        let mut form = multipart::Form::new();
        for (k, v) in fields {
            form = form.text(k, v);
        }
        form = form.part(
            file.field_name,
            multipart::Part::bytes(file.data).file_name(file.file_name),
        );

        let resp = self
            .http
            .post(self.endpoint(method))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(method, e))?;
        decode(method, resp).await
    }

    /// Render `req` and send it the way its payload asks for.
    pub async fn call<R: ApiRequest>(&self, req: R) -> Result<R::Response> {
        let method = req.method();
        let resp = match req.into_payload()? {
            Payload::Json(body) => self.post_json::<R::Response>(method, &body).await?,
            Payload::Multipart { file, fields } => {
                self.upload::<R::Response>(method, file, fields).await?
            }
        };
        resp.into_result()
    }
}

fn transport_error(method: Method, e: reqwest::Error) -> Error {
    Error::Transport(format!("{method}: {}", e.without_url()))
}

async fn decode<T: DeserializeOwned>(
    method: Method,
    resp: reqwest::Response,
) -> Result<ApiResponse<T>> {
    let status = resp.status().as_u16();
    if status >= 500 {
        return Err(Error::Server { method, status });
    }

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.starts_with("application/json") {
        return Err(Error::UnexpectedContentType {
            method,
            status,
            content_type,
        });
    }

    let body = resp.bytes().await.map_err(|e| transport_error(method, e))?;
    debug!(%method, status, bytes = body.len(), "response");
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tbot_core::{
        outgoing::{InputFile, OutgoingDocument, OutgoingMessage, Recipient},
        types::Message,
    };
    use wiremock::{
        matchers::{body_json, body_string_contains, header_exists, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const TOKEN: &str = "123:SECRET";

    fn transport_for(server: &MockServer) -> Transport {
        Transport::new(&Config::new(TOKEN).with_api_url(server.uri())).unwrap()
    }

    fn sent_message() -> serde_json::Value {
        json!({
            "ok": true,
            "result": {"message_id": 1, "date": 0, "chat": {"id": 7, "type": "private"}}
        })
    }

    #[tokio::test]
    async fn get_sends_query_and_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bot123:SECRET/getFile"))
            .and(query_param("file_id", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"file_id": "abc", "file_path": "docs/a.pdf"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp: ApiResponse<tbot_core::types::File> = transport_for(&server)
            .get(Method::GetFile, &[("file_id", "abc".to_string())])
            .await
            .unwrap();
        let file = resp.into_result().unwrap();
        assert_eq!(file.path.as_deref(), Some("docs/a.pdf"));
    }

    #[tokio::test]
    async fn server_error_is_not_decoded_and_hides_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .get::<serde_json::Value>(Method::GetMe, &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Server {
                method: Method::GetMe,
                status: 502
            }
        ));
        assert!(!err.to_string().contains("SECRET"));
    }

    #[tokio::test]
    async fn client_error_envelope_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .call(OutgoingMessage::new(Recipient::chat(1), "hi"))
            .await
            .unwrap_err();
        match err {
            Error::Api { code, description } => {
                assert_eq!(code, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .get::<serde_json::Value>(Method::GetMe, &[])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedContentType { status: 404, .. }
        ));
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{\"ok\": tru", "application/json"),
            )
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .get::<serde_json::Value>(Method::GetMe, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error_without_token() {
        let cfg = Config::new(TOKEN).with_api_url("http://127.0.0.1:9");
        let err = Transport::new(&cfg)
            .unwrap()
            .get::<serde_json::Value>(Method::GetMe, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(!err.to_string().contains("SECRET"));
    }

    #[tokio::test]
    async fn call_posts_json_for_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:SECRET/sendMessage"))
            .and(body_json(json!({"chat_id": 7, "text": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message()))
            .expect(1)
            .mount(&server)
            .await;

        let msg: Message = transport_for(&server)
            .call(OutgoingMessage::new(Recipient::chat(7), "hello"))
            .await
            .unwrap();
        assert_eq!(msg.chat.id, 7);
    }

    #[tokio::test]
    async fn call_uploads_multipart_for_new_files() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:SECRET/sendDocument"))
            .and(header_exists("content-type"))
            .and(body_string_contains("name=\"document\"; filename=\"report.txt\""))
            .and(body_string_contains("name=\"chat_id\""))
            .and(body_string_contains("quarterly numbers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message()))
            .expect(1)
            .mount(&server)
            .await;

        let doc = OutgoingDocument::new(
            Recipient::chat(7),
            InputFile::upload("report.txt", b"quarterly numbers".to_vec()),
        );
        transport_for(&server).call(doc).await.unwrap();
    }
}
