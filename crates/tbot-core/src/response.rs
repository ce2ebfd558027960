//! The `{ok, error_code, description, result}` envelope around every reply.

use serde::Deserialize;

use crate::{errors::Error, Result};

#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check the envelope, then take the payload out of it.
    pub fn into_result(self) -> Result<T> {
        check(&self)?;
        self.result.ok_or_else(|| Error::Api {
            code: 0,
            description: "response is missing its result".to_string(),
        })
    }
}

/// `Ok(())` for `ok: true`, otherwise an [`Error::Api`] with the remote code and
/// description passed through verbatim.
pub fn check<T>(resp: &ApiResponse<T>) -> Result<()> {
    if resp.ok {
        return Ok(());
    }
    Err(Error::Api {
        code: resp.error_code.unwrap_or_default(),
        description: resp.description.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_passes_ok_envelopes() {
        let resp: ApiResponse<bool> = serde_json::from_str(r#"{"ok":true,"result":true}"#).unwrap();
        assert!(check(&resp).is_ok());
        assert!(resp.into_result().unwrap());
    }

    #[test]
    fn check_reports_code_and_description() {
        let resp: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"bad request"}"#)
                .unwrap();
        let err = check(&resp).unwrap_err();
        match &err {
            Error::Api { code, description } => {
                assert_eq!(*code, 400);
                assert_eq!(description, "bad request");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("bad request"));
    }

    #[test]
    fn ok_without_result_is_an_error() {
        let resp: ApiResponse<i64> = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(matches!(resp.into_result(), Err(Error::Api { .. })));
    }
}
