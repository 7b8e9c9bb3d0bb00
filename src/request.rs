use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Error envelope Deezer returns, with a 200 status, in place of a resource.
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

pub(crate) async fn send_for_text(request: reqwest::RequestBuilder, what: &str) -> Result<String> {
    request
        .send()
        .await
        .map_err(|e| Error::http(what, e))?
        .text()
        .await
        .map_err(|e| Error::http(what, e))
}

pub(crate) async fn get_json<T>(client: &reqwest::Client, url: &str, what: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = send_for_text(client.get(url), what).await?;
    parse_json(&body, what)
}

pub(crate) fn parse_json<T>(body: &str, what: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let malformed = |source| Error::MalformedResponse {
        what: what.to_string(),
        source,
    };

    let mut value: serde_json::Value = serde_json::from_str(body).map_err(malformed)?;

    if let Some(error) = value.get_mut("error").map(serde_json::Value::take) {
        let error: ApiError = serde_json::from_value(error).map_err(malformed)?;
        return Err(Error::Api {
            what: what.to_string(),
            kind: error.kind,
            message: error.message,
        });
    }

    serde_json::from_value(value).map_err(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn parses_plain_resource() {
        let named: Named = parse_json(r#"{"name":"x","extra":1}"#, "thing").unwrap();
        assert_eq!(named.name, "x");
    }

    #[test]
    fn surfaces_deezer_error_envelope() {
        let body = r#"{"error":{"type":"OAuthException","message":"Invalid OAuth access token.","code":300}}"#;
        let err = parse_json::<Named>(body, "playlist listing").unwrap_err();
        match err {
            Error::Api { what, kind, message } => {
                assert_eq!(what, "playlist listing");
                assert_eq!(kind, "OAuthException");
                assert_eq!(message, "Invalid OAuth access token.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = parse_json::<Named>(r#"{"title":"x"}"#, "thing").unwrap_err();
        assert!(err.to_string().contains("missing field `name`"));
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_json::<Named>("<html>", "thing").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }
}
