use std::{env, fmt};

use log::{debug, info};
use serde::Serialize;
use url::Url;

use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::request;

const AUTHORIZATION_PATH: &str = "/oauth/auth.php";
const ACCESS_TOKEN_PATH: &str = "/oauth/access_token.php";
const PERMISSIONS: &str = "basic_access,email";

#[derive(Clone)]
pub struct Credentials {
    app_id: String,
    app_secret: String,
}

impl Credentials {
    pub fn new(app_id: &str, app_secret: &str) -> Credentials {
        Credentials {
            app_id: String::from(app_id),
            app_secret: String::from(app_secret),
        }
    }

    pub fn from_env() -> Result<Credentials> {
        Credentials::from_lookup(|name| env::var(name).ok())
    }

    /// Builds credentials from any variable source. Missing and empty values
    /// are both rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| match lookup(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::MissingCredential(name)),
        };

        let app_id = require("APP_ID")?;
        let app_secret = require("APP_SECRET")?;

        Ok(Credentials::new(&app_id, &app_secret))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: &str) -> AccessToken {
        AccessToken(String::from(token))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Serialize)]
struct AuthCodeRequest<'a> {
    app_id: &'a str,
    redirect_uri: String,
    perms: &'a str,
}

pub fn redirect_uri(port: u16) -> String {
    format!("http://127.0.0.1:{port}/authfinish")
}

/// The consent page the user is sent to; Deezer redirects back to the
/// callback listener on `port` once the app is authorized.
pub fn authorize_url(endpoints: &Endpoints, creds: &Credentials, port: u16) -> Result<Url> {
    let params = serde_urlencoded::to_string(AuthCodeRequest {
        app_id: &creds.app_id,
        redirect_uri: redirect_uri(port),
        perms: PERMISSIONS,
    })?;

    Ok(Url::parse(&format!(
        "{}?{}",
        endpoints.connect(AUTHORIZATION_PATH),
        params
    ))?)
}

pub async fn exchange_code(
    client: &reqwest::Client,
    endpoints: &Endpoints,
    creds: &Credentials,
    code: &str,
) -> Result<AccessToken> {
    info!("Attempting to obtain token...");

    let request = client.get(endpoints.connect(ACCESS_TOKEN_PATH)).query(&[
        ("app_id", creds.app_id.as_str()),
        ("secret", creds.app_secret.as_str()),
        ("code", code),
    ]);
    let body = request::send_for_text(request, "access token").await?;

    parse_access_token(&body)
}

/// Parses `access_token=<token>&expires=<n>`. The token is everything after
/// the first `=` up to the next `&`.
pub fn parse_access_token(body: &str) -> Result<AccessToken> {
    let malformed = || Error::MalformedTokenResponse(body.to_string());

    let mut pairs = body.trim().split('&');
    let token = match pairs.next().and_then(|pair| pair.split_once('=')) {
        Some(("access_token", token)) if !token.is_empty() => token,
        _ => return Err(malformed()),
    };

    if let Some(expires) = pairs.find_map(|pair| pair.strip_prefix("expires=")) {
        debug!("access token expires in {expires}s");
    }

    Ok(AccessToken::new(token))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn credentials_read_both_values() {
        let creds =
            Credentials::from_lookup(lookup(&[("APP_ID", "123"), ("APP_SECRET", "s3cret")]))
                .unwrap();
        assert_eq!(creds.app_id(), "123");
        assert_eq!(creds.app_secret, "s3cret");
    }

    #[test]
    fn missing_app_id_is_rejected() {
        let err = Credentials::from_lookup(lookup(&[("APP_SECRET", "s3cret")])).unwrap_err();
        assert!(matches!(err, Error::MissingCredential("APP_ID")));
    }

    #[test]
    fn empty_app_secret_is_rejected() {
        let err = Credentials::from_lookup(lookup(&[("APP_ID", "123"), ("APP_SECRET", "")]))
            .unwrap_err();
        assert!(matches!(err, Error::MissingCredential("APP_SECRET")));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::new("123", "s3cret");
        assert!(!format!("{creds:?}").contains("s3cret"));
        assert!(!format!("{:?}", AccessToken::new("tok")).contains("tok"));
    }

    #[test]
    fn authorize_url_carries_app_redirect_and_perms() {
        let url = authorize_url(
            &Endpoints::default(),
            &Credentials::new("123", "s3cret"),
            7766,
        )
        .unwrap();

        assert_eq!(url.host_str(), Some("connect.deezer.com"));
        assert_eq!(url.path(), "/oauth/auth.php");

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("app_id".to_string(), "123".to_string()),
                (
                    "redirect_uri".to_string(),
                    "http://127.0.0.1:7766/authfinish".to_string()
                ),
                ("perms".to_string(), "basic_access,email".to_string()),
            ]
        );
        assert!(!url.as_str().contains("s3cret"));
    }

    #[test]
    fn parses_token_from_well_formed_body() {
        let token = parse_access_token("access_token=frAbC123xyz&expires=3600").unwrap();
        assert_eq!(token.secret(), "frAbC123xyz");
    }

    #[test]
    fn parses_token_without_expiry() {
        let token = parse_access_token("access_token=abc\n").unwrap();
        assert_eq!(token.secret(), "abc");
    }

    #[test]
    fn token_may_contain_equals_sign() {
        let token = parse_access_token("access_token=a=b&expires=0").unwrap();
        assert_eq!(token.secret(), "a=b");
    }

    #[test]
    fn rejects_wrong_code_body() {
        let err = parse_access_token("wrong code").unwrap_err();
        assert!(matches!(err, Error::MalformedTokenResponse(body) if body == "wrong code"));
    }

    #[test]
    fn rejects_empty_token() {
        assert!(parse_access_token("access_token=&expires=3600").is_err());
        assert!(parse_access_token("").is_err());
    }
}
