use std::path::PathBuf;

use crate::auth::Credentials;
use crate::error::Result;

pub const DEFAULT_PORT: u16 = 7766;
pub const DEEZER_CONNECT_URL: &str = "https://connect.deezer.com";
pub const DEEZER_API_URL: &str = "https://api.deezer.com";

/// Base urls of the two Deezer hosts, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    connect: String,
    api: String,
}

impl Endpoints {
    pub fn new(connect: &str, api: &str) -> Endpoints {
        Endpoints {
            connect: connect.trim_end_matches('/').to_string(),
            api: api.trim_end_matches('/').to_string(),
        }
    }

    pub fn connect(&self, path: &str) -> String {
        format!("{}{}", self.connect, path)
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}{}", self.api, path)
    }
}

impl Default for Endpoints {
    fn default() -> Endpoints {
        Endpoints::new(DEEZER_CONNECT_URL, DEEZER_API_URL)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub port: u16,
    pub endpoints: Endpoints,
    pub output_root: PathBuf,
}

impl Config {
    pub fn new(credentials: Credentials) -> Config {
        Config {
            credentials,
            port: DEFAULT_PORT,
            endpoints: Endpoints::default(),
            output_root: PathBuf::from("."),
        }
    }

    /// Loads an optional `.env` file, then reads `APP_ID` and `APP_SECRET`.
    pub fn from_env() -> Result<Config> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("ignoring unreadable .env file: {e}");
            }
        }
        Ok(Config::new(Credentials::from_env()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_strip_trailing_slash() {
        let endpoints = Endpoints::new("http://127.0.0.1:9000/", "http://127.0.0.1:9001");
        assert_eq!(
            endpoints.connect("/oauth/auth.php"),
            "http://127.0.0.1:9000/oauth/auth.php"
        );
        assert_eq!(
            endpoints.api("/playlist/1"),
            "http://127.0.0.1:9001/playlist/1"
        );
    }

    #[test]
    fn config_defaults_point_at_deezer() {
        let config = Config::new(Credentials::new("id", "secret"));
        assert_eq!(config.port, 7766);
        assert_eq!(
            config.endpoints.api("/user/me/playlists"),
            "https://api.deezer.com/user/me/playlists"
        );
        assert_eq!(config.output_root, PathBuf::from("."));
    }
}
