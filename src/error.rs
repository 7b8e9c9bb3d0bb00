use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0} environment variable must be defined")]
    MissingCredential(&'static str),

    #[error("unable to start http server on port {port}: {source}")]
    Bind {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("unable to start the callback listener thread")]
    Spawn(#[source] std::io::Error),

    #[error("callback listener stopped before an export finished")]
    ListenerStopped,

    #[error("unable to listen for interrupt signal")]
    Signal(#[source] std::io::Error),

    #[error("error sending request for {what}")]
    Http {
        what: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed access token response: {0:?}")]
    MalformedTokenResponse(String),

    #[error("malformed response for {what}: {source}")]
    MalformedResponse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Deezer returned an error for {what} ({kind}): {message}")]
    Api {
        what: String,
        kind: String,
        message: String,
    },

    #[error("export directory {} already exists", .0.display())]
    ExportDirExists(PathBuf),

    #[error("i/o error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write playlist to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("error url-encoding query: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

impl Error {
    /// Wraps a reqwest error, dropping the url since it carries secrets.
    pub(crate) fn http(what: impl Into<String>, source: reqwest::Error) -> Error {
        Error::Http {
            what: what.into(),
            source: source.without_url(),
        }
    }
}
