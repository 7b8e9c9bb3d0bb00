//! Exports a Deezer user's playlists to JSON files, one file per playlist.

pub mod app;
pub mod auth;
pub mod callback;
pub mod config;
pub mod deezer;
pub mod error;
pub mod export;
pub mod playlist;
mod request;

pub use app::{run, ExportPipeline};
pub use auth::{AccessToken, Credentials};
pub use config::{Config, Endpoints, DEFAULT_PORT};
pub use error::{Error, Result};
pub use export::{ExportReport, Exporter};
pub use playlist::{Playlist, Song};
