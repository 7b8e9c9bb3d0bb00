use std::fmt;

use serde::Deserialize;

use crate::playlist::{Playlist, Song};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(pub u64);

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of a Deezer list. Only the first page is ever read; `next` is
/// kept so callers can tell when something was left behind.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistSummary {
    pub id: PlaylistId,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistDetail {
    pub title: String,
    pub tracks: Page<TrackItem>,
}

#[derive(Debug, Deserialize)]
pub struct TrackItem {
    pub title: String,
    pub artist: ArtistRef,
    pub album: AlbumRef,
}

#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AlbumRef {
    pub title: String,
}

impl From<TrackItem> for Song {
    fn from(track: TrackItem) -> Song {
        Song {
            title: track.title,
            artist: track.artist.name,
            album: track.album.title,
        }
    }
}

impl From<PlaylistDetail> for Playlist {
    fn from(detail: PlaylistDetail) -> Playlist {
        Playlist {
            name: detail.title,
            songs: detail.tracks.data.into_iter().map(Song::from).collect(),
        }
    }
}
