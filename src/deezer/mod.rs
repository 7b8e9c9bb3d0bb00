use log::{info, warn};
use model::{Page, PlaylistDetail, PlaylistId, PlaylistSummary};

use crate::auth::AccessToken;
use crate::config::Endpoints;
use crate::error::Result;
use crate::playlist::Playlist;
use crate::request;

pub mod model;

/// Authenticated view of the Deezer API for one run.
#[derive(Debug)]
pub struct Deezer {
    client: reqwest::Client,
    endpoints: Endpoints,
    access_token: AccessToken,
}

impl Deezer {
    pub fn new(client: reqwest::Client, endpoints: Endpoints, access_token: AccessToken) -> Deezer {
        Deezer {
            client,
            endpoints,
            access_token,
        }
    }

    // Deezer accepts the token appended to the path with `&`, and that is the
    // shape registered apps have always used.
    fn url(&self, path: &str) -> String {
        self.endpoints.api(&format!(
            "{}&access_token={}",
            path,
            self.access_token.secret()
        ))
    }

    /// Ids of the user's playlists, in the order the API lists them.
    pub async fn list_playlists(&self) -> Result<Vec<PlaylistId>> {
        let page: Page<PlaylistSummary> =
            request::get_json(&self.client, &self.url("/user/me/playlists"), "playlist listing")
                .await?;

        if page.next.is_some() {
            warn!("more playlists are available; only the first page is exported");
        }

        Ok(page.data.into_iter().map(|summary| summary.id).collect())
    }

    pub async fn get_playlist(&self, id: PlaylistId) -> Result<Playlist> {
        let detail: PlaylistDetail = request::get_json(
            &self.client,
            &self.url(&format!("/playlist/{id}")),
            &format!("playlist {id}"),
        )
        .await?;

        if detail.tracks.next.is_some() {
            warn!(
                "playlist {id} ({}) has more tracks; only the first page is exported",
                detail.title
            );
        }

        Ok(detail.into())
    }

    /// Lists the playlists and fetches each one in turn. Any failure aborts
    /// the whole fetch.
    pub async fn fetch_all(&self) -> Result<Vec<Playlist>> {
        let ids = self.list_playlists().await?;
        info!("found {} playlists", ids.len());

        let mut playlists = Vec::with_capacity(ids.len());
        for id in ids {
            let playlist = self.get_playlist(id).await?;
            info!("fetched {:?} ({} songs)", playlist.name, playlist.songs.len());
            playlists.push(playlist);
        }

        Ok(playlists)
    }
}
