use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;

use crate::error::{Error, Result};
use crate::playlist::Playlist;

/// Where one run's playlists ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Exporter {
    root: PathBuf,
}

impl Exporter {
    pub fn new(root: impl Into<PathBuf>) -> Exporter {
        Exporter { root: root.into() }
    }

    pub fn save_all(&self, playlists: &[Playlist]) -> Result<ExportReport> {
        self.save_all_at(playlists, Utc::now())
    }

    /// Creates `playlists_<timestamp>` under the root and writes playlist `i`
    /// to `<i>.json`. Refuses to reuse a directory that already exists.
    pub fn save_all_at(&self, playlists: &[Playlist], now: DateTime<Utc>) -> Result<ExportReport> {
        let directory = self.root.join(directory_name(now));

        fs::create_dir(&directory).map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => Error::ExportDirExists(directory.clone()),
            _ => Error::Io {
                path: directory.clone(),
                source,
            },
        })?;

        let mut files = Vec::with_capacity(playlists.len());
        for (index, playlist) in playlists.iter().enumerate() {
            let path = directory.join(format!("{index}.json"));
            write_playlist(&path, playlist)?;
            files.push(path);
        }

        info!(
            "saved {} playlists to {}",
            files.len(),
            directory.display()
        );

        Ok(ExportReport { directory, files })
    }
}

pub fn directory_name(now: DateTime<Utc>) -> String {
    format!(
        "playlists_{}.{:06}",
        now.timestamp(),
        now.timestamp_subsec_micros()
    )
}

fn write_playlist(path: &Path, playlist: &Playlist) -> Result<()> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer(&mut writer, playlist).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)
}
