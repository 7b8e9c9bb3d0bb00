use anyhow::{Context, Result};
use deezer_export::Config;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("Unable to load Deezer app credentials")?;

    match deezer_export::run(config)
        .await
        .context("Playlist export failed")?
    {
        Some(report) => info!(
            "Exported {} playlists to {}",
            report.files.len(),
            report.directory.display()
        ),
        None => info!("Stopped before any playlist was exported"),
    }

    Ok(())
}
