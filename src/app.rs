use std::thread;

use log::{info, warn};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::auth::{self, Credentials};
use crate::callback::{CallbackServer, CodeHandler};
use crate::config::{Config, Endpoints};
use crate::deezer::Deezer;
use crate::error::{Error, Result};
use crate::export::{ExportReport, Exporter};

/// Everything that happens once an authorization code is in hand: token
/// exchange, playlist fetch, export.
pub struct ExportPipeline {
    client: reqwest::Client,
    endpoints: Endpoints,
    credentials: Credentials,
    exporter: Exporter,
    runtime: Handle,
}

impl ExportPipeline {
    pub fn new(config: &Config, runtime: Handle) -> ExportPipeline {
        ExportPipeline {
            client: reqwest::Client::new(),
            endpoints: config.endpoints.clone(),
            credentials: config.credentials.clone(),
            exporter: Exporter::new(&config.output_root),
            runtime,
        }
    }

    pub async fn export(&self, code: &str) -> Result<ExportReport> {
        let token =
            auth::exchange_code(&self.client, &self.endpoints, &self.credentials, code).await?;

        let playlists = Deezer::new(self.client.clone(), self.endpoints.clone(), token)
            .fetch_all()
            .await?;

        self.exporter.save_all(&playlists)
    }
}

impl CodeHandler for ExportPipeline {
    type Output = ExportReport;

    fn handle_authorization_code(&self, code: &str) -> Result<ExportReport> {
        self.runtime.block_on(self.export(code))
    }
}

/// Starts the callback listener, sends the user to the consent page and waits
/// for the export to finish. Returns `None` if interrupted first.
pub async fn run(config: Config) -> Result<Option<ExportReport>> {
    let server = CallbackServer::bind(config.port)?;
    let prompt_url = auth::authorize_url(&config.endpoints, &config.credentials, config.port)?;
    let pipeline = ExportPipeline::new(&config, Handle::current());

    let (done_tx, done_rx) = oneshot::channel();
    thread::Builder::new()
        .name("callback-listener".to_string())
        .spawn(move || server.serve(pipeline, done_tx))
        .map_err(Error::Spawn)?;

    if let Err(e) = webbrowser::open(prompt_url.as_str()) {
        warn!("Error opening a browser: {e}");
    }
    info!("Authorize the app at {prompt_url}");

    tokio::select! {
        outcome = done_rx => match outcome {
            Ok(report) => report.map(Some),
            Err(_) => Err(Error::ListenerStopped),
        },
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(Error::Signal)?;
            warn!("Interrupted while waiting for the Deezer redirect");
            Ok(None)
        }
    }
}
