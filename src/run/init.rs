//! Run initialization.
//!
//! Every run-fatal check happens here, before any unit of work is scheduled.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use super::resources::{PipelineResources, TargetSource};
use crate::agents::{register_all, PipelineContext};
use crate::config::{parse_ports, Config};
use crate::error_handling::{ConfigError, InitializationError};
use crate::events::EventBus;
use crate::fingerprint::load_ruleset;
use crate::initialization::{init_client, init_resolver};
use crate::limiter::WorkLimiter;
use crate::session::Session;
use crate::tls::TlsProber;

/// Initializes all resources for a run.
///
/// This function performs the following steps:
/// 1. Validate the output directory and port selection
/// 2. Open the input
/// 3. Load the fingerprint ruleset
/// 4. Create the artifact directories
/// 5. Build the HTTP client, TLS prober and DNS resolver
/// 6. Register every pipeline stage
///
/// # Errors
///
/// Returns an error if any of the steps fails. Nothing has been scanned yet
/// at that point and no report is written.
pub async fn init_pipeline(config: Config) -> Result<PipelineResources> {
    validate_out_dir(&config.out_dir)?;
    let ports = parse_ports(&config.ports)?;
    info!("Scanning {} port(s) per host", ports.len());

    let source = open_input(&config.input).await?;

    let ruleset = load_ruleset(config.fingerprints.as_deref())
        .await
        .context("Failed to initialize fingerprint ruleset")?;

    let session = Arc::new(Session::new(config.out_dir.clone()));
    for dir in [
        session.headers_dir(),
        session.html_dir(),
        session.screenshots_dir(),
    ] {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| ConfigError::OutputDirCreate {
                path: dir.clone(),
                source,
            })?;
    }

    let client = init_client(config.http_timeout(), config.proxy.as_deref())
        .map_err(InitializationError::from)
        .context("Failed to initialize HTTP client")?;
    let prober = TlsProber::new(config.http_timeout())
        .map_err(InitializationError::from)
        .context("Failed to initialize TLS prober")?;
    let resolver = init_resolver();

    let bus = Arc::new(EventBus::new(WorkLimiter::new(config.threads)));
    let ctx = Arc::new(PipelineContext {
        session,
        config: Arc::new(config),
        ports,
        client,
        resolver,
        prober,
        ruleset: Arc::new(ruleset),
        bus,
    });
    register_all(&ctx)
        .await
        .context("Failed to initialize screenshot capturer")?;

    Ok(PipelineResources { ctx, source })
}

/// The output directory must already exist.
fn validate_out_dir(dir: &Path) -> Result<(), ConfigError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::OutputDirNotDirectory(dir.to_path_buf())),
        Err(_) => Err(ConfigError::OutputDirMissing(dir.to_path_buf())),
    }
}

async fn open_input(path: &Path) -> Result<TargetSource, ConfigError> {
    if path.as_os_str() == "-" {
        info!("Reading targets from stdin");
        return Ok(TargetSource::Stdin);
    }
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|source| ConfigError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(TargetSource::File(file))
}
