mod cli;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use chromaflow::config::Config;
use chromaflow::download::DownloadOutcome;
use chromaflow::job::resolve;
use chromaflow::upload::FileSource;
use chromaflow::workflow::{
    GenerateOutcome, IngestOutcome, Orchestrator, Phase, StatusSink,
};

use cli::{Cli, Commands, RunArgs, UploadArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Upload(args) => upload_only(config, args).await?,
        Commands::Run(args) => run_workflow(config, args).await?,
    }

    Ok(())
}

/// Renders status changes for the terminal; the session phase carries
/// both the display text and the busy flag.
struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn phase_changed(&self, phase: &Phase) {
        info!(busy = phase.is_busy(), "{}", phase.display());
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}

async fn upload_only(config: Config, args: UploadArgs) -> Result<(), AnyError> {
    let orchestrator = Orchestrator::new(config, Arc::new(ConsoleSink))?;
    let file = read_file_source(&args.file).await?;

    match orchestrator.ingest(file).await {
        IngestOutcome::Ready(asset) => {
            println!("{}", asset.public_url);
            Ok(())
        }
        IngestOutcome::NotAnImage => Err("not an image file".into()),
        IngestOutcome::Failed(error) => Err(error.into()),
        IngestOutcome::Superseded => Ok(()),
    }
}

async fn run_workflow(mut config: Config, args: RunArgs) -> Result<(), AnyError> {
    if let Some(dir) = args.out_dir {
        config.download.target_dir = dir;
    }

    let orchestrator = Orchestrator::new(config, Arc::new(ConsoleSink))?;
    let file = read_file_source(&args.file).await?;

    match orchestrator.ingest(file).await {
        IngestOutcome::Ready(asset) => {
            info!(url = asset.public_url, "Asset ready");
        }
        IngestOutcome::NotAnImage => return Err("not an image file".into()),
        IngestOutcome::Failed(error) => return Err(error.into()),
        IngestOutcome::Superseded => return Ok(()),
    }

    match orchestrator.generate().await {
        GenerateOutcome::Complete { result_url } => {
            info!(result_url, kind = ?resolve::classify(&result_url), "Generation complete");
        }
        GenerateOutcome::Failed(error) => return Err(error.into()),
        GenerateOutcome::NoAsset | GenerateOutcome::Busy | GenerateOutcome::Superseded => {
            return Ok(());
        }
    }

    match orchestrator.download().await? {
        Some(DownloadOutcome::Saved { path, strategy, size }) => {
            info!(path = %path.display(), size, strategy = ?strategy, "Artifact saved");
        }
        Some(DownloadOutcome::ManualSave { url }) => {
            warn!(url, "Automatic download failed; save the displayed media manually");
        }
        None => {}
    }

    Ok(())
}

async fn read_file_source(path: &Path) -> Result<FileSource, AnyError> {
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or("file path has no usable name")?
        .to_string();
    let content_type = content_type_for(&name);

    Ok(FileSource {
        name,
        content_type,
        bytes: bytes.into(),
    })
}

/// MIME type from the file extension; unknown extensions fall through to
/// octet-stream and are rejected by the image validation.
fn content_type_for(file_name: &str) -> String {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG.to_string(),
        Some("png") => mime::IMAGE_PNG.to_string(),
        Some("gif") => mime::IMAGE_GIF.to_string(),
        Some("svg") => mime::IMAGE_SVG.to_string(),
        Some("webp") => "image/webp".to_string(),
        _ => mime::APPLICATION_OCTET_STREAM.to_string(),
    }
}
