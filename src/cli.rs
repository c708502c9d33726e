use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chromaflow")]
#[command(about = "Chroma Studio image-effects workflow CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload an image and print its public URL
    Upload(UploadArgs),
    /// Upload an image, run the generation job, and download the result
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Path to the image file
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Path to the image file
    pub file: PathBuf,

    /// Directory to save the generated artifact into
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}
