mod config;
mod emotion;
mod face;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use config::Config;
use face::{DetectOptions, FaceClient};

/// Demo portrait analyzed when no image URL is given.
const DEFAULT_IMAGE_URL: &str =
    "https://www.biography.com/.image/t_share/MTQ1MzAyNzYzOTgxNTE0NTEz/john-f-kennedy---mini-biography.jpg";

/// Headless CLI for cloud face detection using the Azure Face API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL of the image to analyze
    #[arg(default_value = DEFAULT_IMAGE_URL)]
    image_url: String,

    /// Request face landmark coordinates as well
    #[arg(long)]
    landmarks: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = Config::from_env().context("Face service configuration is incomplete")?;
    let client = FaceClient::new(&config)?;

    let options = DetectOptions {
        return_face_landmarks: args.landmarks,
        ..DetectOptions::default()
    };

    info!("Submitting {} for detection", args.image_url);
    let faces = client
        .detect_with_url(&args.image_url, &options)
        .await
        .context("Detection call failed")?;

    let name = report::image_name(&args.image_url);
    print!("{}", report::render(&name, &faces));

    Ok(())
}
