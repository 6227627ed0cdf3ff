//! cdnbridge CLI: upload files to CDN storage and mint signed URLs.
//!
//! Set BUNNY_STORAGE_ZONE and BUNNY_CDN_HOST, plus BUNNY_API_KEY for storage
//! calls and BUNNY_TOKEN_KEY for signed URLs. A `.env` file is read if present.
//! Output is JSON on stdout; logs go to stderr.

use anyhow::Context;
use cdnbridge_cli::{init_tracing, parse_filenames, parse_reference};
use cdnbridge_core::{Config, FileReference};
use cdnbridge_storage::create_storage;
use cdnbridge_upload::{CleanupFilenamesNode, UploadOrchestrator, UploadRequest};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cdnbridge", about = "CDN storage upload and URL signing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a reference, upload it and print a signed URL
    Upload {
        /// File path, or a JSON reference such as '[true, ["out.mp4"]]'
        reference: String,
        /// Remote directory under the CDN namespace
        #[arg(long, default_value = "")]
        cdn_dir: String,
        /// Remote file name without extension
        #[arg(long)]
        label: Option<String>,
        /// Pick this item from a batch instead of the preferred one
        #[arg(long)]
        index: Option<usize>,
    },
    /// Print a signed URL for an uploaded path (no network)
    Sign {
        /// Path relative to the CDN namespace
        path: String,
    },
    /// List a remote directory
    List {
        #[arg(default_value = "")]
        dir: String,
    },
    /// Download a remote file
    Download {
        remote: String,
        /// Local target; defaults to the remote file name in the working directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a remote file
    Delete { remote: String },
    /// Delete local batch files, e.g. '[true, ["a.mp4", "a-audio.mp4"]]'
    Cleanup { filenames: String },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Cleanup { filenames } = &cli.command {
        let summary = CleanupFilenamesNode::new()
            .run(&parse_filenames(filenames)?)
            .await;
        return print_json(&serde_json::json!({ "summary": summary }));
    }

    let config = Config::from_env()
        .context("Failed to load storage config. Set BUNNY_STORAGE_ZONE and BUNNY_CDN_HOST")?;
    let storage = create_storage(&config).context("Failed to create storage connector")?;

    match cli.command {
        Commands::Upload {
            reference,
            cdn_dir,
            label,
            index,
        } => {
            let input = parse_reference(&reference);
            let mut request = UploadRequest::new(FileReference::from_json(&input), cdn_dir);
            request.process_label = label;
            request.index = index;

            let output = UploadOrchestrator::new(storage)
                .run(request)
                .await
                .context("Upload failed")?;
            print_json(&serde_json::json!({
                "url": output.url,
                "filenames": input,
            }))?;
        }
        Commands::Sign { path } => {
            let url = storage.sign_url(&path)?;
            print_json(&serde_json::json!({ "url": url }))?;
        }
        Commands::List { dir } => {
            let entries = storage.list(&dir).await?;
            print_json(&entries)?;
        }
        Commands::Download { remote, out } => {
            let path = storage.download(&remote, out.as_deref()).await?;
            print_json(&serde_json::json!({ "path": path }))?;
        }
        Commands::Delete { remote } => {
            storage.delete(&remote).await?;
            print_json(
                &serde_json::json!({ "success": true, "message": format!("{} deleted", remote) }),
            )?;
        }
        Commands::Cleanup { .. } => {}
    }

    Ok(())
}
