//! Convert command implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures_util::StreamExt;
use tracing::warn;

use aniwa_client::{Client, ProgressStream};
use aniwa_core::types::ServiceUrl;

use crate::commands::require_token;
use crate::output;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Image or video file to convert
    pub file: PathBuf,

    /// Save the result to your gallery
    #[arg(long)]
    pub save: bool,
}

pub async fn run(service: &ServiceUrl, args: ConvertArgs) -> Result<()> {
    let token = require_token(service).await?;

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("File name is not valid UTF-8")?;
    let content_type = content_type_for(&args.file);

    let client = Client::new(service.clone());

    eprintln!("{}", "Uploading...".dimmed());

    // Progress arrives on a separate channel while the upload is processed.
    // The conversion still completes if the channel cannot be opened.
    let reporter = match client.progress(&token).await {
        Ok(stream) => Some(tokio::spawn(report_progress(stream))),
        Err(e) => {
            warn!(error = %e, "progress channel unavailable");
            None
        }
    };

    let result = client
        .generate(&token, file_name, content_type, bytes)
        .await
        .context("Conversion failed")?;

    if let Some(reporter) = reporter {
        let abort = reporter.abort_handle();
        if tokio::time::timeout(Duration::from_secs(5), reporter)
            .await
            .is_err()
        {
            abort.abort();
        }
    }

    output::success("Conversion complete");
    println!();
    output::field("Result", &result.media_url);
    if let Some(kind) = &result.media_type {
        output::field("Type", kind);
    }

    if args.save {
        client
            .save_media(&token, &result.media_url)
            .await
            .context("Failed to save to gallery")?;
        output::success("Saved to gallery");
    }

    Ok(())
}

async fn report_progress(mut stream: ProgressStream) {
    while let Some(event) = stream.next().await {
        match event {
            Ok(event) => {
                eprint!("\r{}", format!("{:>3}%", event.percent).dimmed());
                if event.is_done() {
                    eprintln!();
                    break;
                }
            }
            Err(e) => {
                eprintln!();
                warn!(error = %e, "progress channel dropped");
                break;
            }
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type_for(Path::new("a.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(
            content_type_for(Path::new("unknown.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("no_extension")),
            "application/octet-stream"
        );
    }
}
