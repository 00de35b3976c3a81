//! Gallery command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use aniwa_client::Client;
use aniwa_core::types::ServiceUrl;

use crate::commands::require_token;
use crate::output;

#[derive(Args, Debug)]
pub struct GalleryArgs {
    /// Output entries as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(service: &ServiceUrl, args: GalleryArgs) -> Result<()> {
    let token = require_token(service).await?;
    let client = Client::new(service.clone());

    let entries = client
        .gallery(&token)
        .await
        .context("Failed to fetch gallery")?;

    if args.json {
        return output::json_pretty(&entries);
    }

    if entries.is_empty() {
        println!("No outputs yet. Run `aniwa convert <FILE>` to create one.");
        return Ok(());
    }

    for entry in entries {
        let kind = match entry.media_type.as_str() {
            "image" => "IMAGE".cyan(),
            "video" => "VIDEO".magenta(),
            other => other.normal(),
        };
        println!(
            "{} {} {}",
            kind,
            entry
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed(),
            entry.media_url
        );
    }

    Ok(())
}
