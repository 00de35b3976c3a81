//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{convert, gallery, login, register};

/// CLI for the aniwa anime-style conversion service.
#[derive(Parser, Debug)]
#[command(name = "aniwa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Conversion service base URL
    #[arg(
        long,
        global = true,
        env = "ANIWA_SERVICE",
        default_value = "http://localhost:8000"
    )]
    pub service: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and persist the session token
    Login(login::LoginArgs),
    /// Create an account
    Register(register::RegisterArgs),
    /// Drop the current session
    Logout,
    /// Show session status
    Status,
    /// Convert an image or video to anime style
    Convert(convert::ConvertArgs),
    /// List past outputs
    Gallery(gallery::GalleryArgs),
}
