// Command-line flags
// Every flag is optional; unset flags leave file/env/default values alone

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "staticy")]
#[command(about = "Static file server with optional directory-listing suppression")]
#[command(version)]
pub struct Cli {
    /// Document root [default: ./static]
    #[arg(long)]
    pub docroot: Option<PathBuf>,

    /// Listen to host:port [default: 0.0.0.0:8000]
    #[arg(long)]
    pub listen: Option<String>,

    /// Disable directory indexing unless index.html exists
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub indexing: Option<bool>,

    /// Runtime worker threads [default: CPU cores]
    #[arg(long)]
    pub workers: Option<usize>,

    /// Request log format: default, json, or a $variable pattern
    #[arg(long)]
    pub log_format: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
