use std::path::PathBuf;

use clap::Parser;

/// Terminal client for a remote video download queue.
#[derive(Parser, Debug, Default)]
#[command(name = "vidqueue")]
#[command(version)]
#[command(about = "Queue video links on a download processor and collect the results", long_about = None)]
pub struct Cli {
    /// RON configuration file (defaults to ./vidqueue.ron when present)
    #[arg(long, value_name = "FILE")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Processor API base url
    #[arg(long, value_name = "URL")]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub api: Option<String>,

    /// Folder to save completed videos into
    #[arg(long, value_name = "DIR")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Status polling interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_ms: Option<u64>,

    /// Where the save flow puts files when no folder is selected
    #[arg(long, value_name = "DIR")]
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub fallback_dir: Option<PathBuf>,
}
