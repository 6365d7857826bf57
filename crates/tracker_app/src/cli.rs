use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// jobtrack - track job postings and export them to CSV
#[derive(Parser, Debug)]
#[command(name = "jobtrack")]
#[command(version)]
#[command(about = "Track job postings and export them to CSV", long_about = None)]
pub struct Cli {
    /// RON configuration file (default: ./jobtrack.ron when present)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Storage document, overrides the configuration
    #[arg(long = "storage")]
    pub storage: Option<PathBuf>,

    /// Directory the export is written to, overrides the configuration
    #[arg(long = "export-dir")]
    pub export_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Track the job shown on a page
    Track {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Report whether the job on a page is already tracked
    Status {
        #[command(flatten)]
        page: PageArgs,
        /// Also print review search links for the page's company
        #[arg(long = "reviews")]
        reviews: bool,
    },
    /// List tracked jobs, newest first
    List,
    /// Write all tracked jobs to CSV and clear the store
    Export,
    /// Print review search links for a company
    Reviews {
        /// Company name as shown on the posting
        company: String,
        /// Restrict to one platform (jobstreet, indeed, glassdoor, gmb)
        #[arg(short = 'p', long = "platform")]
        platform: Option<String>,
    },
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct PageArgs {
    /// Page URL to fetch, or a saved HTML file
    pub source: String,

    /// Address of a saved page; defaults to the fetched URL
    #[arg(long = "url")]
    pub url: Option<String>,
}
