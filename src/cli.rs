use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "apifinder",
    about = "Find public APIs from a plain-language description",
    long_about = "Ranks a catalog of public APIs against a natural language description of what you need, \
                  and fires one-off test requests at any endpoint.",
    version
)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(
        long,
        help = "Configuration file (defaults apply when it does not exist)",
        default_value = CONFIG_PATH,
        global = true
    )]
    pub config: PathBuf,

    /// Override the catalog source
    #[arg(
        long,
        help = "Catalog file (.csv, .yaml, .yml or .json); overrides catalog.path",
        global = true
    )]
    pub catalog: Option<PathBuf>,

    /// Enable debug output
    #[arg(
        long,
        help = "Enable debug logging",
        action = ArgAction::SetTrue,
        global = true
    )]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank catalog APIs against a description
    Search {
        /// What the API should do; empty lists the catalog
        #[arg(default_value = "")]
        query: String,

        #[arg(long = "category", help = "Only APIs in this category (repeatable)")]
        categories: Vec<String>,

        #[arg(long = "auth", help = "Only APIs with this auth type (repeatable)")]
        auth_types: Vec<String>,

        #[arg(long, help = "Only APIs served over HTTPS", action = ArgAction::SetTrue)]
        https_only: bool,

        #[arg(long, help = "Only APIs with CORS enabled", action = ArgAction::SetTrue)]
        cors_yes: bool,

        #[arg(short, long, help = "Maximum number of results (defaults to search.default_limit)")]
        limit: Option<usize>,

        #[arg(long, help = "Print results as JSON", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Send one request to an endpoint and show the response
    Test {
        url: String,

        #[arg(short, long, default_value = "GET", help = "GET, POST, PUT or DELETE")]
        method: String,

        #[arg(long, default_value = "", help = "Headers as a JSON object")]
        headers: String,

        #[arg(long, default_value = "", help = "JSON body (ignored for GET)")]
        body: String,

        #[arg(long, help = "Print the outcome as JSON", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Show catalog statistics
    Stats {
        #[arg(long, help = "Print statistics as JSON", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Run as a gRPC server
    Serve {
        #[arg(long, help = "Listen address; overrides server.address")]
        address: Option<String>,
    },
}

pub fn parse_args() -> Args {
    Args::parse()
}
