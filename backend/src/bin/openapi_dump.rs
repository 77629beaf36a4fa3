//! Print the OpenAPI document as pretty JSON, or write it to a file.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use referrals::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Render the referral API's OpenAPI document",
    version
)]
struct CliArgs {
    /// Write the document here instead of stdout.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
    /// Emit compact JSON.
    #[arg(long)]
    compact: bool,
}

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let doc = ApiDoc::openapi();
    let json = if args.compact {
        doc.to_json()
    } else {
        doc.to_pretty_json()
    }
    .map_err(io::Error::other)?;

    match args.output {
        Some(path) => std::fs::write(&path, format!("{json}\n")),
        None => writeln!(io::stdout().lock(), "{json}"),
    }
}
