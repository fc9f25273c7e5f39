//! Print the OpenAPI document as JSON.

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use todolist::ApiDoc;
use utoipa::OpenApi;

/// Dump the service's OpenAPI document to stdout.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Print the OpenAPI document as JSON")]
struct Cli {
    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn render(doc: &utoipa::openapi::OpenApi, pretty: bool) -> Result<String> {
    let json = if pretty {
        doc.to_pretty_json()
    } else {
        doc.to_json()
    };
    json.wrap_err("failed to serialise OpenAPI document")
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    println!("{}", render(&ApiDoc::openapi(), cli.pretty)?);
    Ok(())
}
