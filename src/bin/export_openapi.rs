//! Export the OpenAPI document as JSON
//!
//! Usage:
//!   cargo run --bin export_openapi > openapi.json
//!   cargo run --bin export_openapi -- --output docs/openapi.json

use anyhow::Context;
use bank_transfer::gateway::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("failed to serialize OpenAPI document")?;

    let mut args = std::env::args().skip(1);
    match (args.next().as_deref(), args.next()) {
        (Some("--output"), Some(path)) => {
            std::fs::write(&path, &json).with_context(|| format!("failed to write {}", path))?;
            eprintln!("✅ OpenAPI document written to: {}", path);
        }
        (None, _) => println!("{}", json),
        _ => anyhow::bail!("usage: export_openapi [--output <path>]"),
    }
    Ok(())
}
