//! Dump the gateway's OpenAPI document as JSON.
//!
//! Writes to stdout by default, or to the path given as the first
//! argument:
//!
//!   cargo run --bin export_openapi -- docs/openapi.json

use anyhow::Context;
use utoipa::OpenApi;
use wallet_ledger::gateway::openapi::ApiDoc;

fn main() -> anyhow::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("OpenAPI document failed to serialize")?;

    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path))?;
            eprintln!("OpenAPI document written to {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
