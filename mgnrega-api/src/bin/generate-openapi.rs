//! OpenAPI document generator
//!
//! Prints the tracker's OpenAPI document as JSON to stdout.
//!
//! Usage:
//!   cargo run -p mgnrega-api --bin generate-openapi > openapi.json

use mgnrega_api::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let doc = ApiDoc::openapi();

    match serde_json::to_string_pretty(&doc) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI document: {}", e);
            std::process::exit(1);
        }
    }
}
