use serde::Deserialize;
use wasm_bindgen::prelude::*;

use stepscout_core::matching::{match_candidates, match_candidates_with_keyword};
use stepscout_core::step_catalog::{extract_catalog_from_files, SourceFile};

#[derive(Deserialize)]
struct CatalogRequest {
    files: Vec<SourceFile>,
}

#[derive(Deserialize)]
struct CompletionRequest {
    files: Vec<SourceFile>,
    query: String,
    #[serde(default)]
    keyword: Option<String>,
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Builds a step catalog from `{ "files": [{ "path", "text" }] }` JSON and
/// returns it as JSON (`markers`, `stats`). Malformed input yields an
/// `{ "error": ... }` value, never a panic.
#[wasm_bindgen]
pub fn extract_step_catalog(request_json: &str) -> String {
    let request: CatalogRequest = match serde_json::from_str(request_json) {
        Ok(v) => v,
        Err(e) => return error_json(&e.to_string()),
    };
    let catalog = extract_catalog_from_files(&request.files);
    serde_json::to_string(&catalog).unwrap_or_else(|e| error_json(&e.to_string()))
}

/// Completion over in-memory files: `{ "files": [...], "query": "...",
/// "keyword": "When" }` in (`keyword` optional), `{ "candidates":
/// [{ "label", "remainder" }] }` out.
#[wasm_bindgen]
pub fn complete_steps(request_json: &str) -> String {
    let request: CompletionRequest = match serde_json::from_str(request_json) {
        Ok(v) => v,
        Err(e) => return error_json(&e.to_string()),
    };
    let catalog = extract_catalog_from_files(&request.files);
    let candidates = match request.keyword {
        Some(keyword) => match_candidates_with_keyword(&catalog, &request.query, &keyword),
        None => match_candidates(&catalog, &request.query),
    };
    serde_json::to_string(&serde_json::json!({ "candidates": candidates }))
        .unwrap_or_else(|e| error_json(&e.to_string()))
}
