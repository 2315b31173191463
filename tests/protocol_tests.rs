//! Worker protocol round-trips.

use once_cell::sync::Lazy;
use serde_json::{Value, json};
use stc::handle_message;

static CLEAN_SOURCE: Lazy<String> = Lazy::new(|| {
    "PROGRAM P VAR x : INT := 0; END_VAR BEGIN x := x + 1; END END_PROGRAM".to_string()
});

fn respond(request: Value) -> Value {
    let response = handle_message(&request.to_string());
    serde_json::from_str(&response).expect("worker responses are valid JSON")
}

#[test]
fn test_compile_round_trip() {
    let response = respond(json!({
        "type": "compile",
        "files": [{ "fileName": "main.st", "content": CLEAN_SOURCE.as_str() }]
    }));

    assert_eq!(response["type"], "compile-result");
    let result = &response["result"];
    assert_eq!(result["success"], true);
    assert_eq!(result["fileCount"], 1);
    assert_eq!(result["diagnostics"], json!([]));
    assert_eq!(result["sourceCode"], *CLEAN_SOURCE);
    assert!(result["processingTimeMs"].is_u64());
    assert_eq!(result["ast"]["programs"][0]["name"], "P");
}

#[test]
fn test_compile_positions_are_one_based() {
    let response = respond(json!({
        "type": "compile",
        "files": [{
            "fileName": "dup.st",
            "content": "PROGRAM A BEGIN END END_PROGRAM\nPROGRAM A BEGIN END END_PROGRAM"
        }]
    }));

    let result = &response["result"];
    assert_eq!(result["success"], false);
    let diagnostic = &result["diagnostics"][0];
    assert_eq!(diagnostic["fileName"], "dup.st");
    assert_eq!(diagnostic["message"], "Duplicate name: A");
    // The second A is on line 2 (1-based), column 9 (1-based)
    assert_eq!(diagnostic["range"]["start"]["line"], 2);
    assert_eq!(diagnostic["range"]["start"]["column"], 9);
}

#[test]
fn test_validate_round_trip_is_zero_based() {
    let response = respond(json!({
        "type": "validate",
        "uri": "file:///proj/main.st",
        "text": "PROGRAM A BEGIN END END_PROGRAM\nPROGRAM A BEGIN END END_PROGRAM"
    }));

    assert_eq!(response["uri"], "file:///proj/main.st");
    let diagnostic = &response["diagnostics"][0];
    assert_eq!(diagnostic["severity"], 1);
    // LSP convention: 0-based line/character
    assert_eq!(diagnostic["range"]["start"]["line"], 1);
    assert_eq!(diagnostic["range"]["start"]["character"], 8);
}

#[test]
fn test_validate_clean_document() {
    let response = respond(json!({
        "type": "validate",
        "uri": "file:///a.st",
        "text": CLEAN_SOURCE.as_str()
    }));
    assert_eq!(response["diagnostics"], json!([]));
}

#[test]
fn test_fatal_error_shape() {
    let response = respond(json!({ "type": "deploy" }));
    assert_eq!(response["success"], false);
    assert_eq!(response["diagnostics"], json!([]));
    assert_eq!(response["fileCount"], 0);
    assert!(
        response["error"]
            .as_str()
            .expect("fatal responses carry an error message")
            .contains("invalid request")
    );
}

#[test]
fn test_garbage_input_does_not_kill_worker() {
    let first = handle_message("not json at all");
    assert!(first.contains("\"success\":false"));
    // The worker still answers the next request normally
    let response = respond(json!({
        "type": "compile",
        "files": [{ "fileName": "a.st", "content": CLEAN_SOURCE.as_str() }]
    }));
    assert_eq!(response["type"], "compile-result");
}
