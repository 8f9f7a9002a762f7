use std::os::raw::c_char;

use serde::Serialize;

use tx_compare::{ChangeLevel, CompareEngine, CompareResult, ComparePair};

use crate::marshal::{cstring_to_str, json_to_cstring};
use crate::options::{parse_batch, CompareOptions};
use crate::result::TxResult;

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a `TxResult` that was returned by any `txcmp_*` function.
///
/// Passing a null pointer is a no-op.
///
/// # Safety
///
/// `ptr` must be either null or a valid pointer that was previously returned
/// by one of the `txcmp_*` functions and has not yet been freed.
#[no_mangle]
pub unsafe extern "C" fn txcmp_free(ptr: *mut TxResult) {
    TxResult::free(ptr);
}

// ---------------------------------------------------------------------------
// Compare
// ---------------------------------------------------------------------------

/// Compare two texts.
///
/// `original`: null-terminated UTF-8 string.
/// `modified`: null-terminated UTF-8 string.
/// `options_json`: null-terminated UTF-8 JSON object with an optional
/// `mode` and any `CompareConfig` fields (`"{}"` or `""` for defaults).
///
/// Returns a `TxResult` whose `data` field is a `CompareResult` JSON object
/// on success.
///
/// The returned pointer must be freed with `txcmp_free`.
///
/// # Safety
///
/// All pointer arguments must be valid, non-null, null-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn txcmp_compare(
    original: *const c_char,
    modified: *const c_char,
    options_json: *const c_char,
) -> *mut TxResult {
    let original = match cstring_to_str(original) {
        Ok(s) => s,
        Err(e) => return TxResult::failure(&format!("original: {}", e)),
    };
    let modified = match cstring_to_str(modified) {
        Ok(s) => s,
        Err(e) => return TxResult::failure(&format!("modified: {}", e)),
    };
    let options_str = match cstring_to_str(options_json) {
        Ok(s) => s,
        Err(e) => return TxResult::failure(&format!("options_json: {}", e)),
    };

    let options = match CompareOptions::parse(&options_str) {
        Ok(o) => o,
        Err(e) => return TxResult::failure(&e.to_string()),
    };

    let engine = CompareEngine::new(options.config);
    match engine.compare(&original, &modified, options.mode) {
        Ok(result) => respond(&result),
        Err(e) => TxResult::failure(&e.to_string()),
    }
}

/// Outcome of one pair in a batch, mirroring the envelope shape.
#[derive(Debug, Serialize)]
struct BatchEntry {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<CompareResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Compare many text pairs in parallel.
///
/// `requests_json`: null-terminated UTF-8 JSON array of
/// `{ "original", "modified", "mode"? }` objects.
/// `options_json`: as for `txcmp_compare`; its `mode` applies to requests
/// that do not name one.
///
/// On success `data` is a JSON array with one `{ ok, result?, error? }`
/// object per request, in request order. A failing pair does not fail the
/// batch.
///
/// The returned pointer must be freed with `txcmp_free`.
///
/// # Safety
///
/// Both pointer arguments must be valid, non-null, null-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn txcmp_compare_batch(
    requests_json: *const c_char,
    options_json: *const c_char,
) -> *mut TxResult {
    let requests_str = match cstring_to_str(requests_json) {
        Ok(s) => s,
        Err(e) => return TxResult::failure(&format!("requests_json: {}", e)),
    };
    let options_str = match cstring_to_str(options_json) {
        Ok(s) => s,
        Err(e) => return TxResult::failure(&format!("options_json: {}", e)),
    };

    let options = match CompareOptions::parse(&options_str) {
        Ok(o) => o,
        Err(e) => return TxResult::failure(&e.to_string()),
    };
    let requests = match parse_batch(&requests_str) {
        Ok(r) => r,
        Err(e) => return TxResult::failure(&e.to_string()),
    };

    let pairs: Vec<ComparePair> = requests
        .into_iter()
        .map(|r| r.into_pair(options.mode))
        .collect();

    let entries: Vec<BatchEntry> = CompareEngine::new(options.config)
        .compare_batch(&pairs)
        .into_iter()
        .map(|outcome| match outcome {
            Ok(result) => BatchEntry {
                ok: true,
                result: Some(result),
                error: None,
            },
            Err(e) => BatchEntry {
                ok: false,
                result: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    respond(&entries)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a change ratio as `minimal`, `moderate`, `significant` or
/// `major`. `data` is the JSON string of the level.
///
/// The returned pointer must be freed with `txcmp_free`.
#[no_mangle]
pub extern "C" fn txcmp_change_level(change_ratio: f64) -> *mut TxResult {
    if !change_ratio.is_finite() || change_ratio < 0.0 {
        return TxResult::failure(&format!(
            "invalid options: change ratio must be a finite non-negative number, got {}",
            change_ratio
        ));
    }
    respond(&ChangeLevel::from_ratio(change_ratio))
}

fn respond(value: &impl Serialize) -> *mut TxResult {
    match json_to_cstring(value) {
        Ok(data) => TxResult::success(data),
        Err(e) => TxResult::failure(&e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
