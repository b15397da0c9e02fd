//! Transaction id extraction from free-form payment references.
//!
//! Users paste anything: a bare hash, an explorer link, or a whole
//! "thanks for your payment" paragraph with the hash buried inside.
//! Extraction is pure string scanning with no I/O; if nothing usable
//! is found the orchestrator falls back to address discovery.

/// Minimum length for a plausible transaction identifier.
/// Shorter runs are overwhelmingly addresses, block heights or noise.
const MIN_ID_LEN: usize = 46;

/// Minimum length for a bare hexadecimal hash (BTC/LTC/ETH/TRON tx hashes are 64 hex chars).
const MIN_HEX_LEN: usize = 64;

/// Extract a canonical transaction id from a raw reference string.
///
/// Tried in order: explorer-URL path segment after `tx/` or `transaction/`,
/// a long hex run anywhere in the input, a long alphanumeric run, and
/// finally the whole trimmed input. Returns `None` when nothing reaches
/// the minimum id length.
pub fn extract(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Explorer links are deterministic: take the path segment after the marker.
    for marker in ["tx/", "transaction/"] {
        if let Some(segment) = after_marker(trimmed, marker) {
            if segment.len() >= MIN_ID_LEN {
                return Some(segment);
            }
        }
    }

    if let Some(run) = first_run(trimmed, MIN_HEX_LEN, |c| c.is_ascii_hexdigit()) {
        return Some(run);
    }

    // Base58-style ids (Tron, some UTXO explorers) are alphanumeric but not hex.
    if let Some(run) = first_run(trimmed, MIN_ID_LEN, |c| c.is_ascii_alphanumeric()) {
        return Some(run);
    }

    if trimmed.len() >= MIN_ID_LEN {
        return Some(trimmed.to_string());
    }

    None
}

/// Alphanumeric run immediately following `marker`, or `None` if the marker is absent.
fn after_marker(input: &str, marker: &str) -> Option<String> {
    let start = input.find(marker)? + marker.len();
    let tail = &input[start..];
    let end = tail
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric())
        .map(|(i, _)| i)
        .unwrap_or(tail.len());
    if end == 0 {
        return None;
    }
    Some(tail[..end].to_string())
}

/// First run of characters accepted by `accept` that is at least `min_len` long.
fn first_run(input: &str, min_len: usize, accept: fn(char) -> bool) -> Option<String> {
    let mut run_start: Option<usize> = None;
    for (i, c) in input.char_indices() {
        if accept(c) {
            if run_start.is_none() {
                run_start = Some(i);
            }
        } else if let Some(start) = run_start.take() {
            if i - start >= min_len {
                return Some(input[start..i].to_string());
            }
        }
    }
    if let Some(start) = run_start {
        if input.len() - start >= min_len {
            return Some(input[start..].to_string());
        }
    }
    None
}
