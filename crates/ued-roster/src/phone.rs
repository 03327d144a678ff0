// phone.rs — Contact extraction: free-form contact text → normalized phones.
//
// Contact fields in the roster are hand-typed: "Tel: 261-123-4567 /
// 54 9 2611234568 (hija)" is a normal entry. Extraction finds digit runs
// (tolerating the separators people type inside one number), strips them
// down to digits, drops runs too short to be a phone, and normalizes the
// Argentine mobile prefix so every result is dialable as 549XXXXXXXXXX.
//
// The ruleset is load-bearing: a wrong prefix silently targets a different
// (or nonexistent) recipient, so it mirrors the operational procedure
// exactly rather than attempting anything smarter.

use std::sync::OnceLock;

use regex::Regex;

/// Maximal digit runs. Spaces, hyphens, and dots are tolerated inside a run
/// ("261-123-4567", "54 9 2611234568" are each one run); any other
/// character — letters, slashes, parentheses — terminates it. A run starts
/// and ends on a digit.
fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9](?:[0-9 .\-]*[0-9])?").expect("digit-run regex is valid"))
}

/// Extract every normalized phone candidate from a raw contact field, in
/// encounter order. Duplicates are preserved — deduplication happens only at
/// history-merge time. An empty result means the record has no usable
/// contact and is skipped by fan-out.
pub fn extract_phones(raw: &str) -> Vec<String> {
    let mut phones = Vec::new();

    for m in digit_runs().find_iter(raw) {
        let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
        // Anything shorter than 9 digits is an extension, a street number,
        // or a fragment — not a dialable phone.
        if digits.len() < 9 {
            continue;
        }
        phones.push(normalize_prefix(&digits));
    }

    phones
}

/// Apply the Argentine mobile prefix rules:
/// - "54…" (country code without the mobile marker) → "549" + rest
/// - anything else not already "549…" → "549" + last 10 digits
/// - "549…" → unchanged
fn normalize_prefix(digits: &str) -> String {
    if digits.starts_with("549") {
        digits.to_string()
    } else if digits.starts_with("54") {
        format!("549{}", &digits[2..])
    } else {
        let tail_start = digits.len().saturating_sub(10);
        format!("549{}", &digits[tail_start..])
    }
}
