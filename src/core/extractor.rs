use once_cell::sync::Lazy;
use regex::Regex;

// `0x` followed by exactly 40 hex characters.
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0x[0-9a-fA-F]{40}").expect("static pattern"));

/// Scan `text` for the first embedded `0x` + 40-hex address.
///
/// Purely syntactic: no checksum validation, no reachability check.
pub fn extract_address(text: &str) -> Option<&str> {
    ADDRESS_RE.find(text).map(|m| m.as_str())
}
