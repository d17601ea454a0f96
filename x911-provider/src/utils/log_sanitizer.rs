//! Log sanitization for 911 requests.
//!
//! Telephone numbers, street addresses and caller names are subscriber data;
//! debug logs only ever see masked values and truncated payload dumps.

use crate::types::Arguments;

/// Maximum number of bytes of a payload dump written to the log.
const TRUNCATE_LIMIT: usize = 256;

/// Trailing digits of a telephone number left visible.
const VISIBLE_DIGITS: usize = 4;

/// Argument keys whose values are printed as-is.
const PLAIN_KEYS: [&str; 3] = ["state", "location_id", "plus_four"];

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a payload dump for logging.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a telephone number, keeping only its last four digits.
///
/// `"2065551234"` → `"******1234"`.
pub fn mask_number(number: &str) -> String {
    let count = number.chars().count();
    if count <= VISIBLE_DIGITS {
        return "*".repeat(count);
    }
    number
        .chars()
        .enumerate()
        .map(|(i, c)| if i < count - VISIBLE_DIGITS { '*' } else { c })
        .collect()
}

/// Render request arguments for a debug log line.
///
/// Numbers keep their last four digits, free text is replaced by its length.
pub fn describe_arguments(arguments: &Arguments) -> String {
    let parts: Vec<String> = arguments
        .iter()
        .map(|(key, value)| {
            let shown = match key.as_str() {
                "did" | "tn" => mask_number(value),
                k if PLAIN_KEYS.contains(&k) => value.clone(),
                _ => format!("<{} chars>", value.chars().count()),
            };
            format!("{key}={shown}")
        })
        .collect();
    format!("{{{}}}", parts.join(", "))
}
