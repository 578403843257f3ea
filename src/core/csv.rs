//! Minimal comma-separated line splitting.

/// Splits one line into trimmed fields.
///
/// A `"` toggles quoted mode and is dropped from the output; commas inside
/// quotes are kept as data. Doubled quotes are not treated as an escape, so
/// `"a""b"` yields `ab`. A malformed line simply yields fewer (or merged)
/// fields; callers check the field count.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
