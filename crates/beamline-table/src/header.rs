//! Scalar metadata embedded in free-text header lines.

use indexmap::IndexMap;

/// Extract `name: value` / `name = value` pairs from header text.
///
/// The key is the last word before each separator; the value is the first
/// word after it, kept only if it parses as a finite number. The first
/// occurrence of a key wins.
pub(crate) fn scan_fields<'a, I>(lines: I) -> IndexMap<String, f64>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = IndexMap::new();
    for line in lines {
        for (at, sep) in line.char_indices().filter(|(_, c)| *c == ':' || *c == '=') {
            let Some(key) = line[..at].split_whitespace().next_back() else {
                continue;
            };
            let key = key.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'));
            if key.is_empty() {
                continue;
            }
            let rest = &line[at + sep.len_utf8()..];
            let Some(word) = rest.split_whitespace().next() else {
                continue;
            };
            let word = word.trim_end_matches([',', ';']);
            if let Ok(value) = word.parse::<f64>() {
                if value.is_finite() {
                    fields.entry(key.to_string()).or_insert(value);
                }
            }
        }
    }
    fields
}
