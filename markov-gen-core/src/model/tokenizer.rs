/// Splits raw corpus text into normalized tokens.
///
/// Rules, applied in order:
/// - digit sequences are removed entirely (not replaced by a placeholder)
/// - commas and periods are removed; other punctuation is kept as-is
/// - remaining text is lower-cased
/// - the result is split on whitespace runs
///
/// Empty input yields an empty token sequence; the minimum-length
/// requirement is enforced downstream by fitting, not here.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut cleaned = String::with_capacity(text.len());
	for c in text.chars() {
		if c.is_ascii_digit() || c == ',' || c == '.' {
			continue;
		}
		cleaned.extend(c.to_lowercase());
	}
	cleaned.split_whitespace().map(str::to_owned).collect()
}
