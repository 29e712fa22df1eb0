//! Identifier normalization, tokenization, and cue-token sets.

/// Tokens dropped during query tokenization.
const STOP_TOKENS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "get", "in", "is", "it", "me",
    "of", "on", "or", "per", "show", "that", "the", "to", "what", "which", "with",
];

/// Name tokens marking archive or audit style tables.
pub const ARCHIVE_TOKENS: &[&str] = &["archive", "history", "hist", "audit", "log", "backup"];

/// Query tokens signalling the caller is fine seeing archive tables.
pub const ARCHIVE_CUE_TOKENS: &[&str] =
    &["archive", "archived", "history", "historical", "audit", "backup", "old"];

/// Query tokens implying aggregation intent.
pub const AGG_CUE_TOKENS: &[&str] = &[
    "top", "rank", "ranked", "sum", "total", "count", "avg", "average", "median", "percent",
    "percentage", "revenue", "most", "highest", "lowest",
];

/// Query tokens implying a temporal scope.
pub const TIME_CUE_TOKENS: &[&str] = &[
    "year", "month", "week", "day", "quarter", "date", "today", "yesterday", "recent", "last",
    "previous", "daily", "monthly", "weekly", "yearly", "trend",
];

/// Relative time words that need an anchor to become a concrete range.
pub const RELATIVE_TIME_TOKENS: &[&str] = &["last", "previous", "recent", "this", "past"];

/// Column-name hints suggesting a numeric column is a measure.
pub const MEASURE_HINT_TOKENS: &[&str] = &[
    "amount", "amt", "balance", "cost", "count", "duration", "fee", "price", "qty", "quantity",
    "rate", "revenue", "sales", "score", "size", "total", "value", "weight",
];

/// Lowercase an identifier and break camel-case and snake-case boundaries
/// into spaces, collapsing runs of separators.
pub fn normalize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !out.ends_with(' ') {
                out.push(' ');
            }
            prev_lower = false;
        } else if ch.is_uppercase() {
            if prev_lower && !out.ends_with(' ') {
                out.push(' ');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    out.trim().to_string()
}

/// Extract lowercase alphanumeric tokens from free text or an identifier,
/// dropping stop tokens.
pub fn tokens_from_text(text: &str) -> Vec<String> {
    normalize_identifier(text)
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty() && !STOP_TOKENS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Whether any token of `haystack_tokens` appears in `cues`.
pub fn has_cue(haystack_tokens: &[String], cues: &[&str]) -> bool {
    haystack_tokens.iter().any(|t| cues.contains(&t.as_str()))
}

/// Whether a table label (`schema.table` or `schema.table::column`) names
/// archive or historical data. Matching is on whole name tokens, so
/// `order_history` is an archive label while `historic_sites` is not.
pub fn is_archive_label(label: &str) -> bool {
    let table_part = label.split("::").next().unwrap_or(label);
    let table_name = table_part.rsplit('.').next().unwrap_or(table_part);
    tokens_from_text(table_name)
        .iter()
        .any(|t| ARCHIVE_TOKENS.contains(&t.as_str()))
}

/// Extract a four-digit year mentioned in the text, if any.
pub fn year_in_text(text: &str) -> Option<i32> {
    for token in text.split(|c: char| !c.is_ascii_digit()) {
        if token.len() == 4 {
            if let Ok(year) = token.parse::<i32>() {
                if (1900..2100).contains(&year) {
                    return Some(year);
                }
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;
