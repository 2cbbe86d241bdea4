use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static NON_IDENTIFIER_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w.-]").expect("identifier pattern is valid"));

/// Turns a free-form column label into a lowercase identifier that is safe to use as a SQL
/// column name.
///
/// "Order Date" -> "order_date"
/// "  No. of Items " -> "no_of_items"
/// "__price ($)__" -> "price"
///
/// Returns `None` for an empty label. A label without any identifier characters sanitizes to
/// an empty string. Sanitizing an already sanitized identifier returns it unchanged.
#[must_use]
pub fn sanitize_identifier(label: &str) -> Option<String> {
    if label.is_empty() {
        return None;
    }

    let trimmed = label.trim().replace('.', "");
    let underscored = WHITESPACE.replace_all(&trimmed, "_");
    let stripped = NON_IDENTIFIER_CHARS.replace_all(&underscored, "");

    Some(
        stripped
            .trim_matches(|c| matches!(c, '_' | '.' | '-' | ' '))
            .to_lowercase(),
    )
}
