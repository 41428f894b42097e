use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Search normalization: NFKD, combining marks dropped, lowercase,
/// whitespace collapsed to single spaces.
pub fn fold_for_search(input: &str) -> String {
    let stripped: String = input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    collapse_whitespace(&stripped)
}

/// Guide-matching normalization: lowercase, quote characters removed,
/// whitespace collapsed.
pub fn fold_for_match(input: &str) -> String {
    let stripped: String = input
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}'))
        .flat_map(char::to_lowercase)
        .collect();
    collapse_whitespace(&stripped)
}

/// Lowercase ASCII slug: runs of anything outside `[a-z0-9]` become `-`,
/// with no leading or trailing dash.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
