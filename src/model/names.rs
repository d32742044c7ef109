//! Short display names derived from the portal's raw team and league text.
//!
//! Raw values look like `"1535 - בני הרצליה פנלינק"`: a numeric code, a dash, then the name.

/// Tokens that carry the name: everything except lone dashes and all-digit codes.
fn name_tokens(raw: &str) -> Vec<&str> {
    raw.split_whitespace()
        .filter(|word| *word != "-")
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

/// Team short name: the 2nd and 3rd name tokens when there are at least three,
/// otherwise whatever tokens there are.
pub fn extract_team_name(raw: &str) -> String {
    let words = name_tokens(raw);
    match words.as_slice() {
        [_, second, third, ..] => format!("{} {}", second, third),
        [first, second] => format!("{} {}", first, second),
        [only] => only.to_string(),
        [] => raw.trim().to_string(),
    }
}

/// League short name: the first one or two name tokens.
pub fn extract_league_name(raw: &str) -> String {
    let words = name_tokens(raw);
    match words.as_slice() {
        [first, second, ..] => format!("{} {}", first, second),
        [only] => only.to_string(),
        [] => raw.trim().to_string(),
    }
}
