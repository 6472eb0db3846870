//! Recognizers for the well-known replacement-key spellings.
//!
//! Keys are matched case-insensitively and tolerate `-`, `_`, `.` and space
//! as separators. A key may additionally be wrapped in the magic marker
//! (`scaffold<sep>NAME<sep>scaffold`); the wrapper is stripped before any
//! other pattern is considered.

const MAGIC_MARKER: &str = "scaffold";
const SEPARATORS: &[char] = &['-', '_', '.', ' '];

fn tokens(key: &str) -> Vec<String> {
    key.split(SEPARATORS)
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect()
}

fn inner<'a>(tokens: &'a [String]) -> &'a [String] {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last))
            if tokens.len() > 2 && first == MAGIC_MARKER && last == MAGIC_MARKER =>
        {
            &tokens[1..tokens.len() - 1]
        }
        _ => tokens,
    }
}

/// Human-readable name for a replacement key: the wrapped portion of a
/// magic-marker key with separators turned into spaces, or the raw key.
pub fn friendly_name(key: &str) -> String {
    let all = tokens(key);
    let wrapped = inner(&all);
    if wrapped.len() == all.len() {
        key.to_string()
    } else {
        wrapped.join(" ")
    }
}

pub fn is_current_year_key(key: &str) -> bool {
    let all = tokens(key);
    inner(&all) == ["current", "year"]
}

pub fn is_owner_key(key: &str) -> bool {
    let all = tokens(key);
    inner(&all) == ["github", "owner"]
}

pub fn is_repo_name_key(key: &str) -> bool {
    let all = tokens(key);
    inner(&all) == ["github", "repo", "name"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_name_unwraps_magic_marker() {
        assert_eq!(friendly_name("scaffold-project-name-scaffold"), "project name");
        assert_eq!(friendly_name("SCAFFOLD_Author_SCAFFOLD"), "author");
    }

    #[test]
    fn friendly_name_keeps_plain_keys() {
        assert_eq!(friendly_name("license-holder"), "license-holder");
        assert_eq!(friendly_name("scaffold"), "scaffold");
    }

    #[test]
    fn year_owner_and_repo_name_keys_match_through_wrappers() {
        assert!(is_current_year_key("current-year"));
        assert!(is_current_year_key("Current_Year"));
        assert!(is_current_year_key("scaffold.current.year.scaffold"));
        assert!(is_owner_key("GitHub Owner"));
        assert!(is_repo_name_key("github_repo_name"));
        assert!(!is_owner_key("github-owner-name"));
    }
}
