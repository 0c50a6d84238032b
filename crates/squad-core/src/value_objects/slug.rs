//! URL slugs for catalog entries

/// Build a URL-safe slug from a display name.
///
/// Lowercases, turns whitespace runs into a single `-`, and drops anything
/// that is not alphanumeric, `-` or `_`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.trim().chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = !slug.is_empty();
        } else if c.is_alphanumeric() || c == '_' {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.extend(c.to_lowercase());
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Valorant"), "valorant");
        assert_eq!(slugify("League of Legends"), "league-of-legends");
        assert_eq!(slugify("  Apex   Legends  "), "apex-legends");
        assert_eq!(slugify("Counter-Strike 2"), "counter-strike-2");
        assert_eq!(slugify("Tom Clancy's: Siege!"), "tom-clancys-siege");
        assert_eq!(slugify(""), "");
    }
}
