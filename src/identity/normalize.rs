// Player name normalization for cross-provider matching.
//
// Providers disagree on punctuation and generational suffix formatting
// ("Odell Beckham Jr." vs "Odell Beckham", "Ja'Marr" vs "Ja'Marr" with a
// curly apostrophe). Normalization is deliberately conservative: it only
// strips known-safe tokens and never edits interior characters, so two
// distinct real players can never be merged by it.

/// Trailing generational suffixes stripped as whole tokens.
const SUFFIX_TOKENS: &[&str] = &["jr", "sr", "ii", "iii"];

/// Reduce a display name to its canonical comparable form.
///
/// Rules, applied in order: lowercase; strip straight and curly apostrophes
/// and periods; replace hyphens with spaces; drop trailing generational
/// suffix tokens (repeatedly, so "Smith Jr. III" and "Smith" normalize the
/// same and the function is idempotent); trim surrounding whitespace.
///
/// Total function: always returns a string, possibly empty.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\'' | '\u{2019}' | '.' => {}
            '-' => out.push(' '),
            _ => out.extend(c.to_lowercase()),
        }
    }

    let mut s = out.trim().to_string();
    loop {
        let stripped = strip_trailing_suffix(&s);
        if stripped == s {
            break;
        }
        s = stripped;
    }
    s
}

/// Remove one trailing suffix token, if present. Returns the input unchanged
/// otherwise. Never strips the whole name down to nothing: a bare "Jr" stays.
fn strip_trailing_suffix(s: &str) -> String {
    if let Some((head, last)) = s.rsplit_once(char::is_whitespace) {
        if SUFFIX_TOKENS.contains(&last) {
            return head.trim_end().to_string();
        }
    }
    s.to_string()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("O'Brien Jr."), "obrien");
        assert_eq!(normalize("obrien"), "obrien");
        assert_eq!(normalize("D.K. Metcalf"), "dk metcalf");
    }

    #[test]
    fn curly_apostrophe_stripped() {
        assert_eq!(normalize("Ja\u{2019}Marr Chase"), "jamarr chase");
        assert_eq!(normalize("Ja'Marr Chase"), "jamarr chase");
    }

    #[test]
    fn hyphens_become_spaces() {
        assert_eq!(normalize("Clyde Edwards-Helaire"), "clyde edwards helaire");
        assert_eq!(normalize("Amon-Ra St. Brown"), "amon ra st brown");
    }

    #[test]
    fn trailing_suffixes_removed() {
        assert_eq!(normalize("Odell Beckham Jr."), "odell beckham");
        assert_eq!(normalize("Michael Pittman Jr"), "michael pittman");
        assert_eq!(normalize("Marvin Harrison Sr."), "marvin harrison");
        assert_eq!(normalize("Robert Griffin III"), "robert griffin");
        assert_eq!(normalize("Wan'Dale Robinson II"), "wandale robinson");
    }

    #[test]
    fn stacked_suffixes_all_removed() {
        // Pathological but keeps idempotence airtight.
        assert_eq!(normalize("John Smith Jr. III"), "john smith");
    }

    #[test]
    fn interior_suffix_tokens_untouched() {
        // "jr" only strips as a trailing whole token.
        assert_eq!(normalize("Jrue Holiday"), "jrue holiday");
        assert_eq!(normalize("Sr Smith Taylor"), "sr smith taylor");
    }

    #[test]
    fn bare_suffix_survives() {
        assert_eq!(normalize("Jr"), "jr");
    }

    #[test]
    fn idempotent() {
        let cases = [
            "O'Brien Jr.",
            "Clyde Edwards-Helaire",
            "John Smith Jr. III",
            "Ja\u{2019}Marr Chase",
            "  spaced  out  ",
            "",
        ];
        for c in cases {
            let once = normalize(c);
            assert_eq!(normalize(&once), once, "not idempotent for {c:?}");
        }
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
