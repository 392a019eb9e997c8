use regex::Regex;

/// Caller-supplied exclusion patterns, parsed from a comma-separated string.
///
/// Feed-style adapters filter by title substring; the Twitch adapter matches
/// login handles against case-insensitive `*`/`?` globs.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    keywords: Vec<String>,
}

impl IgnoreList {
    pub fn parse(raw: &str) -> Self {
        let keywords = raw
            .split(',')
            .map(str::trim)
            .filter(|kw| !kw.is_empty())
            .map(String::from)
            .collect();
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn matches_substring(&self, title: &str) -> bool {
        self.keywords.iter().any(|kw| title.contains(kw.as_str()))
    }

    pub fn matches_glob(&self, name: &str) -> bool {
        self.keywords
            .iter()
            .any(|kw| glob_to_regex(kw).is_match(name))
    }
}

/// Compile a `*`/`?` glob into an anchored, case-insensitive regex.
fn glob_to_regex(glob: &str) -> Regex {
    let mut pattern = String::from("(?i)^");
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(&ch.to_string())),
        }
    }
    pattern.push('$');
    // The pattern is built from escaped literals and the two wildcard
    // expansions only, so compilation cannot fail.
    Regex::new(&pattern).unwrap_or_else(|_| Regex::new("$^").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_and_trims() {
        let list = IgnoreList::parse("foo, bar ,,baz");
        assert!(list.matches_substring("a foo b"));
        assert!(list.matches_substring("bar"));
        assert!(list.matches_substring("baz!"));
        assert!(!list.matches_substring("qux"));
    }

    #[test]
    fn test_empty_input_matches_nothing() {
        let list = IgnoreList::parse("");
        assert!(list.is_empty());
        assert!(!list.matches_substring("anything"));
        assert!(!list.matches_glob("anything"));
    }

    #[test]
    fn test_glob_wildcards() {
        let list = IgnoreList::parse("rainbow6*,e?bot");
        assert!(list.matches_glob("rainbow6tv"));
        assert!(list.matches_glob("egbot"));
        assert!(!list.matches_glob("xrainbow6"));
    }

    #[test]
    fn test_glob_is_case_insensitive() {
        let list = IgnoreList::parse("Rainbow6*");
        assert!(list.matches_glob("RAINBOW6TV"));
        assert!(list.matches_glob("rainbow6tv"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let list = IgnoreList::parse("a.b");
        assert!(list.matches_glob("a.b"));
        assert!(!list.matches_glob("axb"));
    }
}
