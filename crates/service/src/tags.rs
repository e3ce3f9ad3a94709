//! Tag strings as typed by users: `foo bar`, `foo, bar baz`, `"a tag", other`.

use std::collections::BTreeSet;

/// Split a tag string into sorted, unique tag names.
///
/// Without commas or double quotes the string is split on spaces. Otherwise
/// quoted substrings are taken whole and the remainder is split on commas
/// when a loose comma is present, else on spaces.
pub fn parse_tags(input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }
    if !input.contains(',') && !input.contains('"') {
        return dedup_sorted(split_strip(input, ' '));
    }

    let mut words: Vec<String> = Vec::new();
    let mut to_be_split: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut saw_loose_comma = false;
    let mut open_quote = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c == '"' {
            if !buffer.is_empty() {
                to_be_split.push(std::mem::take(&mut buffer));
            }
            open_quote = true;
            let mut closed = false;
            for q in chars.by_ref() {
                if q == '"' {
                    closed = true;
                    break;
                }
                buffer.push(q);
            }
            if !closed {
                // unterminated quote: the rest is split like loose text
                break;
            }
            let word = buffer.trim();
            if !word.is_empty() {
                words.push(word.to_string());
            }
            buffer.clear();
            open_quote = false;
        } else {
            if c == ',' {
                saw_loose_comma = true;
            }
            buffer.push(c);
        }
    }

    if !buffer.is_empty() {
        if open_quote && buffer.contains(',') {
            saw_loose_comma = true;
        }
        to_be_split.push(buffer);
    }

    let delimiter = if saw_loose_comma { ',' } else { ' ' };
    for chunk in &to_be_split {
        words.extend(split_strip(chunk, delimiter));
    }
    dedup_sorted(words)
}

/// Render tags back into an editable string, quoting names that contain
/// a comma or a space.
pub fn edit_string_for_tags<S: AsRef<str>>(tags: &[S]) -> String {
    let mut names: Vec<String> = tags
        .iter()
        .map(|t| {
            let name = t.as_ref();
            if name.contains(',') || name.contains(' ') {
                format!("\"{name}\"")
            } else {
                name.to_string()
            }
        })
        .collect();
    names.sort();
    names.join(", ")
}

fn split_strip(s: &str, delimiter: char) -> Vec<String> {
    s.split(delimiter).map(str::trim).filter(|w| !w.is_empty()).map(String::from).collect()
}

fn dedup_sorted(words: Vec<String>) -> Vec<String> {
    words.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_only() {
        assert_eq!(parse_tags("one two  one"), vec!["one", "two"]);
    }

    #[test]
    fn comma_wins_over_space() {
        assert_eq!(parse_tags("one two, three"), vec!["one two", "three"]);
    }

    #[test]
    fn quoted_tags_are_kept_whole() {
        assert_eq!(parse_tags("\"one, two\" three four"), vec!["four", "one, two", "three"]);
    }

    #[test]
    fn quotes_mixed_with_commas() {
        assert_eq!(parse_tags("\"one two\", three four, five"), vec!["five", "one two", "three four"]);
    }

    #[test]
    fn unterminated_quote_with_comma() {
        assert_eq!(parse_tags("\"one, two"), vec!["one", "two"]);
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn edit_string_quotes_when_needed() {
        assert_eq!(edit_string_for_tags(&["plain", "with space", "a,b"]), "\"a,b\", \"with space\", plain");
    }
}
