//! Heading detection over extracted page text.
//!
//! Lines that look like headings open a new section; every other line is
//! appended to the section currently open. Text before the first heading
//! lands under [`SENTINEL_HEADER`].

use regex::Regex;

use crate::model::{Headers, PageText, SENTINEL_HEADER};

/// Groups lines of text under the headings that precede them.
pub struct ContentStructurer {
    heading_patterns: Vec<Regex>,
}

impl ContentStructurer {
    /// Create a structurer with the built-in heading patterns.
    pub fn new() -> Self {
        let heading_patterns = [
            // ALL CAPS, optional trailing colon
            r"^\s*(?:[A-Z][A-Z\s]+:?\s*)$",
            // 1. Introduction
            r"^\s*\d+\.\s+[A-Z][a-zA-Z\s]+",
            // § 3. Definitions
            r"^\s*§\s*\d+\.\s.*",
            // IV. Results
            r"^\s*[IVX]+\.\s.*",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect();

        Self { heading_patterns }
    }

    /// Whether `line` (already trimmed) is a heading.
    pub fn is_heading(&self, line: &str) -> bool {
        self.heading_patterns.iter().any(|re| re.is_match(line))
    }

    /// Build the heading outline for `pages`.
    pub fn structure(&self, pages: &[PageText]) -> Headers {
        let mut headers = Headers::new();
        if pages.is_empty() {
            return headers;
        }

        let mut current = SENTINEL_HEADER.to_string();
        headers.insert(current.clone(), Vec::new());

        for page in pages {
            for line in page.content.split('\n') {
                let line = line.trim();
                if self.is_heading(line) {
                    current = line.to_string();
                    // A repeated heading keeps its first position but starts over.
                    headers.insert(current.clone(), Vec::new());
                } else {
                    headers
                        .entry(current.clone())
                        .or_default()
                        .push(line.to_string());
                }
            }
        }

        log::debug!("Structured content into {} section(s)", headers.len());
        headers
    }
}

impl Default for ContentStructurer {
    fn default() -> Self {
        Self::new()
    }
}

/// Structure `pages` with the default heading patterns.
pub fn structure_content(pages: &[PageText]) -> Headers {
    ContentStructurer::new().structure(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> PageText {
        PageText::text(1, text)
    }

    #[test]
    fn test_heading_patterns() {
        let s = ContentStructurer::new();
        assert!(s.is_heading("1. Introduction"));
        assert!(s.is_heading("RESULTS"));
        assert!(s.is_heading("RESULTS:"));
        assert!(s.is_heading("§ 4. Scope of work"));
        assert!(s.is_heading("IV. Discussion"));
        assert!(!s.is_heading("the cat sat"));
        assert!(!s.is_heading("1. lowercase start"));
        assert!(!s.is_heading("A"));
        assert!(!s.is_heading(""));
    }

    #[test]
    fn test_lines_follow_current_heading() {
        let headers = structure_content(&[
            page("Preamble text\n1. Introduction\nFirst line\n\nSecond line"),
            page("METHODS\nWe measured"),
        ]);

        let keys: Vec<&str> = headers.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![SENTINEL_HEADER, "1. Introduction", "METHODS"]);
        assert_eq!(headers[SENTINEL_HEADER], vec!["Preamble text"]);
        assert_eq!(headers["1. Introduction"], vec!["First line", "", "Second line"]);
        assert_eq!(headers["METHODS"], vec!["We measured"]);
    }

    #[test]
    fn test_repeated_heading_is_reset_in_place() {
        let headers = structure_content(&[page("SUMMARY\nold\nNOTES\nn\nSUMMARY\nnew")]);

        let keys: Vec<&str> = headers.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![SENTINEL_HEADER, "SUMMARY", "NOTES"]);
        assert_eq!(headers["SUMMARY"], vec!["new"]);
    }

    #[test]
    fn test_sentinel_present_even_when_unused() {
        let headers = structure_content(&[page("ABSTRACT\nbody")]);
        assert!(headers[SENTINEL_HEADER].is_empty());
    }

    #[test]
    fn test_empty_content_has_no_sections() {
        assert!(structure_content(&[]).is_empty());
    }

    #[test]
    fn test_headings_are_trimmed() {
        let headers = structure_content(&[page("   2. Related Work   \ntext")]);
        assert_eq!(headers["2. Related Work"], vec!["text"]);
    }
}
