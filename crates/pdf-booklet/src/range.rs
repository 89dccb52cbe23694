//! Page range expressions
//!
//! An expression such as `"1-5, 8 10-12"` is a list of tokens separated by
//! commas and/or whitespace. Each token is a 1-based page number or an
//! inclusive `start-end` span. Parsing is split from resolution so that a
//! malformed expression is rejected before any document is opened.

use crate::types::*;
use std::collections::BTreeSet;

/// One token of a page range expression (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeItem {
    Single(usize),
    Span { start: usize, end: usize },
}

/// A syntactically valid page range expression
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRange {
    items: Vec<RangeItem>,
}

impl PageRange {
    /// Parse an expression. A blank expression selects every page.
    pub fn parse(expr: &str) -> Result<Self> {
        let items = expr
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(parse_token)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { items })
    }

    /// True when the expression selects every page
    pub fn is_all(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[RangeItem] {
        &self.items
    }

    /// Resolve against a document of `total_pages` pages.
    ///
    /// Returns ascending, deduplicated 0-based indices. Numbers outside
    /// `1..=total_pages` are dropped.
    pub fn resolve(&self, total_pages: usize) -> Result<Vec<usize>> {
        if self.is_all() {
            if total_pages == 0 {
                return Err(BookletError::EmptySelection);
            }
            return Ok((0..total_pages).collect());
        }

        let mut indices = BTreeSet::new();
        for item in &self.items {
            let (start, end) = match *item {
                RangeItem::Single(page) => (page, page),
                RangeItem::Span { start, end } => (start, end),
            };
            // Clamp to 1..=total_pages; everything outside is dropped.
            let first = start.max(1);
            let last = end.min(total_pages);
            indices.extend((first..=last).map(|page| page - 1));
        }

        if indices.is_empty() {
            return Err(BookletError::EmptySelection);
        }
        Ok(indices.into_iter().collect())
    }
}

fn parse_token(token: &str) -> Result<RangeItem> {
    let malformed = || BookletError::MalformedRange(token.to_string());

    match token.split_once('-') {
        Some((start, end)) => {
            let start: usize = start.parse().map_err(|_| malformed())?;
            let end: usize = end.parse().map_err(|_| malformed())?;
            if start > end {
                return Err(malformed());
            }
            Ok(RangeItem::Span { start, end })
        }
        None => token.parse().map(RangeItem::Single).map_err(|_| malformed()),
    }
}

/// Parse `expr` and resolve it against `total_pages` in one step.
pub fn parse_page_range(expr: &str, total_pages: usize) -> Result<Vec<usize>> {
    PageRange::parse(expr)?.resolve(total_pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_selects_all() {
        assert_eq!(parse_page_range("", 4).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(parse_page_range("  \t ", 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_mixed_tokens() {
        let pages = parse_page_range("1-3, 8 10-11,,5", 20).unwrap();
        assert_eq!(pages, vec![0, 1, 2, 4, 7, 9, 10]);
    }

    #[test]
    fn test_normalizes_to_ascending_and_dedups() {
        let pages = parse_page_range("9, 2-4, 3, 1", 10).unwrap();
        assert_eq!(pages, vec![0, 1, 2, 3, 8]);
    }

    #[test]
    fn test_out_of_range_numbers_dropped() {
        let pages = parse_page_range("0, 3, 5-9", 6).unwrap();
        assert_eq!(pages, vec![2, 4, 5]);
    }

    #[test]
    fn test_everything_out_of_range_is_empty_selection() {
        assert!(matches!(
            parse_page_range("7-9, 12", 5),
            Err(BookletError::EmptySelection)
        ));
        assert!(matches!(
            parse_page_range("", 0),
            Err(BookletError::EmptySelection)
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        for expr in ["abc", "1-x", "-3", "4-", "1-2-3", "2.5"] {
            match parse_page_range(expr, 10) {
                Err(BookletError::MalformedRange(token)) => assert_eq!(token, expr),
                other => panic!("expected MalformedRange for {expr:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_keeps_tokens_in_order() {
        let range = PageRange::parse("4, 1-2").unwrap();
        assert_eq!(
            range.items(),
            &[RangeItem::Single(4), RangeItem::Span { start: 1, end: 2 }]
        );
        assert!(!range.is_all());
    }

    #[test]
    fn test_reversed_span_fails() {
        match PageRange::parse("1, 5-2") {
            Err(BookletError::MalformedRange(token)) => assert_eq!(token, "5-2"),
            other => panic!("expected MalformedRange, got {other:?}"),
        }
    }

    #[test]
    fn test_huge_span_is_clamped() {
        let pages = parse_page_range("2-1000000000", 3).unwrap();
        assert_eq!(pages, vec![1, 2]);
    }
}
