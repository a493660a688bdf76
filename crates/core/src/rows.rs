//! Token → row grouping.
//!
//! Tokens are bucketed by their vertical coordinate (`round(y / bucket) *
//! bucket`), so jitter of about half a bucket in either direction lands on the
//! same row regardless of the page's absolute coordinate system.

use std::collections::BTreeMap;

use crate::types::Token;

/// A line of text reassembled from the tokens sharing one vertical bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Quantized vertical coordinate of the bucket.
    pub y: f32,
    /// Token texts joined left-to-right, whitespace collapsed.
    pub text: String,
}

/// Group tokens into rows ordered top of page first.
///
/// Within a row tokens are ordered by `x`. Rows are never dropped, even when
/// their text is empty; blank filtering happens in segmentation.
pub fn group_rows<'a, I>(tokens: I, bucket: f32) -> Vec<Row>
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut buckets: BTreeMap<i64, Vec<&Token>> = BTreeMap::new();
    for token in tokens {
        let key = (token.y / bucket).round() as i64;
        buckets.entry(key).or_default().push(token);
    }

    buckets
        .into_iter()
        .map(|(key, mut row)| {
            row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            let joined = row
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Row {
                y: key as f32 * bucket,
                text: normalize_whitespace(&joined),
            }
        })
        .collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str, x: f32, y: f32) -> Token {
        Token::new(text, x, y)
    }

    #[test]
    fn test_group_rows_orders_top_to_bottom_and_left_to_right() {
        let tokens = vec![
            tok("Calc", 90.0, 120.0),
            tok("151", 60.0, 120.0),
            tok("Fall", 30.0, 100.0),
            tok("MATH", 30.0, 120.0),
            tok("2021", 60.0, 100.0),
        ];
        let rows = group_rows(&tokens, 2.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "Fall 2021");
        assert_eq!(rows[1].text, "MATH 151 Calc");
        assert!(rows[0].y < rows[1].y);
    }

    #[test]
    fn test_group_rows_absorbs_jitter() {
        let tokens = vec![
            tok("MATH", 30.0, 120.4),
            tok("151", 60.0, 119.6),
            tok("A", 200.0, 120.9),
        ];
        let rows = group_rows(&tokens, 2.0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "MATH 151 A");
    }

    #[test]
    fn test_group_rows_is_coordinate_independent() {
        let base = vec![tok("A", 10.0, 50.0), tok("B", 10.0, 70.0)];
        let shifted: Vec<Token> = base
            .iter()
            .map(|t| tok(&t.text, t.x + 500.0, t.y + 3000.0))
            .collect();
        let texts = |rows: Vec<Row>| rows.into_iter().map(|r| r.text).collect::<Vec<_>>();
        assert_eq!(texts(group_rows(&base, 2.0)), texts(group_rows(&shifted, 2.0)));
    }

    #[test]
    fn test_group_rows_keeps_blank_rows() {
        let tokens = vec![tok("  ", 10.0, 10.0), tok("x", 10.0, 40.0)];
        let rows = group_rows(&tokens, 2.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "");
    }

    #[test]
    fn test_group_rows_empty() {
        assert!(group_rows(&Vec::<Token>::new(), 2.0).is_empty());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \t b\n c "), "a b c");
    }
}
