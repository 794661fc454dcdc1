// src/process/key.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Spreadsheet formula escape: `="0012-3"`.
static FORMULA_WRAPPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)^="(.*)"$"#).expect("formula pattern should compile"));

static HYPHEN_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-{2,}").expect("hyphen pattern should compile"));

/// Dash look-alikes that spreadsheets and IMEs produce in identifiers.
fn is_dash_variant(c: char) -> bool {
    matches!(
        c,
        '\u{2010}'..='\u{2015}' // hyphen .. horizontal bar
            | '\u{2212}' // minus sign
            | '\u{FE63}' // small hyphen-minus
            | '\u{FF0D}' // fullwidth hyphen-minus
    )
}

fn strip_outer_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn normalize_once(raw: &str) -> String {
    let s = strip_outer_quotes(raw.trim());
    let s = match FORMULA_WRAPPED.captures(s) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => s,
    };
    let s = s.strip_prefix('\'').unwrap_or(s);

    let dashed: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '/' | '\u{FF0F}' => '-',
            c if is_dash_variant(c) => '-',
            c => c,
        })
        .collect();

    HYPHEN_RUN
        .replace_all(&dashed, "-")
        .trim_matches('-')
        .to_string()
}

/// Canonical lookup key for an identifier cell, used to find its image file.
///
/// Equivalent spellings (`="0000--0"`, `'0000－0`, `0000 / 0`) all map to
/// `0000-0`. Steps repeat until the value is stable, so wrappers nested by
/// repeated copy-paste are peeled too and `normalize_key(normalize_key(x)) ==
/// normalize_key(x)` holds.
pub fn normalize_key(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formula_and_doubled_hyphen() {
        assert_eq!(normalize_key("=\"0000--0\""), "0000-0");
        assert_eq!(normalize_key("0000-0"), "0000-0");
        assert_eq!(normalize_key("=\"0000--0\""), normalize_key("0000-0"));
    }

    #[test]
    fn test_copy_paste_artifacts() {
        assert_eq!(normalize_key("  \"A-12\"  "), "A-12");
        assert_eq!(normalize_key("'0012-3"), "0012-3");
        assert_eq!(normalize_key("0012－3"), "0012-3");
        assert_eq!(normalize_key("0012—3"), "0012-3");
        assert_eq!(normalize_key("0012／3"), "0012-3");
        assert_eq!(normalize_key("0012 / 3"), "0012-3");
        assert_eq!(normalize_key("12\u{3000}34"), "1234");
        assert_eq!(normalize_key("--12---34--"), "12-34");
    }

    #[test]
    fn test_prolonged_sound_mark_is_kept() {
        assert_eq!(normalize_key("ルーシー-01"), "ルーシー-01");
        assert_eq!(normalize_key("ﾙｰｼｰ－01"), "ﾙｰｼｰ-01");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("   "), "");
        assert_eq!(normalize_key("=\"\""), "");
        assert_eq!(normalize_key("- / -"), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "=\"0000--0\"",
            "\"\"abc\"\"",
            "''0012",
            "=\"'00 12\"",
            "\"=\"\"9-9\"\"\"",
            " ／A－B／ ",
            "−−1‐2",
            "plain",
            "\"",
            "'",
            "=\"",
        ];
        for s in samples {
            let once = normalize_key(s);
            assert_eq!(normalize_key(&once), once, "not idempotent for {:?}", s);
        }
    }
}
