//! Pure text transform functions.
//!
//! Every function here is total: malformed input (an invalid regex, a bad
//! base64 payload, unparsable JSON) degrades to returning the input
//! unchanged instead of failing the session. The one exception is the
//! numeric fold pair (`sum_numbers` / `subtract_numbers`), which propagates
//! `NaN` on non-numeric lines.

use crate::operation::ParamValue;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use regex::Regex;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Parameter access
// ---------------------------------------------------------------------------

fn text_param(params: &[ParamValue], index: usize, default: &str) -> String {
    params
        .get(index)
        .map(|p| p.as_text())
        .unwrap_or_else(|| default.to_string())
}

fn number_param(params: &[ParamValue], index: usize, default: f64) -> Option<f64> {
    match params.get(index) {
        Some(p) => p.as_number(),
        None => Some(default),
    }
}

/// Format a number the way the transforms emit them: integers without a
/// trailing `.0`, `NaN` as the literal string `NaN`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

// ---------------------------------------------------------------------------
// Word splitting
// ---------------------------------------------------------------------------

/// Split into words on whitespace, `-`, `_`, and lower-to-upper camel
/// boundaries. Non-alphanumeric characters act as separators.
fn words(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && prev_lower && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_lowercase() || ch.is_numeric();
            current.push(ch);
        } else {
            prev_lower = false;
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Case transforms
// ---------------------------------------------------------------------------

pub fn upper_case(input: &str, _params: &[ParamValue]) -> String {
    input.to_uppercase()
}

pub fn lower_case(input: &str, _params: &[ParamValue]) -> String {
    input.to_lowercase()
}

/// Title Case each word, preserving the original separators.
pub fn capitalize(input: &str, _params: &[ParamValue]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

pub fn camel_case(input: &str, _params: &[ParamValue]) -> String {
    let words = words(input);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize_word(word));
        }
    }
    out
}

pub fn pascal_case(input: &str, _params: &[ParamValue]) -> String {
    words(input).iter().map(|w| capitalize_word(w)).collect()
}

pub fn snake_case(input: &str, _params: &[ParamValue]) -> String {
    words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn kebab_case(input: &str, _params: &[ParamValue]) -> String {
    words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn constant_case(input: &str, _params: &[ParamValue]) -> String {
    words(input)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

// ---------------------------------------------------------------------------
// Line transforms
// ---------------------------------------------------------------------------

pub fn trim_each_line(input: &str, _params: &[ParamValue]) -> String {
    input.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

pub fn remove_empty_lines(input: &str, _params: &[ParamValue]) -> String {
    input
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keeps the first occurrence of each line.
pub fn remove_duplicate_lines(input: &str, _params: &[ParamValue]) -> String {
    let mut seen = HashSet::new();
    input
        .lines()
        .filter(|l| seen.insert(l.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn sort_lines(input: &str, _params: &[ParamValue]) -> String {
    let mut lines: Vec<&str> = input.lines().collect();
    lines.sort_unstable();
    lines.join("\n")
}

pub fn reverse_lines(input: &str, _params: &[ParamValue]) -> String {
    input.lines().rev().collect::<Vec<_>>().join("\n")
}

pub fn join_lines(input: &str, params: &[ParamValue]) -> String {
    let sep = text_param(params, 0, ", ");
    input.lines().collect::<Vec<_>>().join(&sep)
}

/// Split on a separator, one piece per line. An empty separator is a no-op.
pub fn split_on(input: &str, params: &[ParamValue]) -> String {
    let sep = text_param(params, 0, ", ");
    if sep.is_empty() {
        return input.to_string();
    }
    input.split(&sep).collect::<Vec<_>>().join("\n")
}

pub fn prefix_lines(input: &str, params: &[ParamValue]) -> String {
    let prefix = text_param(params, 0, "");
    input
        .lines()
        .map(|l| format!("{prefix}{l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn suffix_lines(input: &str, params: &[ParamValue]) -> String {
    let suffix = text_param(params, 0, "");
    input
        .lines()
        .map(|l| format!("{l}{suffix}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn number_lines(input: &str, _params: &[ParamValue]) -> String {
    input
        .lines()
        .enumerate()
        .map(|(i, l)| format!("{}. {l}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Wrapping
// ---------------------------------------------------------------------------

/// Greedy word wrap by running character count. Never splits a single word;
/// a word longer than the width stands on its own line.
pub fn wrap_text(input: &str, params: &[ParamValue]) -> String {
    let Some(width) = number_param(params, 0, 80.0) else {
        return input.to_string();
    };
    if width < 1.0 {
        return input.to_string();
    }
    let width = width as usize;

    let mut out: Vec<String> = Vec::new();
    for line in input.lines() {
        if line.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                out.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out.join("\n")
}

// ---------------------------------------------------------------------------
// Regex transforms
// ---------------------------------------------------------------------------

pub fn regex_replace(input: &str, params: &[ParamValue]) -> String {
    let pattern = text_param(params, 0, "");
    let replacement = text_param(params, 1, "");
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(input, replacement.as_str()).into_owned(),
        Err(_) => input.to_string(),
    }
}

pub fn keep_matching_lines(input: &str, params: &[ParamValue]) -> String {
    let pattern = text_param(params, 0, "");
    match Regex::new(&pattern) {
        Ok(re) => input
            .lines()
            .filter(|l| re.is_match(l))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(_) => input.to_string(),
    }
}

pub fn remove_matching_lines(input: &str, params: &[ParamValue]) -> String {
    let pattern = text_param(params, 0, "");
    match Regex::new(&pattern) {
        Ok(re) => input
            .lines()
            .filter(|l| !re.is_match(l))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(_) => input.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Codecs
// ---------------------------------------------------------------------------

pub fn base64_encode(input: &str, _params: &[ParamValue]) -> String {
    BASE64_STANDARD.encode(input)
}

pub fn base64_decode(input: &str, _params: &[ParamValue]) -> String {
    match BASE64_STANDARD.decode(input.trim()) {
        Ok(bytes) => String::from_utf8(bytes).unwrap_or_else(|_| input.to_string()),
        Err(_) => input.to_string(),
    }
}

pub fn json_pretty(input: &str, _params: &[ParamValue]) -> String {
    match serde_json::from_str::<serde_json::Value>(input) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| input.to_string()),
        Err(_) => input.to_string(),
    }
}

pub fn json_minify(input: &str, _params: &[ParamValue]) -> String {
    match serde_json::from_str::<serde_json::Value>(input) {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|_| input.to_string()),
        Err(_) => input.to_string(),
    }
}

/// Convert a JS-style object literal to JSON via the restricted literal
/// parser. Never evaluates anything; unparsable input is returned unchanged.
pub fn object_to_json(input: &str, _params: &[ParamValue]) -> String {
    match crate::literal::parse(input) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| input.to_string()),
        Err(_) => input.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

const CURRENCY_PREFIXES: &[&str] = &["us$", "ar$", "$"];

/// Extract a formatted number, deciding the decimal separator by position:
/// the rightmost of `,` and `.` present in the string is the decimal point;
/// the other is grouping and is dropped.
pub fn extract_number(input: &str, _params: &[ParamValue]) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();
    let mut rest = trimmed;
    for prefix in CURRENCY_PREFIXES {
        if lower.starts_with(prefix) {
            rest = &trimmed[prefix.len()..];
            break;
        }
    }

    let cleaned: String = rest
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return input.to_string();
    }

    // The rightmost separator is the decimal point; every other separator
    // is grouping and is dropped.
    let decimal_pos = cleaned.rfind([',', '.']);
    let normalized: String = cleaned
        .char_indices()
        .filter_map(|(i, c)| match c {
            ',' | '.' if Some(i) == decimal_pos => Some('.'),
            ',' | '.' => None,
            _ => Some(c),
        })
        .collect();

    match normalized.parse::<f64>() {
        Ok(n) => format_number(n),
        Err(_) => input.to_string(),
    }
}

fn line_as_number(line: &str) -> f64 {
    line.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Sum every non-blank line as a number. Non-numeric lines yield NaN, which
/// propagates to the result.
pub fn sum_numbers(input: &str, _params: &[ParamValue]) -> String {
    let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return input.to_string();
    }
    let total: f64 = lines.iter().map(|l| line_as_number(l)).sum();
    format_number(total)
}

/// First line minus every following non-blank line. NaN propagates.
pub fn subtract_numbers(input: &str, _params: &[ParamValue]) -> String {
    let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
    let Some((first, rest)) = lines.split_first() else {
        return input.to_string();
    };
    let result = rest
        .iter()
        .fold(line_as_number(first), |acc, l| acc - line_as_number(l));
    format_number(result)
}

// ---------------------------------------------------------------------------
// Unwrapping & extraction
// ---------------------------------------------------------------------------

const WRAP_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('<', '>'),
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
];

const TRAILING_PUNCTUATION: &[char] = &[',', '.', ';'];

/// Strip a single layer of a matched bracket/quote pair, tolerating one
/// trailing punctuation character which is re-appended after unwrapping.
pub fn remove_wrapping(input: &str, _params: &[ParamValue]) -> String {
    let chars: Vec<char> = input.chars().collect();

    let (body, trailing) = match chars.last() {
        Some(last) if TRAILING_PUNCTUATION.contains(last) => {
            (&chars[..chars.len() - 1], Some(*last))
        }
        _ => (&chars[..], None),
    };

    if body.len() < 2 {
        return input.to_string();
    }
    let first = body[0];
    let last = body[body.len() - 1];
    if !WRAP_PAIRS.iter().any(|&(o, c)| o == first && c == last) {
        return input.to_string();
    }

    let mut out: String = body[1..body.len() - 1].iter().collect();
    if let Some(p) = trailing {
        out.push(p);
    }
    out
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && matches!(first, b'"' | b'\'' | b'`') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

const VALUE_SEPARATORS: &[&str] = &[":", "=>", "->"];

/// Locate the first case-insensitive match of the key, take the remainder up
/// to the end of that line, and extract the value after the first `:`, `=>`,
/// or `->`, stripping one layer of surrounding quotes.
pub fn filter_value_by_key(input: &str, params: &[ParamValue]) -> String {
    let key = text_param(params, 0, "");
    if key.is_empty() {
        return input.to_string();
    }

    let haystack = input.to_lowercase();
    let needle = key.to_lowercase();
    let Some(pos) = haystack.find(&needle) else {
        return input.to_string();
    };
    // Lowercasing can shift byte offsets for a handful of characters; bail
    // out rather than slice off a char boundary.
    let Some(remainder) = input.get(pos + needle.len()..) else {
        return input.to_string();
    };
    let line = remainder.lines().next().unwrap_or("");

    let sep_pos = VALUE_SEPARATORS
        .iter()
        .filter_map(|sep| line.find(sep).map(|i| (i, sep.len())))
        .min_by_key(|&(i, _)| i);

    let value = match sep_pos {
        Some((i, len)) => &line[i + len..],
        None => line,
    };
    strip_quotes(value.trim()).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> Vec<ParamValue> {
        Vec::new()
    }

    // -- case ---------------------------------------------------------------

    #[test]
    fn kebab_case_example() {
        assert_eq!(kebab_case("Hello World", &none()), "hello-world");
    }

    #[test]
    fn case_family() {
        assert_eq!(camel_case("Hello World", &none()), "helloWorld");
        assert_eq!(pascal_case("hello world", &none()), "HelloWorld");
        assert_eq!(snake_case("Hello World", &none()), "hello_world");
        assert_eq!(constant_case("hello world", &none()), "HELLO_WORLD");
        assert_eq!(capitalize("hello world", &none()), "Hello World");
    }

    #[test]
    fn camel_boundaries_split() {
        assert_eq!(kebab_case("someCamelValue", &none()), "some-camel-value");
        assert_eq!(snake_case("mixed-Value_here", &none()), "mixed_value_here");
    }

    // -- lines --------------------------------------------------------------

    #[test]
    fn trim_each_line_is_idempotent() {
        let input = "  a  \n\tb\t\n c";
        let once = trim_each_line(input, &none());
        assert_eq!(once, "a\nb\nc");
        assert_eq!(trim_each_line(&once, &none()), once);
    }

    #[test]
    fn remove_duplicate_lines_keeps_first_and_is_idempotent() {
        let input = "a\nb\na\nc\nb";
        let once = remove_duplicate_lines(input, &none());
        assert_eq!(once, "a\nb\nc");
        assert_eq!(remove_duplicate_lines(&once, &none()), once);
    }

    #[test]
    fn line_family() {
        assert_eq!(remove_empty_lines("a\n\n  \nb", &none()), "a\nb");
        assert_eq!(sort_lines("b\na\nc", &none()), "a\nb\nc");
        assert_eq!(reverse_lines("a\nb\nc", &none()), "c\nb\na");
        assert_eq!(join_lines("a\nb", &["; ".into()]), "a; b");
        assert_eq!(split_on("a, b, c", &none()), "a\nb\nc");
        assert_eq!(prefix_lines("a\nb", &["> ".into()]), "> a\n> b");
        assert_eq!(suffix_lines("a\nb", &[";".into()]), "a;\nb;");
        assert_eq!(number_lines("a\nb", &none()), "1. a\n2. b");
    }

    #[test]
    fn split_on_empty_separator_is_noop() {
        assert_eq!(split_on("abc", &["".into()]), "abc");
    }

    // -- wrapping -----------------------------------------------------------

    #[test]
    fn wrap_text_width_ten() {
        assert_eq!(
            wrap_text("hello world foo", &[ParamValue::Number(10.0)]),
            "hello\nworld foo"
        );
    }

    #[test]
    fn wrap_text_never_splits_a_word() {
        let wrapped = wrap_text("extraordinarily tiny", &[ParamValue::Number(5.0)]);
        assert_eq!(wrapped, "extraordinarily\ntiny");
    }

    #[test]
    fn wrap_text_bad_width_is_noop() {
        assert_eq!(wrap_text("a b", &["wide".into()]), "a b");
        assert_eq!(wrap_text("a b", &[ParamValue::Number(0.0)]), "a b");
    }

    // -- regex --------------------------------------------------------------

    #[test]
    fn regex_replace_works() {
        assert_eq!(
            regex_replace("a1b22c", &[r"\d+".into(), "#".into()]),
            "a#b#c"
        );
    }

    #[test]
    fn invalid_regex_degrades_to_input() {
        assert_eq!(regex_replace("abc", &["[".into(), "x".into()]), "abc");
        assert_eq!(keep_matching_lines("a\nb", &["(".into()]), "a\nb");
        assert_eq!(remove_matching_lines("a\nb", &["(".into()]), "a\nb");
    }

    #[test]
    fn line_filters() {
        assert_eq!(keep_matching_lines("foo\nbar\nfoobar", &["^foo".into()]), "foo\nfoobar");
        assert_eq!(remove_matching_lines("foo\nbar", &["^foo".into()]), "bar");
    }

    // -- codecs -------------------------------------------------------------

    #[test]
    fn base64_round_trip() {
        let input = "héllo wörld\nsecond line";
        let encoded = base64_encode(input, &none());
        assert_eq!(base64_decode(&encoded, &none()), input);
    }

    #[test]
    fn base64_decode_bad_input_unchanged() {
        assert_eq!(base64_decode("!!!not base64!!!", &none()), "!!!not base64!!!");
    }

    #[test]
    fn json_pretty_and_minify() {
        let min = r#"{"a":1,"b":[2,3]}"#;
        let pretty = json_pretty(min, &none());
        assert!(pretty.contains("\n"));
        assert_eq!(json_minify(&pretty, &none()), min);
        assert_eq!(json_pretty("not json", &none()), "not json");
    }

    #[test]
    fn object_to_json_parses_literal() {
        let out = object_to_json("{foo: 'bar', n: 2}", &none());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["foo"], "bar");
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn object_to_json_rejects_code() {
        let input = "{foo: doSomething()}";
        assert_eq!(object_to_json(input, &none()), input);
    }

    // -- numbers ------------------------------------------------------------

    #[test]
    fn extract_number_examples() {
        assert_eq!(extract_number("1.234,56", &none()), "1234.56");
        assert_eq!(extract_number("1,234.56", &none()), "1234.56");
        assert_eq!(extract_number("US$ 42", &none()), "42");
        assert_eq!(extract_number("ar$ 1.500", &none()), "1.5");
        assert_eq!(extract_number("$19.99", &none()), "19.99");
    }

    #[test]
    fn extract_number_repeated_grouping() {
        assert_eq!(extract_number("1,234,567", &none()), "1234.567");
        assert_eq!(extract_number("1.234.567,89", &none()), "1234567.89");
    }

    #[test]
    fn extract_number_unparsable_unchanged() {
        assert_eq!(extract_number("no digits here", &none()), "no digits here");
    }

    #[test]
    fn sum_and_subtract() {
        assert_eq!(sum_numbers("1\n2\n3.5", &none()), "6.5");
        assert_eq!(subtract_numbers("10\n2\n3", &none()), "5");
        assert_eq!(sum_numbers("4\n\n6", &none()), "10");
    }

    #[test]
    fn non_numeric_lines_propagate_nan() {
        assert_eq!(sum_numbers("1\ntwo\n3", &none()), "NaN");
        assert_eq!(subtract_numbers("10\nx", &none()), "NaN");
    }

    // -- unwrapping ---------------------------------------------------------

    #[test]
    fn remove_wrapping_with_trailing_punctuation() {
        assert_eq!(remove_wrapping("(hello),", &none()), "hello,");
    }

    #[test]
    fn remove_wrapping_pairs() {
        assert_eq!(remove_wrapping("[a, b]", &none()), "a, b");
        assert_eq!(remove_wrapping("\"quoted\"", &none()), "quoted");
        assert_eq!(remove_wrapping("'single';", &none()), "single;");
        assert_eq!(remove_wrapping("{x}", &none()), "x");
    }

    #[test]
    fn remove_wrapping_unmatched_unchanged() {
        assert_eq!(remove_wrapping("(open", &none()), "(open");
        assert_eq!(remove_wrapping("plain", &none()), "plain");
        assert_eq!(remove_wrapping("x", &none()), "x");
        assert_eq!(remove_wrapping("", &none()), "");
    }

    // -- key extraction -----------------------------------------------------

    #[test]
    fn filter_value_by_key_basic() {
        let input = "name: \"Ada\"\nrole: engineer";
        assert_eq!(filter_value_by_key(input, &["name".into()]), "Ada");
        assert_eq!(filter_value_by_key(input, &["role".into()]), "engineer");
    }

    #[test]
    fn filter_value_by_key_arrow_separators() {
        assert_eq!(filter_value_by_key("env => 'prod'", &["env".into()]), "prod");
        assert_eq!(filter_value_by_key("ref -> main", &["ref".into()]), "main");
    }

    #[test]
    fn filter_value_by_key_case_insensitive() {
        assert_eq!(filter_value_by_key("Token: abc123", &["token".into()]), "abc123");
    }

    #[test]
    fn filter_value_by_key_missing_unchanged() {
        assert_eq!(filter_value_by_key("a: 1", &["zzz".into()]), "a: 1");
    }

    // -- totality -----------------------------------------------------------

    #[test]
    fn transforms_are_total_on_hostile_input() {
        let hostile = "\u{0}\u{7f}((((\n\n\tNaN\u{1f4a9}";
        for f in [
            upper_case,
            lower_case,
            capitalize,
            camel_case,
            kebab_case,
            trim_each_line,
            remove_duplicate_lines,
            wrap_text,
            base64_decode,
            json_pretty,
            object_to_json,
            extract_number,
            remove_wrapping,
        ] {
            // Must not panic, whatever it returns.
            let _ = f(hostile, &[]);
        }
    }
}
