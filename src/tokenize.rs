//! The `tokenize` module segments a normalized address string into an ordered sequence of
//! [`Token`]s.  Unlike `normalize`, the token grammar is a clean sequence of small, composable
//! decisions — a digit run, an optional sub-number, a terminal unit-or-lookahead — so its fixed
//! sub-shapes (digits, `之N`) are expressed with small `nom` parser functions rather than a
//! hand-rolled scan.
use crate::normalize::normalize;
use crate::token::{is_unit_char, Token, NUMERIC_HEAD_UNITS};
use nom::character::complete::char as nom_char;
use nom::character::complete::digit1;
use nom::combinator::{opt, recognize};
use nom::sequence::preceded;
use nom::IResult;

/// Parses a run of ASCII decimal digits.
fn digits(input: &str) -> IResult<&str, &str> {
    digit1(input)
}

/// Parses `之` followed by one or more digits, returning the full `之N` text.
fn subno(input: &str) -> IResult<&str, &str> {
    recognize(preceded(nom_char('之'), digit1))(input)
}

/// Tries the numeric-head branch at the start of `input`: `digits subno? `, requiring that it be
/// immediately followed by one of [`NUMERIC_HEAD_UNITS`]. Returns the token and the remaining
/// input (including the consumed unit character) on success.
fn numeric_head(input: &str) -> Option<(Token, &str)> {
    let (rest, no) = digits(input).ok()?;
    let (rest, sub) = opt(subno)(rest).ok()?;
    let mut chars = rest.chars();
    let unit = chars.next()?;
    if !NUMERIC_HEAD_UNITS.contains(&unit) {
        return None;
    }
    let token = Token::new(no.to_string(), sub.unwrap_or_default().to_string(), String::new(), unit.to_string());
    Some((token, chars.as_str()))
}

/// Checks whether a `name` of `len` characters (starting at 0) is followed by a valid tail;
/// returns how many extra characters the tail itself consumes (0 or 1).
fn try_name_len(chars: &[char], len: usize) -> Option<usize> {
    if len > chars.len() {
        return None;
    }
    let rest: String = chars[len..].iter().collect();
    let mut it = rest.chars();
    if let Some(c) = it.next() {
        if is_unit_char(c) {
            return Some(1);
        }
    }
    if rest.is_empty() || numeric_head(&rest).is_some() {
        return Some(0);
    }
    None
}

/// Normalizes `s`, then extracts its token sequence.  Total: an input that reduces to no
/// recognizable token yields an empty sequence.
#[tracing::instrument(skip_all)]
pub fn tokenize(s: &str) -> Vec<Token> {
    scan_tokens(&normalize(s))
}

/// Extracts the token sequence from already-normalized text, without re-normalizing it. Exposed
/// so the token grammar can be exercised directly, and
/// reused by [`crate::rule::part`], whose residual address text is already normalized.
pub fn scan_tokens(normalized: &str) -> Vec<Token> {
    let chars: Vec<char> = normalized.chars().collect();
    let n = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < n {
        let remaining: String = chars[i..].iter().collect();
        if let Some((token, rest)) = numeric_head(&remaining) {
            i = n - rest.chars().count();
            tokens.push(token);
            continue;
        }
        if let Some((token, consumed)) = scan_name(&chars, i) {
            tokens.push(token);
            i = consumed;
            continue;
        }
        i += 1;
    }

    tokens
}

/// Scans the `name` branch starting at `i`: the shortest run of characters (one ASCII digit, or
/// two-or-more of anything, non-greedy) that is followed by a valid tail — a unit character, a
/// numeric-head token, or end of input. Operates on the shared char buffer rather than a borrowed
/// `&str` slice so the driver can report an absolute position back into `chars`.
fn scan_name(chars: &[char], i: usize) -> Option<(Token, usize)> {
    let n = chars.len();

    if chars[i].is_ascii_digit() {
        let end = i + 1;
        if let Some(tail_len) = try_name_len(&chars[i..], 1) {
            let name: String = chars[i..end].iter().collect();
            let unit = if tail_len == 1 { chars[end].to_string() } else { String::new() };
            return Some((Token::new(String::new(), String::new(), name, unit), end + tail_len));
        }
    }

    let mut len = 2;
    while i + len <= n {
        let end = i + len;
        if let Some(tail_len) = try_name_len(&chars[i..], len) {
            let name: String = chars[i..end].iter().collect();
            let unit = if tail_len == 1 { chars[end].to_string() } else { String::new() };
            return Some((Token::new(String::new(), String::new(), name, unit), end + tail_len));
        }
        len += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_tuple(t: &Token) -> (&str, &str, &str, &str) {
        (&t.no, &t.subno, &t.name, &t.unit)
    }

    #[test]
    fn full_address_example() {
        let tokens = tokenize("臺北市中正區忠孝東路1段1號");
        let flat: Vec<_> = tokens.iter().map(flat_tuple).collect();
        assert_eq!(
            flat,
            vec![
                ("", "", "臺北", "市"),
                ("", "", "中正", "區"),
                ("", "", "忠孝東", "路"),
                ("", "", "1", "段"),
                ("1", "", "", "號"),
            ]
        );
    }

    #[test]
    fn numeric_head_with_subno() {
        let tokens = scan_tokens("10之2號");
        assert_eq!(tokens.len(), 1);
        assert_eq!(flat_tuple(&tokens[0]), ("10", "之2", "", "號"));
    }

    #[test]
    fn unmatched_segment_is_dropped() {
        // A lone trailing name with no unit and no following number is dropped, not an error.
        let tokens = scan_tokens("臺北市x");
        let flat: Vec<_> = tokens.iter().map(flat_tuple).collect();
        assert_eq!(flat, vec![("", "", "臺北", "市")]);
    }

    #[test]
    fn token_unit_soundness() {
        for t in tokenize("臺北市中正區忠孝東路1段1號之3") {
            assert!(t.unit.is_empty() || t.unit.chars().count() == 1);
            assert!(!(t.no.is_empty() && t.name.is_empty()) || (t.no.is_empty() != t.name.is_empty()));
            assert!((!t.no.is_empty()) ^ (!t.name.is_empty()));
        }
    }
}
