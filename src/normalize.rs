//! The `normalize` module folds a free-form address string into the canonical Han+ASCII form
//! the tokenizer's grammar expects: alternative spellings canonicalized, noise stripped,
//! full-width and Han-numeral digits converted to ASCII.
//!
//! The rewrite is a single left-to-right, non-overlapping, non-recursive pass over one ordered
//! alternation of rules, implemented as a manual scan rather than a `nom` combinator chain: the
//! alternation mixes literal runs, lookaround, and a small backtracking numeral grammar that don't
//! compose as cleanly as the tokenizer's grammar does (see `tokenize`).

/// The seven units that license a bare 1–99 Han numeral to collapse to ASCII digits (a subset of
/// [`crate::token::UNIT_ALPHABET`]).
const NUMERAL_LOOKAHEAD_UNITS: [char; 7] = ['段', '路', '街', '巷', '弄', '號', '樓'];

fn han_digit_value(c: char) -> Option<u8> {
    match c {
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

fn numeral_lookahead_ok(chars: &[char], pos: usize) -> bool {
    pos < chars.len() && NUMERAL_LOOKAHEAD_UNITS.contains(&chars[pos])
}

/// Tries the Han-numeral alternative at `i`, preferring the longest shape
/// that satisfies the trailing unit lookahead: `d十e` (3 chars), `d十` or `十e` or `de` (2 chars),
/// then a bare `十` (meaning 10) or a bare digit (1 char).
fn match_han_numeral(chars: &[char], i: usize) -> Option<(usize, String)> {
    let n = chars.len();
    if i + 2 < n {
        if let (Some(d0), true, Some(d2)) =
            (han_digit_value(chars[i]), chars[i + 1] == '十', han_digit_value(chars[i + 2]))
        {
            if numeral_lookahead_ok(chars, i + 3) {
                return Some((3, format!("{d0}{d2}")));
            }
        }
    }
    if i + 1 < n {
        if let (Some(d0), true) = (han_digit_value(chars[i]), chars[i + 1] == '十') {
            if numeral_lookahead_ok(chars, i + 2) {
                return Some((2, format!("{d0}0")));
            }
        }
        if chars[i] == '十' {
            if let Some(d1) = han_digit_value(chars[i + 1]) {
                if numeral_lookahead_ok(chars, i + 2) {
                    return Some((2, format!("1{d1}")));
                }
            }
        }
        if let (Some(_), Some(d1)) = (han_digit_value(chars[i]), han_digit_value(chars[i + 1])) {
            if numeral_lookahead_ok(chars, i + 2) {
                return Some((2, format!("1{d1}")));
            }
        }
    }
    if chars[i] == '十' && numeral_lookahead_ok(chars, i + 1) {
        return Some((1, "10".to_string()));
    }
    if let Some(d0) = han_digit_value(chars[i]) {
        if numeral_lookahead_ok(chars, i + 1) {
            return Some((1, d0.to_string()));
        }
    }
    None
}

/// Normalizes `s` into the canonical form the tokenizer expects.  Total: never fails on valid
/// Unicode input, and returns the empty string for empty or all-noise input.
#[tracing::instrument(skip_all)]
pub fn normalize(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(n);
    let mut i = 0;

    while i < n {
        if i == 0 {
            let mut j = 0;
            while j < n && chars[j].is_ascii() {
                j += 1;
            }
            if j > 0 {
                i = j;
                continue;
            }
        }

        if (chars[i] == '臺' || chars[i] == '台') && i + 1 < n && chars[i + 1] == '灣' {
            let has_sheng = i + 2 < n && chars[i + 2] == '省';
            let with_sheng_end = if has_sheng { i + 3 } else { i + 2 };
            let blocked = |end: usize| {
                end + 1 < n && matches!((chars[end], chars[end + 1]), ('大', '道') | ('港', '務'))
            };
            if !blocked(with_sheng_end) {
                i = with_sheng_end;
                continue;
            }
            // The greedy `省?` match is blocked by the guard; backtrack to the shorter match
            // without consuming `省` and re-check the guard there (the original's regex engine
            // does this naturally). The two characters right after `臺灣`/`台灣` are now `省` plus
            // whatever follows it, so the guard can never block this shorter match.
            if has_sheng && !blocked(i + 2) {
                i = i + 2;
                continue;
            }
        }

        match chars[i] {
            ' ' | '\u{3000}' | ',' | '，' => {
                i += 1;
                continue;
            }
            '台' => {
                out.push('臺');
                i += 1;
                continue;
            }
            '~' | '-' => {
                out.push('之');
                i += 1;
                continue;
            }
            _ => {}
        }

        if chars[i] == '北' && i + 1 < n && chars[i + 1] == '市' {
            let preceded_by_blocked = i > 0 && matches!(chars[i - 1], '臺' | '台' | '新' | '竹');
            let followed_by_blocked = i + 2 < n && chars[i + 2] == '場';
            if !preceded_by_blocked && !followed_by_blocked {
                out.push_str("臺北市");
                i += 2;
                continue;
            }
        }

        if ('\u{FF10}'..='\u{FF19}').contains(&chars[i]) {
            let digit = (chars[i] as u32 - 0xFF10) as u8;
            out.push((b'0' + digit) as char);
            i += 1;
            continue;
        }

        if let Some((len, replacement)) = match_han_numeral(&chars, i) {
            out.push_str(&replacement);
            i += len;
            continue;
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent() {
        let cases = [
            "台北市中正區",
            "臺北市中正區忠孝東路1段1號",
            "臺灣大道",
            "台灣省港務",
        ];
        for c in cases {
            let once = normalize(c);
            assert_eq!(normalize(&once), once, "not idempotent for {c:?}");
        }
    }

    #[test]
    fn tai_becomes_long_tai() {
        assert_eq!(normalize("台北市中正區"), "臺北市中正區");
    }

    #[test]
    fn bei_shi_rewrite_and_guards() {
        assert_eq!(normalize("北市中正區"), "臺北市中正區");
        assert_eq!(normalize("新竹北市中正區"), "新竹北市中正區");
        assert_eq!(normalize("北市場"), "北市場");
    }

    #[test]
    fn han_numeral_expansion() {
        assert_eq!(normalize("忠孝東路一段"), "忠孝東路1段");
        assert_eq!(normalize("忠孝東路十段"), "忠孝東路10段");
        assert_eq!(normalize("忠孝東路九十九段"), "忠孝東路99段");
        assert_eq!(normalize("忠孝東路二十段"), "忠孝東路20段");
    }

    #[test]
    fn taiwan_boulevard_is_preserved() {
        assert_eq!(normalize("台灣大道"), "臺灣大道");
    }

    #[test]
    fn taiwan_sheng_backtracks_when_guard_blocks_the_longer_match() {
        // `省?` is greedy: the 3-char match (`臺灣省`) is tried first. When that's blocked by the
        // 大道/港務 guard, the shorter 2-char match (`臺灣`) is retried and its own guard never
        // blocks (the two characters right after it are now `省` plus whatever follows), so
        // `臺灣`/`台灣` is deleted but `省` itself survives.
        assert_eq!(normalize("台灣省港務"), "省港務");
        assert_eq!(normalize("台灣省大道"), "省大道");
    }

    #[test]
    fn empty_and_noise_only_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   ,，"), "");
    }

    #[test]
    fn fullwidth_digits_convert() {
        assert_eq!(normalize("１２３號"), "123號");
    }
}
