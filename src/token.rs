//! The `token` module defines [`Token`], the 4-tuple `(no, subno, name, unit)` that is the unit
//! of an [`Address`], and the free functions over a token sequence (`flat`, `parse`,
//! `pick_to_flat`) that [`crate::standard::StandardAddress`] and [`crate::rule::Rule`] both
//! build on rather than inheriting from a shared base class.
use serde::{Deserialize, Serialize};

/// The fifteen Han characters that may terminate an address token.  A token's `unit` field is
/// either empty or one of these.
pub const UNIT_ALPHABET: [char; 15] = [
    '縣', '市', '鄉', '鎮', '區', '村', '里', '鄰', '路', '街', '段', '巷', '弄', '號', '樓',
];

/// The four units that make the numeric-head branch of the token grammar eligible: a digit run
/// immediately followed by one of these becomes `(no, subno, _, unit)`; any other continuation
/// falls back to the name branch, landing the digits in `name` instead (see
/// [`crate::tokenize::tokenize`]).
pub const NUMERIC_HEAD_UNITS: [char; 4] = ['巷', '弄', '號', '樓'];

/// Returns true when `c` is a member of [`UNIT_ALPHABET`].
pub fn is_unit_char(c: char) -> bool {
    UNIT_ALPHABET.contains(&c)
}

/// One address token.  Exactly one of `no` / `name` is populated; `subno` and `unit` are
/// independent of that choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_new::new)]
pub struct Token {
    /// Decimal digits as written, or empty.  Populated only for a numbered location (house,
    /// lane, alley, floor) — see [`NUMERIC_HEAD_UNITS`].
    pub no: String,
    /// Text of the form `之N`, or empty.
    pub subno: String,
    /// One or more characters naming an administrative or road unit, or empty.
    pub name: String,
    /// A single character from [`UNIT_ALPHABET`], or empty when elided.
    pub unit: String,
}

impl Token {
    /// Concatenates all four fields in order, reproducing the token's original text.
    pub fn flat(&self) -> String {
        format!("{}{}{}{}", self.no, self.subno, self.name, self.unit)
    }

    /// The token's `unit` field as a `char`, if non-empty.
    pub fn unit_char(&self) -> Option<char> {
        self.unit.chars().next()
    }
}

/// An ordered, finite sequence of [`Token`]s.  `Address` is immutable once constructed, cheap to
/// clone, and owns no shared mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    tokens: Vec<Token>,
}

impl Address {
    /// Builds an `Address` directly from an already-tokenized sequence.  Used internally by
    /// [`crate::standard::standardize`] and [`crate::rule::Rule`], where the tokens have already
    /// been produced (or reordered) elsewhere.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Normalizes and tokenizes `addr_str`, producing its `Address`.
    pub fn new(addr_str: &str) -> Self {
        Self::from_tokens(crate::tokenize::tokenize(addr_str))
    }

    /// The token sequence.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Concatenates the `flat()` of every token, in order.
    pub fn flat(&self) -> String {
        self.tokens.iter().map(Token::flat).collect()
    }

    /// Concatenates the `flat()` of the first `n` tokens (`n` is clamped to `len()`).
    pub fn flat_prefix(&self, n: usize) -> String {
        let n = n.min(self.tokens.len());
        self.tokens[..n].iter().map(Token::flat).collect()
    }

    /// Concatenates the `flat()` of tokens `[from, to)`.  Both bounds are clamped to the token
    /// sequence's length; an empty or inverted range yields the empty string.
    pub fn flat_range(&self, from: usize, to: usize) -> String {
        let from = from.min(self.tokens.len());
        let to = to.min(self.tokens.len());
        if from >= to {
            return String::new();
        }
        self.tokens[from..to].iter().map(Token::flat).collect()
    }

    /// Concatenates the `flat()` of the tokens at `idxs`, in the order given.  An index beyond
    /// the end of the sequence contributes nothing.
    pub fn pick_to_flat(&self, idxs: &[usize]) -> String {
        idxs.iter()
            .filter_map(|&i| self.tokens.get(i))
            .map(Token::flat)
            .collect()
    }

    /// Returns the numeric pair `(no, subno_digits)` for the token at `idx`, treating missing
    /// fields as `0`.  `idx` follows negative indexing (`-1` is the last token);
    /// an index outside `[−len, len)` yields `(0, 0)`, as does a token with no digits.
    pub fn parse(&self, idx: i64) -> (i64, i64) {
        let len = self.tokens.len() as i64;
        let real_idx = if idx < 0 { len + idx } else { idx };
        if real_idx < 0 || real_idx >= len {
            return (0, 0);
        }
        let token = &self.tokens[real_idx as usize];
        let no = token.no.parse::<i64>().unwrap_or(0);
        let subno = if token.subno.is_empty() {
            0
        } else {
            token.subno.chars().skip(1).collect::<String>().parse::<i64>().unwrap_or(0)
        };
        (no, subno)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_roundtrips_token_fields() {
        let token = Token::new("10".into(), "之2".into(), "".into(), "號".into());
        assert_eq!(token.flat(), "10之2號");
    }

    #[test]
    fn parse_out_of_range_is_zero_zero() {
        let addr = Address::from_tokens(vec![Token::new("1".into(), "".into(), "".into(), "號".into())]);
        assert_eq!(addr.parse(5), (0, 0));
        assert_eq!(addr.parse(-5), (0, 0));
    }

    #[test]
    fn parse_negative_index_counts_from_end() {
        let addr = Address::from_tokens(vec![
            Token::new("1".into(), "".into(), "".into(), "巷".into()),
            Token::new("10".into(), "之2".into(), "".into(), "號".into()),
        ]);
        assert_eq!(addr.parse(-1), (10, 2));
        assert_eq!(addr.parse(-2), (1, 0));
    }

    #[test]
    fn flat_range_clamps_and_handles_inversion() {
        let addr = Address::from_tokens(vec![
            Token::new("".into(), "".into(), "臺北".into(), "市".into()),
            Token::new("".into(), "".into(), "中正".into(), "區".into()),
        ]);
        assert_eq!(addr.flat_range(0, 1), "臺北市");
        assert_eq!(addr.flat_range(1, 1), "");
        assert_eq!(addr.flat_range(0, 100), "臺北市中正區");
    }
}
