//! The `rule` module extracts a set of numbering qualifiers from a directory row's rule string
//! and evaluates whether a [`StandardAddress`](crate::standard::StandardAddress) satisfies a
//! [`Rule`].  The qualifier grammar is an ordered alternation of fixed Han literals with one
//! lookahead-guarded single-character alternative, the same scan shape as `normalize`, so it is
//! implemented the same way: a manual left-to-right pass rather than a combinator chain.
use crate::normalize::normalize;
use crate::token::Address;
use std::collections::HashSet;

/// A numbering qualifier recognized in a directory row's rule string.  `連` is intentionally
/// absent: it is matched and discarded during extraction, never added to a rule's qualifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Qualifier {
    /// `單` — house number must be odd.
    Single,
    /// `雙` — house number must be even.
    Double,
    /// `全` — no numeric predicate; the rule covers every address under the exact prefix.
    All,
    /// `至` — house number falls within an inclusive range.
    ToInclusive,
    /// `以上` — house number at or above the rule's own.
    AboveInclusive,
    /// `以下` — house number at or below the rule's own.
    BelowInclusive,
    /// `含附號` — house number equals the rule's own, ignoring sub-number.
    IncludeAppendix,
    /// `附號全` — house number equals the rule's own and a sub-number is present.
    AppendixAll,
    /// `及以上附號` — same predicate as `以上`, distinguished only for residual bookkeeping.
    AboveInclusiveWithAppendix,
    /// `含附號以下` — at or below the rule's own, or an exact house-number match.
    BelowInclusiveWithAppendix,
    /// `含附號全` — contributes no predicate of its own; only relaxes `至`'s range check.
    AllWithAppendix,
}

/// Qualifier literals tried in this exact order so longer, more specific tokens win over their
/// prefixes.  `連` and the single-character alternatives are handled separately.
const LITERALS: [(&str, Qualifier); 7] = [
    ("及以上附號", Qualifier::AboveInclusiveWithAppendix),
    ("含附號以下", Qualifier::BelowInclusiveWithAppendix),
    ("含附號全", Qualifier::AllWithAppendix),
    ("含附號", Qualifier::IncludeAppendix),
    ("以下", Qualifier::BelowInclusive),
    ("以上", Qualifier::AboveInclusive),
    ("附號全", Qualifier::AppendixAll),
];

/// Extracts qualifiers from (already normalized) `rule_str`, returning the qualifier set and the
/// residual text with every matched qualifier removed (`附號全` excepted: it leaves `號` behind).
fn part_normalized(rule_str: &str) -> (HashSet<Qualifier>, String) {
    let chars: Vec<char> = rule_str.chars().collect();
    let n = chars.len();
    let mut qualifiers = HashSet::new();
    let mut residual = String::with_capacity(n);
    let mut i = 0;

    while i < n {
        let remaining: String = chars[i..].iter().collect();

        if let Some((literal, qualifier)) = LITERALS.iter().find(|(lit, _)| remaining.starts_with(lit)) {
            if *qualifier == Qualifier::AppendixAll {
                residual.push('號');
            }
            qualifiers.insert(*qualifier);
            i += literal.chars().count();
            continue;
        }

        if matches!(chars[i], '連' | '至' | '單' | '雙' | '全') {
            let next = chars.get(i + 1);
            let lookahead_ok = match next {
                None => true,
                Some(c) => c.is_ascii_digit() || *c == '全',
            };
            if lookahead_ok {
                match chars[i] {
                    '連' => {}
                    '至' => {
                        qualifiers.insert(Qualifier::ToInclusive);
                    }
                    '單' => {
                        qualifiers.insert(Qualifier::Single);
                    }
                    '雙' => {
                        qualifiers.insert(Qualifier::Double);
                    }
                    '全' => {
                        qualifiers.insert(Qualifier::All);
                    }
                    _ => unreachable!(),
                }
                i += 1;
                continue;
            }
        }

        residual.push(chars[i]);
        i += 1;
    }

    (qualifiers, residual)
}

/// Normalizes `rule_str`, then extracts its qualifier set and residual address text.
pub fn part(rule_str: &str) -> (HashSet<Qualifier>, String) {
    part_normalized(&normalize(rule_str))
}

/// An [`Address`] together with the qualifier set extracted from its owning directory row's rule
/// string.  Built once from a rule string and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    address: Address,
    qualifiers: HashSet<Qualifier>,
}

impl Rule {
    /// Normalizes `rule_str`, extracts its qualifiers, and tokenizes the residual address text.
    pub fn new(rule_str: &str) -> Self {
        let (qualifiers, residual) = part(rule_str);
        let address = Address::from_tokens(crate::tokenize::scan_tokens(&residual));
        Self { address, qualifiers }
    }

    /// The rule's own token sequence (the residual after qualifier extraction).
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The qualifiers present on this rule.
    pub fn qualifiers(&self) -> &HashSet<Qualifier> {
        &self.qualifiers
    }

    /// Tests whether `addr` satisfies this rule.
    pub fn matches(&self, addr: &Address) -> bool {
        let rule_len = self.address.len() as i64;
        let mut my_last = rule_len - 1;

        if !self.qualifiers.is_empty() && !self.qualifiers.contains(&Qualifier::All) {
            my_last -= 1;
        }
        if self.qualifiers.contains(&Qualifier::ToInclusive) {
            my_last -= 1;
        }

        if my_last >= addr.len() as i64 {
            return false;
        }

        let rule_tokens = self.address.tokens();
        let addr_tokens = addr.tokens();
        let mut i: i64 = 0;
        while i <= my_last {
            let idx = i as usize;
            if rule_tokens.get(idx) != addr_tokens.get(idx) {
                return false;
            }
            i += 1;
        }

        let his = addr.parse(my_last + 1);
        let mine = self.address.parse(-1);
        let mine_asst = self.address.parse(-2);

        if !self.qualifiers.is_empty() && his == (0, 0) {
            return false;
        }

        for qualifier in &self.qualifiers {
            let holds = match qualifier {
                Qualifier::Single => his.0 % 2 != 0,
                Qualifier::Double => his.0 % 2 == 0,
                Qualifier::AboveInclusive | Qualifier::AboveInclusiveWithAppendix => his >= mine,
                Qualifier::BelowInclusive => his <= mine,
                Qualifier::ToInclusive => {
                    (mine_asst <= his && his <= mine)
                        || (self.qualifiers.contains(&Qualifier::AllWithAppendix) && his.0 == mine.0)
                }
                Qualifier::IncludeAppendix => his.0 == mine.0,
                Qualifier::AppendixAll => his.0 == mine.0 && his.1 > 0,
                Qualifier::BelowInclusiveWithAppendix => his <= mine || his.0 == mine.0,
                Qualifier::All | Qualifier::AllWithAppendix => true,
            };
            if !holds {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard::StandardAddress;

    #[test]
    fn lian_is_discarded() {
        let (qualifiers, residual) = part("忠孝東路1號連10號");
        assert!(qualifiers.is_empty());
        assert_eq!(residual, "忠孝東路1號10號");
    }

    #[test]
    fn fuhao_quan_restores_hao() {
        let (qualifiers, residual) = part("忠孝東路1附號全");
        assert!(qualifiers.contains(&Qualifier::AppendixAll));
        assert_eq!(residual, "忠孝東路1號");
    }

    #[test]
    fn bare_qualifier_needs_lookahead() {
        // "全家" has 全 not followed by a digit/全/end, so it must not match as a qualifier.
        let (qualifiers, residual) = part("全家1號");
        assert!(qualifiers.is_empty());
        assert_eq!(residual, "全家1號");
    }

    #[test]
    fn range_rule_matches_inside_bounds() {
        // A rule string is always the directory row's head address concatenated with its tail
        // rule text, so its leading tokens line up with the address being tested positionally.
        let rule = Rule::new("臺北市中正區忠孝東路1段1號至10號");
        let addr = StandardAddress::new("臺北市中正區忠孝東路1段5號");
        assert!(rule.matches(addr.address()));
        let addr = StandardAddress::new("臺北市中正區忠孝東路1段11號");
        assert!(!rule.matches(addr.address()));
    }

    #[test]
    fn quan_requires_exact_prefix_equality() {
        let rule = Rule::new("忠孝東路1段全");
        let matching = Address::new("忠孝東路1段5號");
        let mismatching = Address::new("忠孝東路2段5號");
        assert!(rule.matches(&matching));
        assert!(!rule.matches(&mismatching));
    }

    #[test]
    fn single_and_double_parity() {
        let single = Rule::new("單");
        let odd = StandardAddress::new("1號");
        let even = StandardAddress::new("2號");
        assert!(single.matches(odd.address()));
        assert!(!single.matches(even.address()));

        let double = Rule::new("雙");
        assert!(double.matches(even.address()));
        assert!(!double.matches(odd.address()));
    }
}
