// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Literal sequences and their extraction from a parsed expression.
//!
//! A `Seq` is an ordered set of byte-string literals, each flagged
//! `complete` when the literal is exactly what a match looks like at its
//! position (no operator can extend it). The extractor walks the parsed
//! expression and produces three independent sequences: literals every
//! match must start with, literals every match must end with, and
//! literals every match must contain somewhere in its middle. The
//! prefilters are built from these.
//!
//! The central invariant: every operation that can reduce precision
//! (truncation, budget overflow, extension stops) marks literals
//! incomplete, and no operation ever extends an incomplete literal.

use std::mem;

use syntax::{Expr, Repeater};

/// A single extracted literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    /// The literal bytes.
    pub bytes: Vec<u8>,
    /// True when a match of these bytes at this literal's position is a
    /// full match of the expression the literal was extracted from.
    pub complete: bool,
}

impl Literal {
    fn new(bytes: Vec<u8>) -> Literal {
        Literal { bytes: bytes, complete: true }
    }

    fn empty() -> Literal {
        Literal::new(vec![])
    }
}

/// An ordered sequence of literals.
///
/// An empty sequence carries no literal information at all. A sequence
/// containing an empty literal says "the empty prefix is possible", i.e.
/// anything goes, which disqualifies it from prefiltering but not from
/// completeness reasoning. Operations preserve insertion order, which is
/// also alternation priority order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seq {
    lits: Vec<Literal>,
}

impl Seq {
    /// A sequence with no literal information.
    pub fn empty() -> Seq {
        Seq { lits: vec![] }
    }

    /// The identity for concatenation: one empty, complete literal.
    pub fn seed() -> Seq {
        Seq { lits: vec![Literal::empty()] }
    }

    fn singleton(lit: Literal) -> Seq {
        Seq { lits: vec![lit] }
    }

    /// Build a sequence from explicit literals, in priority order.
    pub fn from_lits(lits: Vec<Literal>) -> Seq {
        Seq { lits: lits }
    }

    /// Returns true when this sequence carries no information.
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// The number of literals.
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// The literals, in priority order.
    pub fn literals(&self) -> &[Literal] {
        &self.lits
    }

    /// True iff the sequence is non-empty and every literal is complete.
    pub fn all_complete(&self) -> bool {
        !self.lits.is_empty() && self.lits.iter().all(|l| l.complete)
    }

    /// True iff some literal has no bytes.
    pub fn any_empty(&self) -> bool {
        self.lits.iter().any(|l| l.bytes.is_empty())
    }

    /// Mark every literal incomplete.
    pub fn make_incomplete(&mut self) {
        for lit in &mut self.lits {
            lit.complete = false;
        }
    }

    fn push(&mut self, lit: Literal) {
        self.lits.push(lit);
    }

    /// Concatenation cross product. Complete literals are extended by
    /// every literal of `other`; incomplete literals pass through
    /// unchanged, since an inexact literal cannot be extended. If `other`
    /// is empty this sequence is unchanged; if this sequence is empty the
    /// result stays empty.
    pub fn cross_forward(&mut self, other: &Seq) {
        if self.lits.is_empty() || other.lits.is_empty() {
            return;
        }
        let orig = mem::replace(&mut self.lits, vec![]);
        for a in orig {
            if !a.complete {
                self.lits.push(a);
                continue;
            }
            for b in &other.lits {
                let mut bytes = a.bytes.clone();
                bytes.extend_from_slice(&b.bytes);
                self.lits.push(Literal {
                    bytes: bytes,
                    complete: b.complete,
                });
            }
        }
        self.dedup();
    }

    /// The suffix mirror of `cross_forward`: literals of `other` are
    /// prepended to every complete literal of this sequence.
    pub fn cross_reverse(&mut self, other: &Seq) {
        if self.lits.is_empty() || other.lits.is_empty() {
            return;
        }
        let orig = mem::replace(&mut self.lits, vec![]);
        for a in orig {
            if !a.complete {
                self.lits.push(a);
                continue;
            }
            for b in &other.lits {
                let mut bytes = b.bytes.clone();
                bytes.extend_from_slice(&a.bytes);
                self.lits.push(Literal {
                    bytes: bytes,
                    complete: b.complete,
                });
            }
        }
        self.dedup();
    }

    /// Truncate every literal to its first `n` bytes. Truncated literals
    /// become incomplete.
    pub fn keep_first_bytes(&mut self, n: usize) {
        for lit in &mut self.lits {
            if lit.bytes.len() > n {
                lit.bytes.truncate(n);
                lit.complete = false;
            }
        }
    }

    /// Truncate every literal to its last `n` bytes. Truncated literals
    /// become incomplete.
    pub fn keep_last_bytes(&mut self, n: usize) {
        for lit in &mut self.lits {
            if lit.bytes.len() > n {
                let start = lit.bytes.len() - n;
                lit.bytes = lit.bytes.split_off(start);
                lit.complete = false;
            }
        }
    }

    /// Remove duplicate byte sequences, keeping the first occurrence's
    /// `complete` flag.
    pub fn dedup(&mut self) {
        let orig = mem::replace(&mut self.lits, vec![]);
        for lit in orig {
            if self.lits.iter().any(|l| l.bytes == lit.bytes) {
                continue;
            }
            self.lits.push(lit);
        }
    }

    /// Sort by length ascending and drop every literal that has a
    /// shorter literal as a proper prefix. The set of byte strings that
    /// start with some member is unchanged.
    pub fn minimize(&mut self) {
        let mut orig = mem::replace(&mut self.lits, vec![]);
        orig.sort_by(|a, b| {
            a.bytes.len().cmp(&b.bytes.len()).then(a.bytes.cmp(&b.bytes))
        });
        for lit in orig {
            let redundant = self.lits.iter().any(|k| {
                k.bytes.len() < lit.bytes.len()
                    && lit.bytes.starts_with(&k.bytes)
            });
            if !redundant {
                self.lits.push(lit);
            }
        }
    }

    /// The longest byte prefix shared by all literals.
    pub fn longest_common_prefix(&self) -> &[u8] {
        let mut lcp: &[u8] = match self.lits.first() {
            None => return &[],
            Some(lit) => &lit.bytes,
        };
        for lit in &self.lits[1..] {
            let mut len = 0;
            for (a, b) in lcp.iter().zip(&lit.bytes) {
                if a != b {
                    break;
                }
                len += 1;
            }
            lcp = &lcp[..len];
        }
        lcp
    }

    /// The longest byte suffix shared by all literals.
    pub fn longest_common_suffix(&self) -> &[u8] {
        let mut lcs: &[u8] = match self.lits.first() {
            None => return &[],
            Some(lit) => &lit.bytes,
        };
        for lit in &self.lits[1..] {
            let mut len = 0;
            for (a, b) in lcs.iter().rev().zip(lit.bytes.iter().rev()) {
                if a != b {
                    break;
                }
                len += 1;
            }
            lcs = &lcs[lcs.len() - len..];
        }
        lcs
    }
}

/// Budgets for literal extraction.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Hard cap on the number of literals in a sequence.
    pub max_literals: usize,
    /// Cap on the byte length of a single literal.
    pub max_literal_len: usize,
    /// Largest character class that is expanded into literals.
    pub max_class_size: usize,
    /// Largest cross product computed before overflow handling kicks in.
    pub cross_product_limit: usize,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_literals: 32,
            max_literal_len: 15,
            max_class_size: 10,
            cross_product_limit: 250,
        }
    }
}

/// The result of inner-literal extraction: literals every match must
/// contain, plus the two halves of the expression around them.
#[derive(Clone, Debug)]
pub struct Inner {
    /// The required middle literals. Always incomplete.
    pub lits: Seq,
    /// The expression up to (excluding) the literal-bearing element.
    pub prefix: Expr,
    /// The expression from (including) the literal-bearing element.
    pub suffix: Expr,
}

/// Maximum expression nesting the extractor follows before giving up.
const MAX_DEPTH: usize = 100;

/// How many leading/trailing bytes survive overflow handling.
const OVERFLOW_KEEP: usize = 4;

/// Walks a parsed expression and extracts literal sequences.
#[derive(Clone, Debug)]
pub struct Extractor {
    limits: Limits,
}

impl Extractor {
    /// Create an extractor with the given budgets.
    pub fn new(limits: Limits) -> Extractor {
        Extractor { limits: limits }
    }

    /// Literals every match of `expr` must start with.
    pub fn prefixes(&self, expr: &Expr) -> Seq {
        self.prefixes_at(expr, 0)
    }

    /// Literals every match of `expr` must end with.
    pub fn suffixes(&self, expr: &Expr) -> Seq {
        self.suffixes_at(expr, 0)
    }

    fn prefixes_at(&self, expr: &Expr, depth: usize) -> Seq {
        if depth > MAX_DEPTH {
            return Seq::empty();
        }
        let concat = concat_of(expr);
        let mut acc = Seq::seed();
        let mut contributed = false;
        let mut skipping_anchors = true;
        for e in concat {
            if skipping_anchors && is_start_anchor(e) {
                continue;
            }
            skipping_anchors = false;
            match self.contribution(e, depth + 1, false) {
                None => {
                    acc.make_incomplete();
                    break;
                }
                Some(seq) => {
                    if acc.len() * seq.len() > self.limits.cross_product_limit
                    {
                        self.overflow(&mut acc);
                        break;
                    }
                    acc.cross_forward(&seq);
                    contributed = true;
                    if acc.len() > self.limits.max_literals {
                        self.overflow(&mut acc);
                        break;
                    }
                }
            }
        }
        if !contributed {
            return Seq::empty();
        }
        acc
    }

    fn suffixes_at(&self, expr: &Expr, depth: usize) -> Seq {
        if depth > MAX_DEPTH {
            return Seq::empty();
        }
        let concat = concat_of(expr);
        let mut acc = Seq::seed();
        let mut contributed = false;
        let mut skipping_anchors = true;
        for e in concat.iter().rev() {
            if skipping_anchors && is_end_anchor(e) {
                continue;
            }
            skipping_anchors = false;
            match self.contribution(e, depth + 1, true) {
                None => {
                    acc.make_incomplete();
                    break;
                }
                Some(seq) => {
                    if acc.len() * seq.len() > self.limits.cross_product_limit
                    {
                        self.overflow_suffix(&mut acc);
                        break;
                    }
                    acc.cross_reverse(&seq);
                    contributed = true;
                    if acc.len() > self.limits.max_literals {
                        self.overflow_suffix(&mut acc);
                        break;
                    }
                }
            }
        }
        if !contributed {
            return Seq::empty();
        }
        acc
    }

    /// The literal sequence contributed by a single sub-expression, or
    /// `None` when the sub-expression cannot constrain matches to a
    /// bounded literal set. `suffix` selects which end truncation keeps.
    fn contribution(
        &self,
        expr: &Expr,
        depth: usize,
        suffix: bool,
    ) -> Option<Seq> {
        if depth > MAX_DEPTH {
            return None;
        }
        match *expr {
            Expr::Empty => Some(Seq::seed()),
            Expr::Literal { ref chars, casei } => {
                // The prefilters compare bytes exactly, so a case
                // insensitive literal contributes nothing.
                if casei {
                    return None;
                }
                let mut bytes = vec![];
                for &c in chars {
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(encode_utf8(c, &mut buf));
                }
                Some(self.bounded_literal(bytes, suffix))
            }
            Expr::LiteralBytes { ref bytes, casei } => {
                if casei {
                    return None;
                }
                Some(self.bounded_literal(bytes.clone(), suffix))
            }
            Expr::Class(ref cls) => {
                let count: u32 = cls
                    .iter()
                    .map(|r| 1 + (r.end as u32) - (r.start as u32))
                    .sum();
                if count as usize > self.limits.max_class_size {
                    return None;
                }
                let mut seq = Seq::empty();
                for r in cls.iter() {
                    let mut c = r.start as u32;
                    while c <= r.end as u32 {
                        let ch = match ::std::char::from_u32(c) {
                            None => return None,
                            Some(ch) => ch,
                        };
                        let mut buf = [0u8; 4];
                        let enc = encode_utf8(ch, &mut buf).to_vec();
                        seq.push(Literal::new(enc));
                        c += 1;
                    }
                }
                Some(seq)
            }
            Expr::ClassBytes(ref cls) => {
                let count: u32 = cls
                    .iter()
                    .map(|r| 1 + (r.end as u32) - (r.start as u32))
                    .sum();
                if count as usize > self.limits.max_class_size {
                    return None;
                }
                let mut seq = Seq::empty();
                for r in cls.iter() {
                    for b in r.start..=r.end {
                        seq.push(Literal::new(vec![b]));
                    }
                }
                Some(seq)
            }
            Expr::Group { ref e, .. } => self.contribution(e, depth + 1, suffix),
            Expr::Concat(_) => {
                let seq = if suffix {
                    self.suffixes_at(expr, depth + 1)
                } else {
                    self.prefixes_at(expr, depth + 1)
                };
                if seq.is_empty() {
                    None
                } else {
                    Some(seq)
                }
            }
            Expr::Alternate(ref es) => {
                let mut union = Seq::empty();
                for branch in es {
                    let bseq = if suffix {
                        self.suffixes_at(branch, depth + 1)
                    } else {
                        self.prefixes_at(branch, depth + 1)
                    };
                    if bseq.is_empty() {
                        return None;
                    }
                    for lit in bseq.literals() {
                        union.push(lit.clone());
                    }
                    if union.len() > self.limits.max_literals {
                        return None;
                    }
                }
                union.dedup();
                Some(union)
            }
            Expr::Repeat { ref e, r, .. } => {
                let min = match r {
                    Repeater::ZeroOrOne | Repeater::ZeroOrMore => 0,
                    Repeater::OneOrMore => 1,
                    Repeater::Range { min, .. } => min,
                };
                if min == 0 {
                    return None;
                }
                self.contribution(e, depth + 1, suffix).map(|mut seq| {
                    seq.make_incomplete();
                    seq
                })
            }
            _ => None,
        }
    }

    /// Finds a required middle literal: the first concatenation position
    /// flanked by wildcard or repetition elements on both sides. The
    /// returned halves are clones of the original expression slices; the
    /// reverse-inner strategy compiles automata from them.
    pub fn inner(&self, expr: &Expr) -> Option<Inner> {
        let es = match *expr {
            Expr::Concat(ref es) if es.len() >= 3 => es,
            _ => return None,
        };
        for i in 1..es.len() - 1 {
            if !es[..i].iter().any(is_wild) {
                continue;
            }
            if !es[i + 1..].iter().any(is_wild) {
                return None;
            }
            let mut lits = match self.contribution(&es[i], 0, false) {
                None => continue,
                Some(lits) => lits,
            };
            if lits.is_empty() || lits.any_empty() {
                continue;
            }
            // A middle literal never witnesses the whole match.
            lits.make_incomplete();
            return Some(Inner {
                lits: lits,
                prefix: Expr::Concat(es[..i].to_vec()),
                suffix: Expr::Concat(es[i..].to_vec()),
            });
        }
        None
    }

    fn bounded_literal(&self, mut bytes: Vec<u8>, suffix: bool) -> Seq {
        let mut lit = Literal::new(vec![]);
        if bytes.len() > self.limits.max_literal_len {
            if suffix {
                let start = bytes.len() - self.limits.max_literal_len;
                bytes = bytes.split_off(start);
            } else {
                bytes.truncate(self.limits.max_literal_len);
            }
            lit.complete = false;
        }
        lit.bytes = bytes;
        Seq::singleton(lit)
    }

    fn overflow(&self, acc: &mut Seq) {
        acc.keep_first_bytes(OVERFLOW_KEEP);
        acc.make_incomplete();
        acc.dedup();
        acc.lits.truncate(self.limits.max_literals);
    }

    fn overflow_suffix(&self, acc: &mut Seq) {
        acc.keep_last_bytes(OVERFLOW_KEEP);
        acc.make_incomplete();
        acc.dedup();
        acc.lits.truncate(self.limits.max_literals);
    }
}

fn concat_of(expr: &Expr) -> &[Expr] {
    match *expr {
        Expr::Concat(ref es) => es,
        ref e => ::std::slice::from_ref(e),
    }
}

fn is_start_anchor(expr: &Expr) -> bool {
    match *expr {
        Expr::StartText | Expr::StartLine => true,
        _ => false,
    }
}

fn is_end_anchor(expr: &Expr) -> bool {
    match *expr {
        Expr::EndText | Expr::EndLine => true,
        _ => false,
    }
}

fn is_wild(expr: &Expr) -> bool {
    match *expr {
        Expr::Repeat { .. }
        | Expr::AnyChar
        | Expr::AnyCharNoNL
        | Expr::AnyByte
        | Expr::AnyByteNoNL => true,
        _ => false,
    }
}

/// Encode `c` as UTF-8 into `buf` and return the encoded slice.
pub fn encode_utf8(c: char, buf: &mut [u8; 4]) -> &[u8] {
    c.encode_utf8(buf).as_bytes()
}

#[cfg(test)]
mod tests {
    use syntax::ExprBuilder;

    use super::{Extractor, Limits, Literal, Seq};

    fn extract(re: &str) -> Seq {
        let expr = ExprBuilder::new().parse(re).unwrap();
        Extractor::new(Limits::default()).prefixes(&expr)
    }

    fn extract_suffix(re: &str) -> Seq {
        let expr = ExprBuilder::new().parse(re).unwrap();
        Extractor::new(Limits::default()).suffixes(&expr)
    }

    fn strings(seq: &Seq) -> Vec<String> {
        seq.literals()
            .iter()
            .map(|l| String::from_utf8(l.bytes.clone()).unwrap())
            .collect()
    }

    macro_rules! prefixes {
        ($re:expr) => {{
            let seq = extract($re);
            assert!(!seq.all_complete(), "expected incomplete: {}", $re);
            strings(&seq)
        }};
    }
    macro_rules! prefixes_complete {
        ($re:expr) => {{
            let seq = extract($re);
            assert!(seq.all_complete(), "expected complete: {}", $re);
            strings(&seq)
        }};
    }

    #[test]
    fn single() {
        assert_eq!(prefixes_complete!("a"), vec!["a"]);
        assert_eq!(prefixes_complete!("[a]"), vec!["a"]);
        assert_eq!(prefixes!("a+"), vec!["a"]);
        assert_eq!(prefixes!("(?:a)+"), vec!["a"]);
        assert_eq!(prefixes!("(a)+"), vec!["a"]);
    }

    #[test]
    fn single_alt() {
        assert_eq!(prefixes_complete!("a|b"), vec!["a", "b"]);
        assert_eq!(prefixes_complete!("b|a"), vec!["b", "a"]);
        assert_eq!(prefixes_complete!("[a]|[b]"), vec!["a", "b"]);
        assert_eq!(prefixes!("a+|b"), vec!["a", "b"]);
        assert_eq!(prefixes!("a|b+"), vec!["a", "b"]);
    }

    #[test]
    fn many() {
        assert_eq!(prefixes_complete!("abcdef"), vec!["abcdef"]);
        assert_eq!(prefixes!("abcdef+"), vec!["abcdef"]);
        assert_eq!(prefixes!("(?:abcdef)+"), vec!["abcdef"]);
    }

    #[test]
    fn many_alt() {
        assert_eq!(prefixes_complete!("abc|def"), vec!["abc", "def"]);
        assert_eq!(prefixes_complete!("def|abc"), vec!["def", "abc"]);
        assert_eq!(prefixes!("abc+|def"), vec!["abc", "def"]);
    }

    #[test]
    fn class() {
        assert_eq!(prefixes_complete!("[0-9]"), vec![
            "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
        ]);
        assert_eq!(prefixes!("[0-9]+"), vec![
            "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
        ]);
    }

    #[test]
    fn factored_class_expands() {
        // The parser may factor `bar|baz` into `ba[rz]`; the cross
        // product restores the full literals either way.
        assert_eq!(prefixes_complete!("ba[rz]"), vec!["bar", "baz"]);
        assert_eq!(prefixes_complete!("bar|baz"), vec!["bar", "baz"]);
        assert_eq!(
            prefixes_complete!("ag[act]gtaaa"),
            vec!["agagtaaa", "agcgtaaa", "agtgtaaa"]
        );
    }

    #[test]
    fn preceding_alt() {
        assert_eq!(prefixes!("(?:a|b).+"), vec!["a", "b"]);
        assert_eq!(prefixes!("(a|b).+"), vec!["a", "b"]);
    }

    #[test]
    fn nested_alt() {
        assert_eq!(prefixes_complete!("(a|b|c|d)"), vec!["a", "b", "c", "d"]);
        assert_eq!(
            prefixes_complete!("((a|b)|(c|d))"),
            vec!["a", "b", "c", "d"]
        );
    }

    #[test]
    fn anchors_and_wildcards() {
        assert_eq!(prefixes!("^abc$"), vec!["abc"]);
        assert!(extract(".*").is_empty());
        assert!(extract("a*").is_empty());
        assert_eq!(prefixes!("abc.*"), vec!["abc"]);
        assert!(extract("(?i)abc").is_empty());
    }

    #[test]
    fn empty_alternate_branch() {
        let seq = extract("b|");
        assert!(seq.all_complete());
        assert!(seq.any_empty());
        assert_eq!(strings(&seq), vec!["b", ""]);
    }

    #[test]
    fn suffixes_basic() {
        assert_eq!(strings(&extract_suffix("abc")), vec!["abc"]);
        let seq = extract_suffix(r"\.php$");
        assert!(seq.all_complete());
        assert_eq!(strings(&seq), vec![".php"]);
        // Extension happens on the left.
        assert_eq!(strings(&extract_suffix("ab(c|d)")), vec!["abc", "abd"]);
        // A leading wildcard leaves the suffix intact.
        let seq = extract_suffix(".*xyz");
        assert!(!seq.all_complete());
        assert_eq!(strings(&seq), vec!["xyz"]);
    }

    #[test]
    fn inner_extraction() {
        let expr = ExprBuilder::new().parse(".*connection.*").unwrap();
        let inner = Extractor::new(Limits::default()).inner(&expr).unwrap();
        assert_eq!(strings(&inner.lits), vec!["connection"]);
        assert!(!inner.lits.all_complete());
        assert!(Extractor::new(Limits::default())
            .inner(&ExprBuilder::new().parse("abc").unwrap())
            .is_none());
        assert!(Extractor::new(Limits::default())
            .inner(&ExprBuilder::new().parse("abc.*").unwrap())
            .is_none());
    }

    #[test]
    fn cross_forward_semantics() {
        let mut s = Seq::seed();
        s.cross_forward(&seq_of(&[("a", true), ("b", false)]));
        assert_eq!(
            s,
            seq_of(&[("a", true), ("b", false)])
        );
        // An incomplete literal is never extended.
        s.cross_forward(&seq_of(&[("x", true)]));
        assert_eq!(s, seq_of(&[("ax", true), ("b", false)]));
        // Crossing with an empty Seq is the identity.
        let before = s.clone();
        s.cross_forward(&Seq::empty());
        assert_eq!(s, before);
    }

    #[test]
    fn minimize_drops_extensions() {
        let mut s = seq_of(&[("abc", true), ("ab", true), ("zz", true)]);
        s.minimize();
        assert_eq!(s, seq_of(&[("ab", true), ("zz", true)]));
    }

    #[test]
    fn dedup_keeps_first_flag() {
        let mut s = seq_of(&[("ab", false), ("ab", true)]);
        s.dedup();
        assert_eq!(s, seq_of(&[("ab", false)]));
    }

    #[test]
    fn truncation_marks_incomplete() {
        let mut s = seq_of(&[("abcd", true), ("ab", true)]);
        s.keep_first_bytes(3);
        assert_eq!(s, seq_of(&[("abc", false), ("ab", true)]));
        let mut s = seq_of(&[("abcd", true)]);
        s.keep_last_bytes(2);
        assert_eq!(s, seq_of(&[("cd", false)]));
    }

    #[test]
    fn common_prefix_suffix() {
        let s = seq_of(&[("abcx", true), ("abcy", true), ("abz", true)]);
        assert_eq!(s.longest_common_prefix(), b"ab");
        let s = seq_of(&[("xba", true), ("yba", true)]);
        assert_eq!(s.longest_common_suffix(), b"ba");
        assert_eq!(Seq::empty().longest_common_prefix(), b"");
    }

    fn seq_of(lits: &[(&str, bool)]) -> Seq {
        let mut seq = Seq::empty();
        for &(s, complete) in lits {
            seq.push(Literal {
                bytes: s.as_bytes().to_vec(),
                complete: complete,
            });
        }
        seq
    }
}
