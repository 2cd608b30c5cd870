// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Candidate scanning ahead of the automata.
//!
//! A prefilter is chosen once per compiled regex from an extracted
//! literal sequence and exposes a single operation: find the next
//! position range that could begin (or, for suffix sequences, end) a
//! match. Unless the source sequence was complete, a candidate still has
//! to be verified by a real engine.

use bytes::{
    find_byte, find_byte2, find_byte3, find_substring, FingerprintSet,
    SubstringSearch, MAX_FINGERPRINT_NEEDLES,
};
use literal::Seq;

/// Needles this short gain nothing from rare-byte scanning; a plain
/// substring scan does.
const MAX_MEMMEM_LEN: usize = 3;

/// A prefilter compiled from a literal sequence.
///
/// `find` reports candidate ranges; `complete` reports whether a
/// candidate is already a confirmed match of the whole pattern.
#[derive(Clone, Debug)]
pub struct Prefilter {
    complete: bool,
    matcher: Matcher,
}

#[derive(Clone, Debug)]
enum Matcher {
    /// No usable literals. Never advances through the input.
    Empty,
    /// A single byte.
    Byte(u8),
    /// Two distinct bytes.
    Byte2(u8, u8),
    /// Three distinct bytes.
    Byte3(u8, u8, u8),
    /// One short needle, scanned directly.
    Memmem(Vec<u8>),
    /// One longer needle, scanned by its rarest byte.
    Substring(SubstringSearch),
    /// Up to eight needles behind a fingerprint table.
    Fingerprints(FingerprintSet),
}

impl Prefilter {
    /// A prefilter that never matches and never advances the input.
    pub fn none() -> Prefilter {
        Prefilter { complete: false, matcher: Matcher::Empty }
    }

    /// Select a prefilter for the given literal sequence.
    ///
    /// The selection mirrors the shape of the sequence: single bytes go
    /// to `memchr`-style scans, one longer needle goes to the rare-byte
    /// substring scan, small needle sets go to the fingerprint scanner,
    /// and anything bigger degrades to the longest common prefix. A
    /// sequence containing an empty literal constrains nothing and
    /// produces no prefilter.
    pub fn from_seq(seq: &Seq) -> Prefilter {
        if seq.is_empty() || seq.any_empty() {
            return Prefilter::none();
        }
        let complete = seq.all_complete();
        let lits = seq.literals();
        if lits.iter().all(|l| l.bytes.len() == 1) {
            let mut uniq: Vec<u8> = vec![];
            for lit in lits {
                if !uniq.contains(&lit.bytes[0]) {
                    uniq.push(lit.bytes[0]);
                }
            }
            return match uniq.len() {
                1 => Prefilter { complete: complete, matcher: Matcher::Byte(uniq[0]) },
                2 => Prefilter {
                    complete: complete,
                    matcher: Matcher::Byte2(uniq[0], uniq[1]),
                },
                3 => Prefilter {
                    complete: complete,
                    matcher: Matcher::Byte3(uniq[0], uniq[1], uniq[2]),
                },
                _ => Prefilter::none(),
            };
        }
        if lits.len() == 1 {
            let needle = lits[0].bytes.clone();
            let matcher = if needle.len() <= MAX_MEMMEM_LEN {
                Matcher::Memmem(needle)
            } else {
                Matcher::Substring(SubstringSearch::new(needle))
            };
            return Prefilter { complete: complete, matcher: matcher };
        }
        if lits.len() <= MAX_FINGERPRINT_NEEDLES
            && lits.iter().all(|l| l.bytes.len() >= 2)
        {
            let needles = lits.iter().map(|l| l.bytes.clone()).collect();
            return Prefilter {
                complete: complete,
                matcher: Matcher::Fingerprints(FingerprintSet::new(needles)),
            };
        }
        // Too many (or too ragged) literals. Minimizing drops literals
        // that extend shorter ones without changing the candidate set;
        // if that gets the count down, a fingerprint set still works,
        // though its extents no longer witness whole matches.
        let mut min = seq.clone();
        min.minimize();
        if min.len() <= MAX_FINGERPRINT_NEEDLES
            && min.literals().iter().all(|l| l.bytes.len() >= 2)
        {
            let needles =
                min.literals().iter().map(|l| l.bytes.clone()).collect();
            return Prefilter {
                complete: false,
                matcher: Matcher::Fingerprints(FingerprintSet::new(needles)),
            };
        }
        // Last resort: the common prefix, which can only ever locate
        // candidates.
        let lcp = seq.longest_common_prefix();
        if lcp.is_empty() {
            Prefilter::none()
        } else if lcp.len() == 1 {
            Prefilter { complete: false, matcher: Matcher::Byte(lcp[0]) }
        } else {
            Prefilter {
                complete: false,
                matcher: Matcher::Substring(SubstringSearch::new(lcp.to_vec())),
            }
        }
    }

    /// Returns true iff this prefilter has nothing to scan for.
    pub fn is_none(&self) -> bool {
        match self.matcher {
            Matcher::Empty => true,
            _ => false,
        }
    }

    /// Returns true iff every candidate this prefilter reports is a
    /// whole-pattern match on its own.
    pub fn complete(&self) -> bool {
        self.complete && !self.is_none()
    }

    /// Find the next candidate range in `haystack`, as offsets relative
    /// to the slice given.
    ///
    /// The range covers the located needle; for the degraded
    /// common-prefix form it covers only the shared prefix.
    pub fn find(&self, haystack: &[u8]) -> Option<(usize, usize)> {
        match self.matcher {
            Matcher::Empty => Some((0, 0)),
            Matcher::Byte(b) => find_byte(b, haystack).map(|i| (i, i + 1)),
            Matcher::Byte2(b1, b2) => {
                find_byte2(b1, b2, haystack).map(|i| (i, i + 1))
            }
            Matcher::Byte3(b1, b2, b3) => {
                find_byte3(b1, b2, b3, haystack).map(|i| (i, i + 1))
            }
            Matcher::Memmem(ref needle) => {
                find_substring(needle, haystack).map(|i| (i, i + needle.len()))
            }
            Matcher::Substring(ref s) => {
                s.find(haystack).map(|i| (i, i + s.needle().len()))
            }
            Matcher::Fingerprints(ref f) => f
                .find(haystack)
                .map(|(i, n)| (i, i + f.needles()[n].len())),
        }
    }

    /// The number of needles this prefilter scans for.
    pub fn len(&self) -> usize {
        match self.matcher {
            Matcher::Empty => 0,
            Matcher::Byte(_) | Matcher::Memmem(_) | Matcher::Substring(_) => {
                1
            }
            Matcher::Byte2(..) => 2,
            Matcher::Byte3(..) => 3,
            Matcher::Fingerprints(ref f) => f.needles().len(),
        }
    }

    /// Returns true iff scanning preserves alternation priority: among
    /// candidates starting at the same position, the first needle in
    /// priority order is reported.
    ///
    /// All current matchers verify needles in insertion order, so this
    /// holds whenever the prefilter exists at all. It is consulted by the
    /// literal bypass strategy.
    pub fn preserves_priority(&self) -> bool {
        !self.is_none()
    }
}

#[cfg(test)]
mod tests {
    use literal::{Literal, Seq};

    use super::Prefilter;

    fn seq(lits: &[&str], complete: bool) -> Seq {
        Seq::from_lits(
            lits.iter()
                .map(|s| Literal {
                    bytes: s.as_bytes().to_vec(),
                    complete: complete,
                })
                .collect(),
        )
    }

    #[test]
    fn selection() {
        assert!(Prefilter::from_seq(&Seq::empty()).is_none());

        let p = Prefilter::from_seq(&seq(&["a"], true));
        assert_eq!(p.len(), 1);
        assert!(p.complete());
        assert_eq!(p.find(b"xya"), Some((2, 3)));

        let p = Prefilter::from_seq(&seq(&["a", "b", "c"], true));
        assert_eq!(p.len(), 3);
        assert_eq!(p.find(b"zzcq"), Some((2, 3)));

        let p = Prefilter::from_seq(&seq(&["needle"], false));
        assert!(!p.complete());
        assert_eq!(p.find(b"hay needle hay"), Some((4, 10)));

        let p = Prefilter::from_seq(&seq(&["foo", "barbaz"], true));
        assert_eq!(p.len(), 2);
        assert_eq!(p.find(b"xx barbaz foo"), Some((3, 9)));
    }

    #[test]
    fn empty_literal_disables() {
        let p = Prefilter::from_seq(&seq(&["b", ""], true));
        assert!(p.is_none());
        assert!(!p.complete());
    }

    #[test]
    fn too_many_needles_degrades_to_lcp() {
        let lits: Vec<String> =
            (0..12).map(|i| format!("prefix{:02}", i)).collect();
        let refs: Vec<&str> = lits.iter().map(|s| &**s).collect();
        let p = Prefilter::from_seq(&seq(&refs, true));
        assert!(!p.complete());
        assert_eq!(p.find(b"zz prefix07"), Some((3, 9)));
    }
}
