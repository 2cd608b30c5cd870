// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Strategy parity: whatever composition of engines the selector picks,
// the answers must be the ones the Pike VM gives.

extern crate rand;
extern crate remex;

use rand::{Rng, SeedableRng, XorShiftRng};
use remex::{Engine, Regex, RegexBuilder};

const PATTERNS: &'static [&'static str] = &[
    "a",
    "ab",
    "a+",
    "a*b",
    "a|ab",
    "ab|a",
    "a?b?",
    "[ab]+",
    "a+b+",
    "(a|b)+",
    "^a",
    "a$",
    "(?m)^a",
    "(?m)a$",
    ".*b.*",
    "a.*?b",
    r"\ba\b",
    "b|",
    "(a+)(b+)",
    "a{2,3}",
    "x|ab|b",
];

const HAYSTACKS: &'static [&'static str] = &[
    "",
    "a",
    "b",
    "ab",
    "ba",
    "aabb",
    "abab",
    "xxabxx",
    "a b ab",
    "a\nab\nb",
    "\n\n",
    "bbbbbbbbbbbbbbbbab",
    "aaaaaaaaaaaaaaaaaa",
];

fn auto(re: &str) -> Regex {
    Regex::new(re).unwrap()
}

fn vm(re: &str) -> Regex {
    RegexBuilder::new(re).engine(Engine::VmOnly).build().unwrap()
}

fn assert_same(re: &str, text: &str) {
    let a = auto(re);
    let v = vm(re);
    assert_eq!(
        a.find(text),
        v.find(text),
        "find mismatch: pattern {:?}, text {:?}",
        re,
        text
    );
    let am: Vec<_> = a.find_iter(text).collect();
    let vmm: Vec<_> = v.find_iter(text).collect();
    assert_eq!(
        am, vmm,
        "find_iter mismatch: pattern {:?}, text {:?}",
        re, text
    );
    let ac = a.captures(text);
    let vc = v.captures(text);
    match (ac, vc) {
        (None, None) => {}
        (Some(ac), Some(vc)) => {
            assert_eq!(ac.len(), vc.len());
            for i in 0..ac.len() {
                assert_eq!(
                    ac.pos(i),
                    vc.pos(i),
                    "capture {} mismatch: pattern {:?}, text {:?}",
                    i,
                    re,
                    text
                );
            }
        }
        (ac, vc) => panic!(
            "captures mismatch: pattern {:?}, text {:?}: auto {:?}, \
             vm {:?}",
            re,
            text,
            ac.map(|c| c.pos(0)),
            vc.map(|c| c.pos(0))
        ),
    }
}

#[test]
fn fixed_haystacks() {
    for re in PATTERNS {
        for text in HAYSTACKS {
            assert_same(re, text);
        }
    }
}

#[test]
fn random_haystacks() {
    let alphabet: Vec<char> = vec!['a', 'b', 'x', ' ', '\n'];
    let mut rng = XorShiftRng::from_seed([0x193a, 0x6754, 0xa8a7, 0xd469]);
    for _ in 0..200 {
        let len = rng.gen_range(0, 40);
        let text: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0, alphabet.len())])
            .collect();
        for re in PATTERNS {
            assert_same(re, &text);
        }
    }
}

#[test]
fn dfa_only_agrees_with_vm() {
    // Patterns the DFA can run end to end (no Unicode word boundaries).
    let patterns =
        &["a", "a+", "a|ab", "a*b", "(a|b)+", "^a", "a$", "b|", "[ab]{2,4}"];
    for re in patterns {
        let d = RegexBuilder::new(re)
            .engine(Engine::DfaOnly)
            .build()
            .unwrap();
        let v = vm(re);
        for text in HAYSTACKS {
            assert_eq!(
                d.find(text),
                v.find(text),
                "dfa/vm mismatch: pattern {:?}, text {:?}",
                re,
                text
            );
        }
    }
}

#[test]
fn is_match_iff_find() {
    for re in PATTERNS {
        let a = auto(re);
        for text in HAYSTACKS {
            assert_eq!(
                a.is_match(text),
                a.find(text).is_some(),
                "is_match/find mismatch: pattern {:?}, text {:?}",
                re,
                text
            );
        }
    }
}

#[test]
fn iteration_never_overlaps_and_terminates() {
    for re in PATTERNS {
        let a = auto(re);
        for text in HAYSTACKS {
            let matches: Vec<_> = a.find_iter(text).collect();
            let mut prev_end = None;
            for &(s, e) in &matches {
                assert!(s <= e && e <= text.len());
                if let Some(pe) = prev_end {
                    assert!(
                        s >= pe,
                        "overlapping matches for {:?} on {:?}: {:?}",
                        re,
                        text,
                        matches
                    );
                }
                prev_end = Some(e);
            }
        }
    }
}
