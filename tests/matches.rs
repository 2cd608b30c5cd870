// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

extern crate remex;

use remex::Regex;

fn find(re: &str, text: &str) -> Option<(usize, usize)> {
    Regex::new(re).unwrap().find(text)
}

fn find_all(re: &str, text: &str) -> Vec<(usize, usize)> {
    Regex::new(re).unwrap().find_iter(text).collect()
}

// A prefix with a small character class expands to complete literals and
// is answered by the multi-needle prefilter alone.
#[test]
fn prefix_class_literals() {
    assert_eq!(find("ag[act]gtaaa", "cagagtaaaz"), Some((1, 9)));
    assert_eq!(find("ag[act]gtaaa", "agcgtaaa"), Some((0, 8)));
    assert_eq!(find("ag[act]gtaaa", "aggtaaa"), None);
}

// An end-anchored suffix: scan for the suffix, expand left with the
// reverse automaton.
#[test]
fn end_anchored_suffix() {
    assert_eq!(find(r"\.php$", "index.html\nindex.php"), Some((16, 20)));
    assert_eq!(find(r"\.php$", "index.php\nindex.html"), None);
    assert_eq!(find(r"\.php$", ".php"), Some((0, 4)));
}

// An inner literal with wildcards on both sides: the candidate scan
// finds the literal, the reverse automaton finds the line start, the
// forward automaton the line end.
#[test]
fn inner_literal() {
    let text = "noise\nbefore connection after\nnoise";
    assert_eq!(find(".*connection.*", text), Some((6, 29)));
    assert_eq!(find(".*connection.*", "connection"), Some((0, 10)));
    assert_eq!(find(".*connection.*", "no such word"), None);
    // The dot must not cross line boundaries.
    assert_eq!(find(".*b.*", "a\nxby\nc"), Some((2, 5)));
}

// A three-word alternation becomes three complete needles.
#[test]
fn alternation_of_words() {
    let re = "(Wanderlust|Weltanschauung|Gestalt)";
    let text = "a Gestalt and Wanderlust";
    assert_eq!(find(re, text), Some((2, 9)));
    assert_eq!(find_all(re, text), vec![(2, 9), (14, 24)]);
    // The capture group reports the same bounds as the bypassed search.
    let caps = Regex::new(re).unwrap().captures(text).unwrap();
    assert_eq!(caps.pos(0), Some((2, 9)));
    assert_eq!(caps.at(1), Some("Gestalt"));
}

// An alternation with an empty branch: leftmost-first with one-step
// advancement on empty matches, and no empty match adjacent to the end
// of the previous one.
#[test]
fn empty_alternation_iteration() {
    assert_eq!(find_all("b|", "abc"), vec![(0, 0), (1, 2), (3, 3)]);
}

// Word boundaries evaluate as the XOR of word-ness on either side, with
// out-of-bounds counting as non-word.
#[test]
fn word_boundaries() {
    assert_eq!(find_all(r"\bword\b", "swordfish word wording"), vec![(10, 14)]);
    assert_eq!(find(r"\bsword\b", "swordfish sword"), Some((10, 15)));
    assert_eq!(find(r"\Bword\B", "swordfish"), Some((1, 5)));
}

#[test]
fn greedy_and_lazy() {
    assert_eq!(find("a+", "xaaay"), Some((1, 4)));
    assert_eq!(find("a+?", "xaaay"), Some((1, 2)));
    assert_eq!(find("<.*>", "<a><b>"), Some((0, 6)));
    assert_eq!(find("<.*?>", "<a><b>"), Some((0, 3)));
    assert_eq!(find("a|ab", "ab"), Some((0, 1)));
    assert_eq!(find("ab|a", "ab"), Some((0, 2)));
}

#[test]
fn anchors() {
    assert_eq!(find("^abc", "abcdef"), Some((0, 3)));
    assert_eq!(find("^abc", "zabc"), None);
    assert_eq!(find("c$", "abc"), Some((2, 3)));
    assert_eq!(find("c$", "cab"), None);
    assert_eq!(find("^$", ""), Some((0, 0)));
    assert_eq!(find("^$", "x"), None);
}

#[test]
fn multi_line_anchors() {
    let re = Regex::new("(?m)^ab").unwrap();
    let matches: Vec<_> = re.find_iter("ab\nzz\nab").collect();
    assert_eq!(matches, vec![(0, 2), (6, 8)]);
    let re = Regex::new("(?m)ab$").unwrap();
    let matches: Vec<_> = re.find_iter("ab\nzz\nab").collect();
    assert_eq!(matches, vec![(0, 2), (6, 8)]);
}

#[test]
fn case_insensitive() {
    let re = Regex::new("(?i)hello").unwrap();
    assert_eq!(re.find("say HeLLo!"), Some((4, 9)));
    let re = remex::RegexBuilder::new("hello")
        .case_insensitive(true)
        .build()
        .unwrap();
    assert_eq!(re.find("say HELLO!"), Some((4, 9)));
}

#[test]
fn dot_and_newline() {
    assert_eq!(find("a.c", "a\nc"), None);
    let re = Regex::new("(?s)a.c").unwrap();
    assert_eq!(re.find("a\nc"), Some((0, 3)));
}

#[test]
fn bounded_repetition() {
    assert_eq!(find("a{2,4}", "a"), None);
    assert_eq!(find("a{2,4}", "aaaaaa"), Some((0, 4)));
    assert_eq!(find("a{3}", "aaaa"), Some((0, 3)));
    assert_eq!(find("(ab){2,}", "ababab"), Some((0, 6)));
}

#[test]
fn unicode_haystacks() {
    assert_eq!(find("é+", "xééy"), Some((1, 5)));
    assert_eq!(find("∀x", "so ∀x holds"), Some((3, 7)));
    // A class spanning multi-byte code points.
    assert_eq!(find("[α-ω]+", "ab γδ cd"), Some((3, 7)));
}

#[test]
fn empty_pattern_iteration() {
    // An all-empty-matching pattern over n bytes yields n+1 matches.
    assert_eq!(
        find_all("", "abc"),
        vec![(0, 0), (1, 1), (2, 2), (3, 3)]
    );
    // Over multi-byte text, iteration steps by code point.
    assert_eq!(find_all("", "aé"), vec![(0, 0), (1, 1), (3, 3)]);
    assert_eq!(find_all("", ""), vec![(0, 0)]);
}

#[test]
fn leftmost_longest_mode() {
    let re = remex::RegexBuilder::new("a|ab").longest_match(true).build();
    let re = re.unwrap();
    assert_eq!(re.find("xab"), Some((1, 3)));
    let re = remex::RegexBuilder::new("a+|b")
        .longest_match(true)
        .build()
        .unwrap();
    assert_eq!(re.find("aaab"), Some((0, 3)));
}

#[test]
fn long_haystack_inner() {
    // Push the inner-literal strategy across a larger haystack.
    let mut text = String::new();
    for i in 0..200 {
        text.push_str(&format!("line number {} with filler\n", i));
    }
    text.push_str("the needle sits here\n");
    for i in 0..200 {
        text.push_str(&format!("more filler {}\n", i));
    }
    let re = Regex::new(".*needle.*").unwrap();
    let (s, e) = re.find(&text).unwrap();
    assert_eq!(&text[s..e], "the needle sits here");
}
