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

use remex::{Engine, Error, NoExpand, Regex, RegexBuilder};

#[test]
fn error_messages_carry_prefix_and_pattern() {
    let err = Regex::new("a(b").unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("regexp: "), "bad prefix: {}", msg);
    assert!(msg.contains("a(b"), "pattern missing: {}", msg);

    let err = RegexBuilder::new("a").max_dfa_states(0).build().unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("regexp: "), "bad prefix: {}", msg);
    match err {
        Error::InvalidOption { name, .. } => assert_eq!(name, "max_dfa_states"),
        err => panic!("expected InvalidOption, got {:?}", err),
    }
}

#[test]
fn unsupported_dfa_only_word_boundary() {
    let err = RegexBuilder::new(r"\bx\b")
        .engine(Engine::DfaOnly)
        .build()
        .unwrap_err();
    match err {
        Error::Unsupported(ref msg) => assert!(
            msg.contains("Unicode word boundary"),
            "unexpected reason: {}",
            msg
        ),
        err => panic!("expected Unsupported, got {:?}", err),
    }
}

#[test]
#[should_panic(expected = "regexp: ")]
fn must_compile_panics_with_error_string() {
    Regex::must_compile("a(b");
}

#[test]
fn replacement() {
    let re = Regex::new("[0-9]+").unwrap();
    assert_eq!(re.replace("age 41, height 180", "N"), "age N, height 180");
    assert_eq!(re.replace_all("age 41, height 180", "N"), "age N, height N");
    assert_eq!(re.replacen("1 2 3", 2, "x"), "x x 3");

    let re = Regex::new("(a+)(b+)").unwrap();
    assert_eq!(re.replace_all("aab abb", "$2-$1"), "b-aa bb-a");
    assert_eq!(re.replace_all("ab", NoExpand("$1")), "$1");
    assert_eq!(
        re.replace_all("ab aab", |caps: &remex::Captures| {
            format!("<{}>", caps.at(1).unwrap().len())
        }),
        "<1> <2>"
    );
}

#[test]
fn replacement_of_empty_matches_advances() {
    let re = Regex::new("b|").unwrap();
    // Matches are [0,0) "a.." then [1,2) "b" then [3,3): no looping.
    assert_eq!(re.replace_all("abc", "-"), "-a-c-");
}

#[test]
fn split_and_splitn() {
    let re = Regex::new(",").unwrap();
    let fields: Vec<_> = re.split("a,b,c").collect();
    assert_eq!(fields, vec!["a", "b", "c"]);
    let fields: Vec<_> = re.split("a,b,").collect();
    assert_eq!(fields, vec!["a", "b", ""]);
    let fields: Vec<_> = re.split("").collect();
    assert_eq!(fields, vec![""]);

    let re = Regex::new(" +").unwrap();
    let fields: Vec<_> = re.splitn("one  two   three", 2).collect();
    assert_eq!(fields, vec!["one", "two   three"]);
    let fields: Vec<_> = re.splitn("one", 3).collect();
    assert_eq!(fields, vec!["one"]);
}

#[test]
fn capture_names_exposed() {
    let re = Regex::new(r"(?P<year>[0-9]{4})-([0-9]{2})").unwrap();
    let names = re.capture_names();
    assert_eq!(names.len(), 3);
    assert_eq!(names[0], None);
    assert_eq!(names[1], Some("year".to_string()));
    assert_eq!(names[2], None);
    assert_eq!(re.captures_len(), 3);

    let caps = re.captures("on 2010-03").unwrap();
    assert_eq!(caps.name("year"), Some("2010"));
    assert_eq!(caps.at(2), Some("03"));
}

#[test]
fn unmatched_groups_are_absent() {
    let re = Regex::new("(a)|(b)").unwrap();
    let caps = re.captures("b").unwrap();
    assert_eq!(caps.pos(0), Some((0, 1)));
    assert_eq!(caps.pos(1), None);
    assert_eq!(caps.pos(2), Some((0, 1)));
    assert_eq!(caps.at(1), None);
}

#[test]
fn count_matches() {
    let re = Regex::new("a").unwrap();
    assert_eq!(re.find_iter("ababa").count(), 3);
    assert_eq!(re.find_iter("").count(), 0);
}

#[test]
fn iterators_are_restartable() {
    let re = Regex::new("a").unwrap();
    let first: Vec<_> = re.find_iter("a a").collect();
    let second: Vec<_> = re.find_iter("a a").collect();
    assert_eq!(first, second);
}

#[test]
fn regex_is_shareable_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let re = Arc::new(Regex::new("ab+c").unwrap());
    let mut handles = vec![];
    for i in 0..4 {
        let re = re.clone();
        handles.push(thread::spawn(move || {
            let text = format!("{} abbbc {}", i, i);
            re.find(&text).unwrap()
        }));
    }
    for h in handles {
        let (s, e) = h.join().unwrap();
        assert_eq!(e - s, 5);
    }
}

#[test]
fn display_and_from_str() {
    let re = Regex::new("a+b").unwrap();
    assert_eq!(re.to_string(), "a+b");
    assert_eq!(re.as_str(), "a+b");
    let re: Regex = "xy*".parse().unwrap();
    assert!(re.is_match("x"));
}

#[test]
fn builder_options_compose() {
    let re = RegexBuilder::new("hello.world")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .unwrap();
    assert!(re.is_match("HELLO\nWORLD"));

    // Tiny caches only make the engine fall back, never fail.
    let re = RegexBuilder::new("[ab]+c")
        .max_dfa_states(2)
        .build()
        .unwrap();
    let text: String = "ab".chars().cycle().take(300).collect::<String>() + "c";
    assert_eq!(re.find(&text), Some((0, 301)));
}

#[test]
fn size_limit_is_a_compile_error() {
    let err = RegexBuilder::new("a{200}").size_limit(64).build();
    match err {
        Err(Error::CompiledTooBig { limit, .. }) => assert_eq!(limit, 64),
        other => panic!("expected CompiledTooBig, got {:?}", other),
    }
}
