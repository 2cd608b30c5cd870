// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A multi-engine regular expression library with worst-case linear
//! search time.
//!
//! Every search runs in time linear in the length of the haystack and in
//! bounded memory, no matter how adversarial the pattern or the input.
//! Behind the single [`Regex`](struct.Regex.html) type sit several
//! matching engines:
//!
//! * a Pike VM that simulates the compiled NFA with capture tracking,
//! * a bounded backtracker for small program/input products,
//! * a lazy DFA that builds its transition table on demand inside a
//!   bounded state cache, and
//! * a literal prefiltering layer that scans for required bytes,
//!   substrings or small needle sets before any automaton runs.
//!
//! A strategy selector inspects each compiled pattern once and binds it to
//! the composition of engines that answers searches fastest: pure literal
//! scanning when the pattern *is* its literals, reverse searches for
//! `$`-anchored and `.*needle.*` patterns, prefilter-accelerated DFA
//! scanning when the pattern exposes prefixes, and the VM for everything
//! else. Whenever the DFA gives up (its state cache is bounded), the
//! search transparently falls back to the VM; no search-time condition is
//! ever surfaced as an error.
//!
//! # Example
//!
//! ```
//! use remex::Regex;
//!
//! let re = Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap();
//! assert_eq!(re.find("on 2010-03-14 at noon"), Some((3, 13)));
//! let caps = re.captures("on 2010-03-14 at noon").unwrap();
//! assert_eq!(caps.at(1), Some("2010"));
//! ```
//!
//! # Syntax
//!
//! The supported syntax is the Perl-compatible subset accepted by the
//! `regex-syntax` parser: literals, character classes, repetitions
//! (greedy and lazy), alternation, capture groups (numbered and named),
//! and the empty-width assertions `^`, `$`, `\b` and `\B`. Backreferences
//! and general lookaround are rejected at parse time.

extern crate memchr;
#[macro_use]
extern crate log;
extern crate regex_syntax as syntax;
extern crate utf8_ranges;

pub use re::{
    Captures, Engine, FindCaptures, FindMatches, NoExpand, Regex,
    RegexBuilder, Replacer, Splits, SplitsN,
};

mod backtrack;
mod bytes;
mod compile;
mod dfa;
mod exec;
mod input;
mod inst;
mod literal;
mod nfa;
mod pool;
mod prefilter;
mod program;
mod re;

use std::error;
use std::fmt;

/// An error that occurred while compiling a regular expression.
///
/// Every message produced through `Display` carries the uniform
/// `regexp:` prefix and quotes the offending pattern, so downstream
/// matching on error text is predictable.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The pattern could not be parsed. The message includes the position
    /// and reason reported by the parser.
    Syntax(String),
    /// The pattern is valid but cannot be executed under the requested
    /// options (for example, a construct that forces the VM while the
    /// engine override forbids it).
    Unsupported(String),
    /// A compile option was given a value outside its domain.
    InvalidOption {
        /// The name of the offending option.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The compiled program exceeded the configured size limit.
    CompiledTooBig {
        /// The pattern that was being compiled.
        pattern: String,
        /// The configured limit, in bytes.
        limit: usize,
    },
}

impl Error {
    /// Build a syntax error for `pattern` out of the parser's error.
    fn syntax(pattern: &str, err: &syntax::Error) -> Error {
        Error::Syntax(format!("parse error in {:?}: {}", pattern, err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref msg) => write!(f, "regexp: {}", msg),
            Error::Unsupported(ref msg) => write!(f, "regexp: {}", msg),
            Error::InvalidOption { name, ref reason } => {
                write!(f, "regexp: invalid option {}: {}", name, reason)
            }
            Error::CompiledTooBig { ref pattern, limit } => write!(
                f,
                "regexp: compiled program for {:?} exceeds the size \
                 limit of {} bytes",
                pattern, limit
            ),
        }
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        match *self {
            Error::Syntax(_) => "syntax error",
            Error::Unsupported(_) => "unsupported construct",
            Error::InvalidOption { .. } => "invalid option",
            Error::CompiledTooBig { .. } => "compiled program too big",
        }
    }
}
