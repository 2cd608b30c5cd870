// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use exec::{Exec, ExecBuilder, ExecOptions};
pub use exec::Engine;
use Error;

/// Capture group slots: two per group, as byte offsets.
#[doc(hidden)]
pub type CaptureIdxs = [Option<usize>];

/// A compiled regular expression.
///
/// A `Regex` is immutable once built and can be searched from any number
/// of threads concurrently; all per-search scratch is pooled internally.
/// Match positions are byte offsets into the searched string, half-open.
#[derive(Clone, Debug)]
pub struct Regex {
    exec: Exec,
}

impl Regex {
    /// Compiles a regular expression with default options.
    pub fn new(re: &str) -> Result<Regex, Error> {
        RegexBuilder::new(re).build()
    }

    /// Compiles a regular expression, panicking on failure.
    ///
    /// The panic message is exactly the `Display` rendering of the
    /// error. This is the only panicking entry point in the crate; use
    /// [`new`](#method.new) for anything other than pattern literals
    /// known to be valid.
    pub fn must_compile(re: &str) -> Regex {
        match Regex::new(re) {
            Ok(re) => re,
            Err(err) => panic!("{}", err),
        }
    }

    /// Returns the original pattern string.
    pub fn as_str(&self) -> &str {
        self.exec.regex_str()
    }

    /// Returns true if and only if the regex matches somewhere in
    /// `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.exec.is_match_at(text, 0)
    }

    /// Returns the leftmost match in `text` as `(start, end)` byte
    /// offsets, half-open.
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        self.exec.find_at(text, 0)
    }

    /// Returns an iterator over every non-overlapping match in `text`.
    ///
    /// After an empty match, the next search begins at the following
    /// code point boundary, and an empty match exactly at the previous
    /// match's end is skipped. The iterator is lazy and terminates once
    /// the search position passes the end of `text`.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> FindMatches<'r, 't> {
        FindMatches {
            re: self,
            text: text,
            last_end: 0,
            last_match: None,
        }
    }

    /// Returns the capture groups of the leftmost match in `text`.
    ///
    /// Group 0 is always the whole match. Unmatched groups are absent.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.captures_at(text, 0)
    }

    fn captures_at<'t>(
        &self,
        text: &'t str,
        start: usize,
    ) -> Option<Captures<'t>> {
        let mut locs = self.exec.alloc_captures();
        if !self.exec.captures_at(&mut locs, text, start) {
            return None;
        }
        Some(Captures {
            text: text,
            locs: locs,
            named: named_groups(self.exec.capture_names()),
        })
    }

    /// Returns an iterator over the captures of every non-overlapping
    /// match in `text`.
    pub fn captures_iter<'r, 't>(
        &'r self,
        text: &'t str,
    ) -> FindCaptures<'r, 't> {
        FindCaptures {
            re: self,
            text: text,
            last_end: 0,
            last_match: None,
        }
    }

    /// Returns an iterator over the substrings of `text` separated by
    /// matches of this regex.
    pub fn split<'r, 't>(&'r self, text: &'t str) -> Splits<'r, 't> {
        Splits { finder: self.find_iter(text), last: 0 }
    }

    /// Like `split`, but yields at most `limit` substrings; the final
    /// one carries the unsplit remainder.
    pub fn splitn<'r, 't>(
        &'r self,
        text: &'t str,
        limit: usize,
    ) -> SplitsN<'r, 't> {
        SplitsN { splits: self.split(text), n: limit }
    }

    /// Replaces the leftmost match in `text` with `rep`.
    ///
    /// Replacement strings expand `$0` through `$9` to the matched
    /// groups and `$$` to a literal `$`. Any other use of `$`, including
    /// `${name}`, is passed through literally. Use
    /// [`NoExpand`](struct.NoExpand.html) to suppress expansion.
    pub fn replace<R: Replacer>(&self, text: &str, rep: R) -> String {
        self.replacen(text, 1, rep)
    }

    /// Replaces every non-overlapping match in `text` with `rep`.
    ///
    /// See [`replace`](#method.replace) for the expansion rules.
    pub fn replace_all<R: Replacer>(&self, text: &str, rep: R) -> String {
        self.replacen(text, 0, rep)
    }

    /// Replaces at most `limit` matches (all of them when `limit` is 0).
    pub fn replacen<R: Replacer>(
        &self,
        text: &str,
        limit: usize,
        mut rep: R,
    ) -> String {
        let mut new = String::with_capacity(text.len());
        let mut last_end = 0;
        for (i, caps) in self.captures_iter(text).enumerate() {
            if limit > 0 && i >= limit {
                break;
            }
            let (s, e) = match caps.pos(0) {
                None => continue,
                Some(m) => m,
            };
            new.push_str(&text[last_end..s]);
            new.push_str(&rep.reg_replace(&caps));
            last_end = e;
        }
        new.push_str(&text[last_end..]);
        new
    }

    /// The capture group names of this regex, indexed by group number.
    /// Group 0 is unnamed.
    pub fn capture_names(&self) -> &[Option<String>] {
        self.exec.capture_names()
    }

    /// The number of capture groups, including group 0.
    pub fn captures_len(&self) -> usize {
        self.exec.capture_names().len()
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Regex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Regex, Error> {
        Regex::new(s)
    }
}

/// A configurable builder for compiling a regular expression.
///
/// Every option of the engine is exposed here; `Regex::new` is
/// shorthand for the all-default configuration.
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: String,
    opts: ExecOptions,
}

impl RegexBuilder {
    /// Create a builder for the given pattern.
    pub fn new(pattern: &str) -> RegexBuilder {
        RegexBuilder {
            pattern: pattern.to_string(),
            opts: ExecOptions::default(),
        }
    }

    /// Match case-insensitively.
    pub fn case_insensitive(mut self, yes: bool) -> RegexBuilder {
        self.opts.case_insensitive = yes;
        self
    }

    /// `^` and `$` match at line boundaries, not just text boundaries.
    pub fn multi_line(mut self, yes: bool) -> RegexBuilder {
        self.opts.multi_line = yes;
        self
    }

    /// `.` also matches `\n`.
    pub fn dot_matches_new_line(mut self, yes: bool) -> RegexBuilder {
        self.opts.dot_matches_new_line = yes;
        self
    }

    /// Use leftmost-longest (POSIX) match semantics instead of
    /// leftmost-first.
    pub fn longest_match(mut self, yes: bool) -> RegexBuilder {
        self.opts.longest_match = yes;
        self
    }

    /// Bound the compiled program size, in bytes.
    pub fn size_limit(mut self, limit: usize) -> RegexBuilder {
        self.opts.size_limit = limit;
        self
    }

    /// Bound the lazy DFA state cache, in states. Must be at least 1.
    pub fn max_dfa_states(mut self, max: usize) -> RegexBuilder {
        self.opts.max_dfa_states = max;
        self
    }

    /// Bound the number of literals extracted for prefiltering.
    pub fn max_literals(mut self, max: usize) -> RegexBuilder {
        self.opts.literal_limits.max_literals = max;
        self
    }

    /// Bound the byte length of any extracted literal.
    pub fn max_literal_len(mut self, max: usize) -> RegexBuilder {
        self.opts.literal_limits.max_literal_len = max;
        self
    }

    /// Bound the size of character classes expanded into literals.
    pub fn max_class_size(mut self, max: usize) -> RegexBuilder {
        self.opts.literal_limits.max_class_size = max;
        self
    }

    /// Bound the literal cross product computed during extraction.
    pub fn cross_product_limit(mut self, max: usize) -> RegexBuilder {
        self.opts.literal_limits.cross_product_limit = max;
        self
    }

    /// Enable or disable literal prefiltering.
    pub fn prefilter(mut self, yes: bool) -> RegexBuilder {
        self.opts.prefilter = yes;
        self
    }

    /// Bound how many idle scratch allocations are retained per
    /// compiled program. Must be at least 1.
    pub fn pool_size(mut self, size: usize) -> RegexBuilder {
        self.opts.pool_size = size;
        self
    }

    /// Override automatic engine selection.
    pub fn engine(mut self, engine: Engine) -> RegexBuilder {
        self.opts.engine = engine;
        self
    }

    /// Compile.
    pub fn build(self) -> Result<Regex, Error> {
        let exec =
            ExecBuilder::new(&self.pattern).options(self.opts.clone()).build()?;
        Ok(Regex { exec: exec })
    }
}

fn named_groups(
    names: &[Option<String>],
) -> Option<HashMap<String, usize>> {
    let mut map = HashMap::new();
    for (i, name) in names.iter().enumerate() {
        if let Some(ref name) = *name {
            map.insert(name.clone(), i);
        }
    }
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// The capture groups of a single match.
#[derive(Debug)]
pub struct Captures<'t> {
    text: &'t str,
    locs: Vec<Option<usize>>,
    named: Option<HashMap<String, usize>>,
}

impl<'t> Captures<'t> {
    /// Returns the `(start, end)` byte offsets of the group at index
    /// `i`, if it participated in the match.
    pub fn pos(&self, i: usize) -> Option<(usize, usize)> {
        let (s, e) = (i * 2, i * 2 + 1);
        match (self.locs.get(s), self.locs.get(e)) {
            (Some(&Some(s)), Some(&Some(e))) => Some((s, e)),
            _ => None,
        }
    }

    /// Returns the text of the group at index `i`, if it participated
    /// in the match.
    pub fn at(&self, i: usize) -> Option<&'t str> {
        self.pos(i).map(|(s, e)| &self.text[s..e])
    }

    /// Returns the text of the group with the given name, if any.
    pub fn name(&self, name: &str) -> Option<&'t str> {
        match self.named {
            None => None,
            Some(ref map) => map.get(name).and_then(|&i| self.at(i)),
        }
    }

    /// The number of capture group slots, including group 0.
    pub fn len(&self) -> usize {
        self.locs.len() / 2
    }
}

/// An iterator over every non-overlapping match in a string.
///
/// Yields `(start, end)` byte offset pairs.
#[derive(Debug)]
pub struct FindMatches<'r, 't> {
    re: &'r Regex,
    text: &'t str,
    last_end: usize,
    last_match: Option<usize>,
}

impl<'r, 't> Iterator for FindMatches<'r, 't> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        loop {
            if self.last_end > self.text.len() {
                return None;
            }
            let (s, e) =
                match self.re.exec.find_at(self.text, self.last_end) {
                    None => return None,
                    Some(m) => m,
                };
            if s == e {
                // An empty match advances by one code point, and an
                // empty match adjacent to the previous match's end is
                // never reported.
                self.last_end = next_utf8(self.text, e);
                if Some(e) == self.last_match {
                    continue;
                }
            } else {
                self.last_end = e;
            }
            self.last_match = Some(e);
            return Some((s, e));
        }
    }
}

/// An iterator over the captures of every non-overlapping match.
#[derive(Debug)]
pub struct FindCaptures<'r, 't> {
    re: &'r Regex,
    text: &'t str,
    last_end: usize,
    last_match: Option<usize>,
}

impl<'r, 't> Iterator for FindCaptures<'r, 't> {
    type Item = Captures<'t>;

    fn next(&mut self) -> Option<Captures<'t>> {
        loop {
            if self.last_end > self.text.len() {
                return None;
            }
            let caps = match self.re.captures_at(self.text, self.last_end) {
                None => return None,
                Some(caps) => caps,
            };
            let (s, e) = match caps.pos(0) {
                None => return None,
                Some(m) => m,
            };
            if s == e {
                self.last_end = next_utf8(self.text, e);
                if Some(e) == self.last_match {
                    continue;
                }
            } else {
                self.last_end = e;
            }
            self.last_match = Some(e);
            return Some(caps);
        }
    }
}

/// An iterator over the substrings between matches.
#[derive(Debug)]
pub struct Splits<'r, 't> {
    finder: FindMatches<'r, 't>,
    last: usize,
}

impl<'r, 't> Iterator for Splits<'r, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        let text = self.finder.text;
        match self.finder.next() {
            None => {
                if self.last > text.len() {
                    None
                } else {
                    let s = &text[self.last..];
                    self.last = text.len() + 1;
                    Some(s)
                }
            }
            Some((s, e)) => {
                let piece = &text[self.last..s];
                self.last = e;
                Some(piece)
            }
        }
    }
}

/// An iterator over at most `n` substrings between matches.
#[derive(Debug)]
pub struct SplitsN<'r, 't> {
    splits: Splits<'r, 't>,
    n: usize,
}

impl<'r, 't> Iterator for SplitsN<'r, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        if self.n == 0 {
            return None;
        }
        self.n -= 1;
        if self.n == 0 {
            let text = self.splits.finder.text;
            if self.splits.last > text.len() {
                None
            } else {
                Some(&text[self.splits.last..])
            }
        } else {
            self.splits.next()
        }
    }
}

/// Replaces a match with new text.
pub trait Replacer {
    /// Produce the replacement for one match.
    fn reg_replace(&mut self, caps: &Captures) -> String;
}

/// A replacement string used literally, with no `$` expansion.
#[derive(Clone, Copy, Debug)]
pub struct NoExpand<'r>(pub &'r str);

impl<'r> Replacer for NoExpand<'r> {
    fn reg_replace(&mut self, _: &Captures) -> String {
        self.0.to_string()
    }
}

impl<'r> Replacer for &'r str {
    fn reg_replace(&mut self, caps: &Captures) -> String {
        let mut dst = String::with_capacity(self.len());
        expand_replacement(caps, self, &mut dst);
        dst
    }
}

impl<F: FnMut(&Captures) -> String> Replacer for F {
    fn reg_replace(&mut self, caps: &Captures) -> String {
        self(caps)
    }
}

/// Expand `$0`..`$9` and `$$` in `replacement`; everything else is
/// copied through byte for byte.
fn expand_replacement(caps: &Captures, replacement: &str, dst: &mut String) {
    let bytes = replacement.as_bytes();
    let mut last = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() {
            let c = bytes[i + 1];
            if c == b'$' {
                dst.push_str(&replacement[last..i + 1]);
                last = i + 2;
                i += 2;
                continue;
            }
            if c >= b'0' && c <= b'9' {
                dst.push_str(&replacement[last..i]);
                let group = (c - b'0') as usize;
                if let Some(s) = caps.at(group) {
                    dst.push_str(s);
                }
                last = i + 2;
                i += 2;
                continue;
            }
        }
        i += 1;
    }
    dst.push_str(&replacement[last..]);
}

/// The byte offset of the code point after the one starting at `i` (or
/// `i + 1` when `i` is at or past the end).
fn next_utf8(text: &str, i: usize) -> usize {
    let b = match text.as_bytes().get(i) {
        None => return i + 1,
        Some(&b) => b,
    };
    let inc = if b <= 0x7F {
        1
    } else if b <= 0b1101_1111 {
        2
    } else if b <= 0b1110_1111 {
        3
    } else {
        4
    };
    i + inc
}

#[cfg(test)]
mod tests {
    use super::{next_utf8, Regex};

    #[test]
    fn utf8_stepping() {
        let s = "aé€𝄞";
        let mut i = 0;
        let mut steps = vec![];
        while i < s.len() {
            steps.push(i);
            i = next_utf8(s, i);
        }
        assert_eq!(steps, vec![0, 1, 3, 6]);
        assert_eq!(next_utf8(s, s.len()), s.len() + 1);
    }

    #[test]
    fn expansion() {
        let re = Regex::new(r"(\w+) (\w+)").unwrap();
        assert_eq!(re.replace_all("hello world", "$2 $1"), "world hello");
        assert_eq!(re.replace_all("hello world", "$$1"), "$1");
        // `${name}` is not expanded; the dollar is literal.
        assert_eq!(re.replace_all("hello world", "${2}"), "${2}");
        assert_eq!(re.replace_all("a b", "[$9]"), "[]");
    }

    #[test]
    fn named_captures() {
        let re = Regex::new(r"(?P<y>\d{4})-(?P<m>\d{2})").unwrap();
        let caps = re.captures("on 2010-03 then").unwrap();
        assert_eq!(caps.name("y"), Some("2010"));
        assert_eq!(caps.name("m"), Some("03"));
        assert_eq!(caps.name("d"), None);
        assert_eq!(caps.pos(0), Some((3, 10)));
    }
}
