// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::ops;
use std::str;

use prefilter::Prefilter;

/// The input to the VM-style matching engines.
///
/// Programs advance byte at a time, but the empty-width assertions need
/// the code points adjacent to a position, so the reader can decode in
/// both directions. The text always originates from a `&str`, which is
/// what makes the unchecked decoding below sound.
#[derive(Clone, Copy, Debug)]
pub struct Input<'t> {
    text: &'t [u8],
}

impl<'t> Input<'t> {
    /// Return a new input reader for the given string.
    pub fn new(s: &'t str) -> Input<'t> {
        Input { text: s.as_bytes() }
    }

    /// Return an encoding of the position at byte offset `i`.
    #[inline(always)]
    pub fn at(&self, i: usize) -> InputAt {
        InputAt { pos: i, byte: self.text.get(i).cloned() }
    }

    /// Return the Unicode character starting at `at`, if any.
    pub fn next_char(&self, at: InputAt) -> Option<char> {
        let s = unsafe { str::from_utf8_unchecked(&self.text[at.pos()..]) };
        s.chars().next()
    }

    /// Return the Unicode character ending just before `at`, if any.
    pub fn previous_char(&self, at: InputAt) -> Option<char> {
        let s = unsafe { str::from_utf8_unchecked(&self.text[..at.pos()]) };
        s.chars().rev().next()
    }

    /// Scan the input for the next prefilter candidate at or after `at`.
    pub fn prefix_at(
        &self,
        prefixes: &Prefilter,
        at: InputAt,
    ) -> Option<InputAt> {
        prefixes.find(&self.text[at.pos()..]).map(|(s, _)| self.at(at.pos() + s))
    }
}

impl<'t> ops::Deref for Input<'t> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.text
    }
}

/// Represents a location in the input.
#[derive(Clone, Copy, Debug)]
pub struct InputAt {
    pos: usize,
    byte: Option<u8>,
}

impl InputAt {
    /// Returns true iff this position is at the beginning of the input.
    pub fn is_beginning(&self) -> bool {
        self.pos == 0
    }

    /// Returns true iff this position is past the last byte.
    pub fn is_end(&self) -> bool {
        self.byte.is_none()
    }

    /// Return the byte at this position, or `None` at the end.
    pub fn byte(&self) -> Option<u8> {
        self.byte
    }

    /// Returns the byte offset of this position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the byte offset of the next position in the input.
    pub fn next_pos(&self) -> usize {
        self.pos + 1
    }
}
