// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The lazy DFA: on-demand subset construction over a byte program.
//!
//! A DFA state is the ordered, deduplicated set of program instructions
//! that are pending at an input boundary, plus three context bits
//! describing what sits on the already-scanned side of that boundary
//! (text edge, line edge, word byte). Byte matchers and the match
//! instruction are pending work; empty-width assertions stay pending too
//! because they can depend on the byte that has not been read yet.
//!
//! A transition is built the first time `(state, input unit)` is asked
//! for: pending assertions are resolved against the unit, byte matchers
//! consume it, the successors are epsilon-expanded through saves and
//! splits, and the resulting set is interned. The input alphabet has 257
//! units: every byte plus an end-of-input unit, so look-ahead assertions
//! resolve exactly without extra bookkeeping. Each transition entry also
//! carries a bit reporting "a match ended at the source boundary", which
//! is how the search loops track leftmost match ends (forward) and
//! leftmost match starts (reverse).
//!
//! Forward programs resolve closures in priority order and stop at the
//! match instruction, which reproduces the Pike VM's leftmost-first
//! semantics. Reverse programs resolve everything, so a reverse scan
//! records the leftmost (longest) extension.
//!
//! The cache is bounded. Hitting the bound turns the in-flight search
//! into the `QUIT` sentinel — the meta engine then re-runs that search
//! on the VM — and the next search through the cache clears and rebuilds
//! it. `DEAD` and `QUIT` occupy two reserved dense indices; unbuilt
//! transition entries hold an `UNKNOWN` sentinel that readers treat as
//! "build me".

use std::collections::HashMap;

use inst::{is_word_byte, EmptyLook, Inst};
use program::Program;

/// A dense DFA state index, or one of the reserved sentinels.
pub type StatePtr = u32;

/// The state with no transitions: the search can stop.
pub const DEAD: StatePtr = 0;

/// The state that aborts the DFA: the caller must re-run on the VM.
pub const QUIT: StatePtr = 1;

const FIRST_STATE: StatePtr = 2;

/// Marks a transition entry that has not been built yet.
const UNKNOWN: u32 = ::std::u32::MAX;

/// Set on a transition entry when a match ended at the source boundary.
const MATCH_BIT: u32 = 1 << 31;

/// 256 bytes plus the end-of-input unit.
const NUM_UNITS: usize = 257;
const EOI: usize = 256;

/// Context bits: the already-scanned side of the boundary is the text
/// edge / a line edge / a word byte. `FLAG_ANCHORED` keeps states of
/// anchored and unanchored searches apart in the shared cache, since
/// their transitions differ.
const FLAG_TEXT: u8 = 1 << 0;
const FLAG_LINE: u8 = 1 << 1;
const FLAG_WORD: u8 = 1 << 2;
const FLAG_ANCHORED: u8 = 1 << 3;

/// The outcome of one DFA search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DfaResult {
    /// A match boundary: the end position for a forward search, the
    /// start position for a reverse search.
    Match(usize),
    /// The search completed and found nothing.
    NoMatch,
    /// The state cache filled up; the caller must fall back to the VM.
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct StateKey {
    insts: Box<[u32]>,
    flags: u8,
}

/// The lazy DFA's mutable half: interned states, the flat transition
/// table and resolution scratch. Pooled per program; a cache acquired
/// from the pool may be warm from earlier searches.
#[derive(Debug)]
pub struct DfaCache {
    states: Vec<StateKey>,
    map: HashMap<StateKey, StatePtr>,
    trans: Vec<u32>,
    /// Sparse visited marks for closure resolution, plus their undo log.
    seen: Vec<bool>,
    touched: Vec<u32>,
    sized_for: usize,
}

impl DfaCache {
    /// Create empty scratch; it is sized lazily to its program.
    pub fn new() -> DfaCache {
        DfaCache {
            states: vec![],
            map: HashMap::new(),
            trans: vec![],
            seen: vec![],
            touched: vec![],
            sized_for: 0,
        }
    }

    fn reset(&mut self, insts_len: usize) {
        self.states.clear();
        self.map.clear();
        self.trans.clear();
        // Dummy rows for the DEAD and QUIT sentinels keep row arithmetic
        // uniform; they are never read.
        self.trans.resize(2 * NUM_UNITS, UNKNOWN);
        self.seen.clear();
        self.seen.resize(insts_len, false);
        self.touched.clear();
        self.sized_for = insts_len;
    }
}

/// One DFA search over one program and one cache.
#[derive(Debug)]
pub struct Fsm<'a, 'c> {
    prog: &'a Program,
    cache: &'c mut DfaCache,
    anchored: bool,
}

impl<'a, 'c> Fsm<'a, 'c> {
    /// Scan `text[start..]` left to right and report the leftmost match
    /// end under the program's priority semantics. When `anchored` is
    /// true the match must begin exactly at `start`. When `shortest` is
    /// true, the first match boundary is returned as soon as it is seen.
    pub fn forward(
        prog: &'a Program,
        cache: &'c mut DfaCache,
        text: &[u8],
        start: usize,
        anchored: bool,
        shortest: bool,
    ) -> DfaResult {
        let mut fsm = Fsm::init(prog, cache, anchored);
        let flags = if start == 0 {
            FLAG_TEXT | FLAG_LINE
        } else {
            byte_flags(text[start - 1])
        };
        let mut si = match fsm.start_state(flags) {
            None => return DfaResult::Quit,
            Some(si) => si,
        };
        let mut last_match = DfaResult::NoMatch;
        for p in start..text.len() {
            let e = fsm.next(si, text[p] as usize);
            if e & MATCH_BIT != 0 {
                last_match = DfaResult::Match(p);
                if shortest {
                    return last_match;
                }
            }
            let next = e & !MATCH_BIT;
            if next == DEAD {
                return last_match;
            }
            if next == QUIT {
                trace!("forward DFA quit at byte {}", p);
                return DfaResult::Quit;
            }
            si = next;
        }
        let e = fsm.next(si, EOI);
        if e & MATCH_BIT != 0 {
            last_match = DfaResult::Match(text.len());
        }
        last_match
    }

    /// Scan `text[..end]` right to left with a reverse program and
    /// report the leftmost position at which a match of the reversed
    /// language begins, i.e. the start of a forward match ending at
    /// `end`. The scan is always anchored at `end`.
    pub fn reverse(
        prog: &'a Program,
        cache: &'c mut DfaCache,
        text: &[u8],
        end: usize,
    ) -> DfaResult {
        let mut fsm = Fsm::init(prog, cache, true);
        let flags = if end == text.len() {
            FLAG_TEXT | FLAG_LINE
        } else {
            byte_flags(text[end])
        };
        let mut si = match fsm.start_state(flags) {
            None => return DfaResult::Quit,
            Some(si) => si,
        };
        let mut last_match = DfaResult::NoMatch;
        for p in (0..end).rev() {
            let e = fsm.next(si, text[p] as usize);
            if e & MATCH_BIT != 0 {
                last_match = DfaResult::Match(p + 1);
            }
            let next = e & !MATCH_BIT;
            if next == DEAD {
                return last_match;
            }
            if next == QUIT {
                trace!("reverse DFA quit at byte {}", p);
                return DfaResult::Quit;
            }
            si = next;
        }
        let e = fsm.next(si, EOI);
        if e & MATCH_BIT != 0 {
            last_match = DfaResult::Match(0);
        }
        last_match
    }

    fn init(
        prog: &'a Program,
        cache: &'c mut DfaCache,
        anchored: bool,
    ) -> Fsm<'a, 'c> {
        if cache.sized_for != prog.insts.len()
            || cache.states.len() >= prog.max_dfa_states
        {
            if !cache.states.is_empty() {
                trace!(
                    "clearing DFA cache with {} states",
                    cache.states.len()
                );
            }
            cache.reset(prog.insts.len());
        }
        Fsm { prog: prog, cache: cache, anchored: anchored }
    }

    fn start_state(&mut self, mut flags: u8) -> Option<StatePtr> {
        if self.anchored {
            flags |= FLAG_ANCHORED;
        }
        let mut insts = vec![];
        self.expand(0, &mut insts);
        self.unmark();
        self.intern(StateKey { insts: insts.into_boxed_slice(), flags: flags })
    }

    /// Look up or build the transition for `(si, unit)`.
    fn next(&mut self, si: StatePtr, unit: usize) -> u32 {
        let at = si as usize * NUM_UNITS + unit;
        let cached = self.cache.trans[at];
        if cached != UNKNOWN {
            return cached;
        }
        let entry = self.build(si, unit);
        self.cache.trans[si as usize * NUM_UNITS + unit] = entry;
        entry
    }

    fn build(&mut self, si: StatePtr, unit: usize) -> u32 {
        // Unicode word boundaries are evaluated bytewise as their ASCII
        // counterparts, which is only sound over ASCII input. Give the
        // search back to the VM the moment a non-ASCII byte shows up.
        if unit < 256
            && unit >= 0x80
            && self.prog.insts.has_unicode_word_boundary()
        {
            return QUIT;
        }
        let key = self.cache.states[si as usize - FIRST_STATE as usize].clone();
        // Forward programs cut everything below the match instruction in
        // priority order; reverse programs keep scanning for the longest
        // (leftmost) extension.
        let prune = !self.prog.insts.is_reverse();
        let mut matched = false;
        let mut next_insts = vec![];
        {
            let mut resolved = vec![];
            for &ip in key.insts.iter() {
                if matched && prune {
                    break;
                }
                self.resolve(
                    ip as usize,
                    key.flags,
                    unit,
                    prune,
                    &mut matched,
                    &mut resolved,
                );
            }
            self.unmark();
            for goto in resolved {
                self.expand(goto, &mut next_insts);
            }
        }
        if unit == EOI {
            self.unmark();
            return if matched { DEAD | MATCH_BIT } else { DEAD };
        }
        if !self.anchored && !(matched && prune) {
            // The implicit `.*?` loop: every boundary may also start a
            // fresh attempt, at the lowest priority.
            self.expand(0, &mut next_insts);
        }
        self.unmark();
        if next_insts.is_empty() {
            return if matched { DEAD | MATCH_BIT } else { DEAD };
        }
        let mut flags = byte_flags(unit as u8);
        if self.anchored {
            flags |= FLAG_ANCHORED;
        }
        let key = StateKey {
            insts: next_insts.into_boxed_slice(),
            flags: flags,
        };
        match self.intern(key) {
            None => QUIT,
            Some(next) => {
                if matched {
                    next | MATCH_BIT
                } else {
                    next
                }
            }
        }
    }

    /// Resolve one pending instruction at the source boundary: evaluate
    /// assertions against `(flags, unit)`, consume `unit` with byte
    /// matchers, note matches. Successors that consumed the unit are
    /// collected as goto targets for expansion at the next boundary.
    fn resolve(
        &mut self,
        ip: usize,
        flags: u8,
        unit: usize,
        prune: bool,
        matched: &mut bool,
        out: &mut Vec<usize>,
    ) {
        if self.cache.seen[ip] {
            return;
        }
        self.cache.seen[ip] = true;
        self.cache.touched.push(ip as u32);
        match self.prog.insts[ip] {
            Inst::Match => *matched = true,
            Inst::Save(ref inst) => {
                self.resolve(inst.goto, flags, unit, prune, matched, out)
            }
            Inst::Split(ref inst) => {
                self.resolve(inst.goto1, flags, unit, prune, matched, out);
                if !(*matched && prune) {
                    self.resolve(inst.goto2, flags, unit, prune, matched, out);
                }
            }
            Inst::EmptyLook(ref inst) => {
                if self.eval_look(inst.look, flags, unit) {
                    self.resolve(inst.goto, flags, unit, prune, matched, out)
                }
            }
            Inst::Bytes(ref inst) => {
                if unit < 256 && inst.matches(unit as u8) {
                    out.push(inst.goto);
                }
            }
        }
    }

    /// Expand an instruction at the next boundary through saves and
    /// splits, keeping byte matchers, assertions and match pending.
    fn expand(&mut self, ip: usize, out: &mut Vec<u32>) {
        if self.cache.seen[ip] {
            return;
        }
        self.cache.seen[ip] = true;
        self.cache.touched.push(ip as u32);
        match self.prog.insts[ip] {
            Inst::Save(ref inst) => self.expand(inst.goto, out),
            Inst::Split(ref inst) => {
                self.expand(inst.goto1, out);
                self.expand(inst.goto2, out);
            }
            Inst::Match | Inst::EmptyLook(_) | Inst::Bytes(_) => {
                out.push(ip as u32)
            }
        }
    }

    fn unmark(&mut self) {
        for &ip in &self.cache.touched {
            self.cache.seen[ip as usize] = false;
        }
        self.cache.touched.clear();
    }

    /// Evaluate an assertion at a boundary. `flags` describe the side
    /// already scanned; `unit` is the side about to be scanned. For a
    /// reverse program the scanned side is the right one, so the text
    /// and line anchors swap roles.
    fn eval_look(&self, look: EmptyLook, flags: u8, unit: usize) -> bool {
        let reverse = self.prog.insts.is_reverse();
        let unit_nl = unit == EOI || unit == b'\n' as usize;
        let unit_word = unit < 256 && is_word_byte(unit as u8);
        match look {
            EmptyLook::StartText => {
                if reverse {
                    unit == EOI
                } else {
                    flags & FLAG_TEXT != 0
                }
            }
            EmptyLook::EndText => {
                if reverse {
                    flags & FLAG_TEXT != 0
                } else {
                    unit == EOI
                }
            }
            EmptyLook::StartLine => {
                if reverse {
                    unit_nl
                } else {
                    flags & FLAG_LINE != 0
                }
            }
            EmptyLook::EndLine => {
                if reverse {
                    flags & FLAG_LINE != 0
                } else {
                    unit_nl
                }
            }
            EmptyLook::WordBoundary | EmptyLook::WordBoundaryAscii => {
                (flags & FLAG_WORD != 0) ^ unit_word
            }
            EmptyLook::NotWordBoundary
            | EmptyLook::NotWordBoundaryAscii => {
                !((flags & FLAG_WORD != 0) ^ unit_word)
            }
        }
    }

    fn intern(&mut self, key: StateKey) -> Option<StatePtr> {
        if let Some(&si) = self.cache.map.get(&key) {
            return Some(si);
        }
        if self.cache.states.len() >= self.prog.max_dfa_states {
            trace!(
                "DFA cache is full at {} states; quitting",
                self.cache.states.len()
            );
            return None;
        }
        let si = FIRST_STATE + self.cache.states.len() as StatePtr;
        self.cache.states.push(key.clone());
        self.cache.map.insert(key, si);
        let new_len = (si as usize + 1) * NUM_UNITS;
        self.cache.trans.resize(new_len, UNKNOWN);
        Some(si)
    }
}

fn byte_flags(b: u8) -> u8 {
    let mut flags = 0;
    if b == b'\n' {
        flags |= FLAG_LINE;
    }
    if is_word_byte(b) {
        flags |= FLAG_WORD;
    }
    flags
}

#[cfg(test)]
mod tests {
    use syntax::ExprBuilder;

    use program::ProgramBuilder;
    use super::{DfaCache, DfaResult, Fsm};

    fn forward(re: &str, text: &str, start: usize) -> DfaResult {
        let expr = ExprBuilder::new().parse(re).unwrap();
        let prog = ProgramBuilder::new(re, &expr).compile().unwrap();
        let mut cache = DfaCache::new();
        Fsm::forward(&prog, &mut cache, text.as_bytes(), start, false, false)
    }

    fn reverse(re: &str, text: &str, end: usize) -> DfaResult {
        let expr = ExprBuilder::new().parse(re).unwrap();
        let prog = ProgramBuilder::new(re, &expr)
            .reverse(true)
            .compile()
            .unwrap();
        let mut cache = DfaCache::new();
        Fsm::reverse(&prog, &mut cache, text.as_bytes(), end)
    }

    #[test]
    fn forward_ends() {
        assert_eq!(forward("a", "xay", 0), DfaResult::Match(2));
        assert_eq!(forward("a+", "xaaay", 0), DfaResult::Match(4));
        assert_eq!(forward("a+?", "xaaay", 0), DfaResult::Match(2));
        assert_eq!(forward("a|ab", "xab", 0), DfaResult::Match(2));
        assert_eq!(forward("z", "abc", 0), DfaResult::NoMatch);
        assert_eq!(forward("", "", 0), DfaResult::Match(0));
    }

    #[test]
    fn forward_assertions() {
        assert_eq!(forward("^a", "ba", 0), DfaResult::NoMatch);
        assert_eq!(forward("^a", "ab", 0), DfaResult::Match(1));
        assert_eq!(forward("a$", "a\na", 0), DfaResult::Match(3));
        assert_eq!(forward("(?m)a$", "a\na", 0), DfaResult::Match(1));
        assert_eq!(forward(r"\bword\b", "sword word", 0), DfaResult::Match(10));
    }

    #[test]
    fn reverse_starts() {
        assert_eq!(reverse("a", "xay", 2), DfaResult::Match(1));
        // The reverse scan prefers the leftmost (longest) start.
        assert_eq!(reverse("a+", "xaaa", 4), DfaResult::Match(1));
        assert_eq!(reverse(".*z", "abz", 3), DfaResult::Match(0));
        assert_eq!(reverse("q", "abc", 3), DfaResult::NoMatch);
    }

    #[test]
    fn unanchored_skip() {
        // The implicit `.*?` loop finds matches far from the start.
        assert_eq!(forward("needle", "hay needle hay", 0), DfaResult::Match(10));
    }

    #[test]
    fn quits_when_cache_capped() {
        let re = "[ab]{20}c";
        let expr = ExprBuilder::new().parse(re).unwrap();
        let prog = ProgramBuilder::new(re, &expr)
            .max_dfa_states(3)
            .compile()
            .unwrap();
        let mut cache = DfaCache::new();
        let text: String =
            ::std::iter::repeat("ab").take(40).collect::<String>();
        let res = Fsm::forward(
            &prog,
            &mut cache,
            text.as_bytes(),
            0,
            false,
            false,
        );
        assert_eq!(res, DfaResult::Quit);
    }
}
