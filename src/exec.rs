// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The meta engine: one strategy per compiled regex.
//!
//! Compilation parses the pattern once, extracts prefix/suffix/inner
//! literal sequences, compiles the forward and reverse programs (plus a
//! split pair of programs when an inner literal exists) and then binds
//! the regex to exactly one search strategy. Search entry points
//! dispatch on that strategy; whenever a lazy DFA gives up, the search
//! at hand is re-run on the Pike VM, whose answer is always authoritative.

use backtrack::{self, Backtrack};
use dfa::{DfaResult, Fsm};
use input::Input;
use literal::{Extractor, Limits};
use nfa::Nfa;
use prefilter::Prefilter;
use program::{Program, ProgramBuilder};
use re::CaptureIdxs;
use syntax::ExprBuilder;
use Error;

/// A matching engine override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    /// Choose a strategy from the shape of the pattern. The default.
    Auto,
    /// Always use the NFA simulation (or the bounded backtracker).
    VmOnly,
    /// Always use the lazy DFA for match bounds. Capture extraction and
    /// DFA cache exhaustion still run the VM; patterns whose DFA would
    /// be permanently degraded are rejected at compile time.
    DfaOnly,
}

/// The strategy a compiled regex is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    /// The prefix literals are the whole pattern: the prefilter alone
    /// decides matches.
    Literal,
    /// Scan for a required inner literal, expand left with a reverse
    /// DFA over the prefix sub-program and right with a forward DFA
    /// over the suffix sub-program.
    ReverseInner,
    /// Scan for a complete end-anchored suffix, expand left with the
    /// reverse DFA.
    ReverseSuffix,
    /// The pattern can only match at the end of the text: one reverse
    /// DFA scan from the end.
    ReverseAnchored,
    /// Scan for prefix literals, verify with an anchored forward DFA.
    DfaPrefix,
    /// Forward DFA for the match end, reverse DFA for the match start.
    Dfa,
    /// The Pike VM (or the bounded backtracker on small inputs).
    Nfa,
}

/// All compile options consumed by the meta engine, as one plain record.
#[derive(Clone, Debug)]
pub struct ExecOptions {
    /// Fold case while matching.
    pub case_insensitive: bool,
    /// `^`/`$` match at line boundaries.
    pub multi_line: bool,
    /// `.` also matches `\n`.
    pub dot_matches_new_line: bool,
    /// Leftmost-longest instead of leftmost-first semantics.
    pub longest_match: bool,
    /// Bound on the compiled program, in bytes.
    pub size_limit: usize,
    /// Bound on the lazy DFA state cache, in states.
    pub max_dfa_states: usize,
    /// Literal extraction budgets.
    pub literal_limits: Limits,
    /// Whether literal prefiltering is used at all.
    pub prefilter: bool,
    /// Engine override.
    pub engine: Engine,
    /// Bound on pooled scratch values retained per program.
    pub pool_size: usize,
}

impl Default for ExecOptions {
    fn default() -> ExecOptions {
        ExecOptions {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            longest_match: false,
            size_limit: 10 * (1 << 20),
            max_dfa_states: 10_000,
            literal_limits: Limits::default(),
            prefilter: true,
            engine: Engine::Auto,
            pool_size: 8,
        }
    }
}

/// The compiled programs for the reverse-inner strategy.
#[derive(Clone, Debug)]
struct InnerPlan {
    pre: Prefilter,
    prefix_rev: Program,
    suffix_fwd: Program,
}

/// Executor manages the execution of a regular expression.
///
/// In particular, this manages the various compiled forms of a single
/// regular expression and the choice of which matching engine
/// composition to use to execute it.
#[derive(Clone, Debug)]
pub struct Exec {
    /// The forward program, with captures. Used by the VM engines and
    /// the forward DFA.
    prog: Program,
    /// The same program reversed, used by the DFA to find the starting
    /// location of matches.
    reverse: Program,
    /// The split programs and prefilter for the reverse-inner strategy.
    inner: Option<InnerPlan>,
    /// A prefilter over suffix literals, for the reverse-suffix
    /// strategy.
    suffix_pre: Prefilter,
    /// The strategy every search is routed through.
    strategy: Strategy,
}

/// Builds an `Exec` from a pattern and options.
#[derive(Debug)]
pub struct ExecBuilder<'r> {
    pattern: &'r str,
    opts: ExecOptions,
}

impl<'r> ExecBuilder<'r> {
    /// Create a builder for the given pattern with default options.
    pub fn new(pattern: &'r str) -> ExecBuilder<'r> {
        ExecBuilder { pattern: pattern, opts: ExecOptions::default() }
    }

    /// Replace all options at once.
    pub fn options(mut self, opts: ExecOptions) -> ExecBuilder<'r> {
        self.opts = opts;
        self
    }

    /// Parse, extract, compile and pick a strategy.
    pub fn build(self) -> Result<Exec, Error> {
        let opts = &self.opts;
        if opts.max_dfa_states == 0 {
            return Err(Error::InvalidOption {
                name: "max_dfa_states",
                reason: format!(
                    "must be at least 1 for pattern {:?}",
                    self.pattern
                ),
            });
        }
        if opts.pool_size == 0 {
            return Err(Error::InvalidOption {
                name: "pool_size",
                reason: format!(
                    "must be at least 1 for pattern {:?}",
                    self.pattern
                ),
            });
        }
        let expr = ExprBuilder::new()
            .case_insensitive(opts.case_insensitive)
            .multi_line(opts.multi_line)
            .dot_matches_new_line(opts.dot_matches_new_line)
            .parse(self.pattern)
            .map_err(|e| Error::syntax(self.pattern, &e))?;

        let extractor = Extractor::new(opts.literal_limits);
        let prefix_seq = extractor.prefixes(&expr);
        let suffix_seq = extractor.suffixes(&expr);
        let prefix_pre = if opts.prefilter {
            Prefilter::from_seq(&prefix_seq)
        } else {
            Prefilter::none()
        };
        let suffix_pre = if opts.prefilter && suffix_seq.all_complete() {
            Prefilter::from_seq(&suffix_seq)
        } else {
            Prefilter::none()
        };

        let prog = ProgramBuilder::new(self.pattern, &expr)
            .size_limit(opts.size_limit)
            .longest(opts.longest_match)
            .max_dfa_states(opts.max_dfa_states)
            .pool_size(opts.pool_size)
            .prefixes(prefix_pre.clone())
            .compile()?;
        let reverse = ProgramBuilder::new(self.pattern, &expr)
            .size_limit(opts.size_limit)
            .reverse(true)
            .max_dfa_states(opts.max_dfa_states)
            .pool_size(opts.pool_size)
            .compile()?;

        if opts.engine == Engine::DfaOnly {
            if prog.insts.has_unicode_word_boundary() {
                return Err(Error::Unsupported(format!(
                    "pattern {:?} uses a Unicode word boundary, which the \
                     DFA cannot execute",
                    self.pattern
                )));
            }
            if opts.longest_match {
                return Err(Error::Unsupported(format!(
                    "pattern {:?} requests leftmost-longest matching, \
                     which requires the NFA engine",
                    self.pattern
                )));
            }
        }

        // The inner plan is built only when it could be selected; its
        // two extra programs are not worth compiling otherwise.
        let mut inner = None;
        if opts.prefilter
            && !opts.longest_match
            && opts.engine == Engine::Auto
            && !prog.anchored_begin
            && !prog.anchored_end
        {
            if let Some(info) = extractor.inner(&expr) {
                let pre = Prefilter::from_seq(&info.lits);
                if !pre.is_none() {
                    let prefix_rev =
                        ProgramBuilder::new(self.pattern, &info.prefix)
                            .size_limit(opts.size_limit)
                            .reverse(true)
                            .max_dfa_states(opts.max_dfa_states)
                            .pool_size(opts.pool_size)
                            .compile()?;
                    let suffix_fwd =
                        ProgramBuilder::new(self.pattern, &info.suffix)
                            .size_limit(opts.size_limit)
                            .max_dfa_states(opts.max_dfa_states)
                            .pool_size(opts.pool_size)
                            .compile()?;
                    inner = Some(InnerPlan {
                        pre: pre,
                        prefix_rev: prefix_rev,
                        suffix_fwd: suffix_fwd,
                    });
                }
            }
        }

        let strategy = match opts.engine {
            Engine::VmOnly => Strategy::Nfa,
            Engine::DfaOnly => Strategy::Dfa,
            Engine::Auto => {
                if opts.longest_match {
                    // The DFA's pruned closures implement leftmost-first
                    // only; the VM speaks leftmost-longest natively.
                    Strategy::Nfa
                } else if prefix_pre.complete()
                    && !prog.insts.has_empty_look()
                    && prefix_pre.preserves_priority()
                {
                    Strategy::Literal
                } else if inner.is_some() {
                    Strategy::ReverseInner
                } else if prog.anchored_end
                    && !prog.anchored_begin
                    && suffix_pre.complete()
                {
                    Strategy::ReverseSuffix
                } else if prog.anchored_end && !prog.anchored_begin {
                    Strategy::ReverseAnchored
                } else if !prefix_pre.is_none()
                    && (prefix_seq.longest_common_prefix().len() >= 3
                        || prefix_seq.len() <= 8)
                {
                    Strategy::DfaPrefix
                } else if prog.insts.len() >= 20 && prog.num_captures() <= 1
                {
                    Strategy::Dfa
                } else {
                    Strategy::Nfa
                }
            }
        };
        debug!(
            "compiled {:?}: strategy {:?}, {} insts, {} prefix literals",
            self.pattern,
            strategy,
            prog.insts.len(),
            prefix_seq.len()
        );
        Ok(Exec {
            prog: prog,
            reverse: reverse,
            inner: inner,
            suffix_pre: suffix_pre,
            strategy: strategy,
        })
    }
}

impl Exec {
    /// The original pattern string.
    pub fn regex_str(&self) -> &str {
        &self.prog.original
    }

    /// The sequence of capture group names.
    pub fn capture_names(&self) -> &[Option<String>] {
        &self.prog.cap_names
    }

    /// Allocate fresh capture slots for this program.
    pub fn alloc_captures(&self) -> Vec<Option<usize>> {
        self.prog.alloc_captures()
    }

    /// Returns true iff the regex matches somewhere in `text[start..]`.
    pub fn is_match_at(&self, text: &str, start: usize) -> bool {
        match self.strategy {
            Strategy::Literal => {
                self.prog.prefixes.find(&text.as_bytes()[start..]).is_some()
            }
            Strategy::Dfa => {
                let mut cache = self.prog.cache_dfa();
                match Fsm::forward(
                    &self.prog,
                    &mut cache,
                    text.as_bytes(),
                    start,
                    false,
                    true,
                ) {
                    DfaResult::Match(_) => true,
                    DfaResult::NoMatch => false,
                    DfaResult::Quit => {
                        let mut caps: [Option<usize>; 0] = [];
                        self.exec_vm(&mut caps, text, start)
                    }
                }
            }
            Strategy::Nfa => {
                let mut caps: [Option<usize>; 0] = [];
                self.exec_vm(&mut caps, text, start)
            }
            _ => self.find_at(text, start).is_some(),
        }
    }

    /// Find the leftmost match in `text[start..]`.
    pub fn find_at(
        &self,
        text: &str,
        start: usize,
    ) -> Option<(usize, usize)> {
        match self.strategy {
            Strategy::Literal => self.find_literal(text, start),
            Strategy::ReverseInner => self.find_reverse_inner(text, start),
            Strategy::ReverseSuffix => self.find_reverse_suffix(text, start),
            Strategy::ReverseAnchored => {
                self.find_reverse_anchored(text, start)
            }
            Strategy::DfaPrefix => self.find_dfa_prefix(text, start),
            Strategy::Dfa => self.find_dfa(text, start),
            Strategy::Nfa => self.find_nfa(text, start),
        }
    }

    /// Fill capture slots for the leftmost match in `text[start..]`.
    ///
    /// Whatever found the match bounds, submatch extraction is always a
    /// VM run from the discovered start.
    pub fn captures_at(
        &self,
        caps: &mut CaptureIdxs,
        text: &str,
        start: usize,
    ) -> bool {
        if caps.len() <= 2 {
            return match self.find_at(text, start) {
                None => false,
                Some((s, e)) => {
                    if caps.len() == 2 {
                        caps[0] = Some(s);
                        caps[1] = Some(e);
                    }
                    true
                }
            };
        }
        match self.strategy {
            Strategy::Nfa => self.exec_vm(caps, text, start),
            _ => match self.find_at(text, start) {
                None => false,
                Some((s, _)) => self.exec_vm(caps, text, s),
            },
        }
    }

    fn find_literal(
        &self,
        text: &str,
        start: usize,
    ) -> Option<(usize, usize)> {
        self.prog
            .prefixes
            .find(&text.as_bytes()[start..])
            .map(|(s, e)| (start + s, start + e))
    }

    fn find_reverse_inner(
        &self,
        text: &str,
        start: usize,
    ) -> Option<(usize, usize)> {
        let plan = match self.inner {
            None => return self.find_nfa(text, start),
            Some(ref plan) => plan,
        };
        let bytes = text.as_bytes();
        let mut rev_cache = plan.prefix_rev.cache_dfa();
        let mut fwd_cache = plan.suffix_fwd.cache_dfa();
        let mut at = start;
        while at <= bytes.len() {
            let hs = match plan.pre.find(&bytes[at..]) {
                None => return None,
                Some((s, _)) => at + s,
            };
            let s = match Fsm::reverse(
                &plan.prefix_rev,
                &mut rev_cache,
                bytes,
                hs,
            ) {
                DfaResult::Quit => return self.find_nfa(text, start),
                DfaResult::NoMatch => {
                    at = hs + 1;
                    continue;
                }
                DfaResult::Match(s) => s,
            };
            if s < start {
                // The leftward expansion crossed the caller's lower
                // bound; only the VM can sort out what remains.
                return self.find_nfa(text, start);
            }
            match Fsm::forward(
                &plan.suffix_fwd,
                &mut fwd_cache,
                bytes,
                hs,
                true,
                false,
            ) {
                DfaResult::Quit => return self.find_nfa(text, start),
                DfaResult::NoMatch => {
                    at = hs + 1;
                    continue;
                }
                DfaResult::Match(e) => return Some((s, e)),
            }
        }
        None
    }

    fn find_reverse_suffix(
        &self,
        text: &str,
        start: usize,
    ) -> Option<(usize, usize)> {
        let bytes = text.as_bytes();
        let mut cache = self.reverse.cache_dfa();
        let mut at = start;
        while at <= bytes.len() {
            let (hs, he) = match self.suffix_pre.find(&bytes[at..]) {
                None => return None,
                Some((s, e)) => (at + s, at + e),
            };
            match Fsm::reverse(&self.reverse, &mut cache, bytes, he) {
                DfaResult::Quit => return self.find_nfa(text, start),
                DfaResult::NoMatch => {
                    at = hs + 1;
                    continue;
                }
                DfaResult::Match(s) => {
                    if s < start {
                        return self.find_nfa(text, start);
                    }
                    return Some((s, he));
                }
            }
        }
        None
    }

    fn find_reverse_anchored(
        &self,
        text: &str,
        start: usize,
    ) -> Option<(usize, usize)> {
        let bytes = text.as_bytes();
        let mut cache = self.reverse.cache_dfa();
        match Fsm::reverse(&self.reverse, &mut cache, bytes, bytes.len()) {
            DfaResult::Quit => self.find_nfa(text, start),
            DfaResult::NoMatch => None,
            DfaResult::Match(s) => {
                if s < start {
                    self.find_nfa(text, start)
                } else {
                    Some((s, bytes.len()))
                }
            }
        }
    }

    fn find_dfa_prefix(
        &self,
        text: &str,
        start: usize,
    ) -> Option<(usize, usize)> {
        let bytes = text.as_bytes();
        let mut cache = self.prog.cache_dfa();
        let mut at = start;
        while at <= bytes.len() {
            let hs = match self.prog.prefixes.find(&bytes[at..]) {
                None => return None,
                Some((s, _)) => at + s,
            };
            match Fsm::forward(&self.prog, &mut cache, bytes, hs, true, false)
            {
                DfaResult::Quit => return self.find_nfa(text, start),
                DfaResult::NoMatch => {
                    at = hs + 1;
                    continue;
                }
                DfaResult::Match(e) => return Some((hs, e)),
            }
        }
        None
    }

    fn find_dfa(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        let bytes = text.as_bytes();
        let end = {
            let mut cache = self.prog.cache_dfa();
            match Fsm::forward(
                &self.prog,
                &mut cache,
                bytes,
                start,
                false,
                false,
            ) {
                DfaResult::Quit => return self.find_nfa(text, start),
                DfaResult::NoMatch => return None,
                DfaResult::Match(end) => end,
            }
        };
        if end == start {
            return Some((end, end));
        }
        let mut cache = self.reverse.cache_dfa();
        match Fsm::reverse(&self.reverse, &mut cache, bytes, end) {
            DfaResult::Match(s) => {
                if s < start {
                    self.find_nfa(text, start)
                } else {
                    Some((s, end))
                }
            }
            // The reverse scan must agree with the forward scan; if its
            // cache gave up (or anything else went sideways), the VM
            // settles it.
            DfaResult::Quit | DfaResult::NoMatch => {
                self.find_nfa(text, start)
            }
        }
    }

    fn find_nfa(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        let mut caps: [Option<usize>; 2] = [None, None];
        if self.exec_vm(&mut caps, text, start) {
            match (caps[0], caps[1]) {
                (Some(s), Some(e)) => Some((s, e)),
                _ => None,
            }
        } else {
            None
        }
    }

    /// Run a VM engine: the bounded backtracker when the program and
    /// input are small (and priorities suffice), the NFA simulation
    /// otherwise.
    fn exec_vm(
        &self,
        caps: &mut CaptureIdxs,
        text: &str,
        start: usize,
    ) -> bool {
        let input = Input::new(text);
        if !self.prog.longest
            && backtrack::should_exec(self.prog.insts.len(), text.len())
        {
            Backtrack::exec(&self.prog, caps, input, start)
        } else {
            Nfa::exec(&self.prog, caps, input, start)
        }
    }

    #[cfg(test)]
    fn strategy(&self) -> Strategy {
        self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::{Exec, ExecBuilder, ExecOptions, Strategy};

    fn exec(pattern: &str) -> Exec {
        ExecBuilder::new(pattern).build().unwrap()
    }

    #[test]
    fn strategy_selection() {
        assert_eq!(exec("abc").strategy(), Strategy::Literal);
        assert_eq!(exec("abc|def").strategy(), Strategy::Literal);
        assert_eq!(exec(".*needle.*").strategy(), Strategy::ReverseInner);
        assert_eq!(exec(r"\.php$").strategy(), Strategy::ReverseSuffix);
        assert_eq!(exec(r"[a-z]+$").strategy(), Strategy::ReverseAnchored);
        assert_eq!(exec("b|").strategy(), Strategy::Nfa);
        assert_eq!(exec(r"\bword\b").strategy(), Strategy::Nfa);
        // Incomplete prefixes with a small literal set still prefilter.
        assert_eq!(exec("(abcd|efgh).*x").strategy(), Strategy::DfaPrefix);
    }

    #[test]
    fn overrides() {
        let mut opts = ExecOptions::default();
        opts.engine = super::Engine::VmOnly;
        let ex = ExecBuilder::new("abc").options(opts).build().unwrap();
        assert_eq!(ex.strategy(), Strategy::Nfa);
        assert_eq!(ex.find_at("zzabc", 0), Some((2, 5)));

        let mut opts = ExecOptions::default();
        opts.engine = super::Engine::DfaOnly;
        let ex = ExecBuilder::new("abc").options(opts).build().unwrap();
        assert_eq!(ex.strategy(), Strategy::Dfa);
        assert_eq!(ex.find_at("zzabc", 0), Some((2, 5)));

        let mut opts = ExecOptions::default();
        opts.engine = super::Engine::DfaOnly;
        assert!(ExecBuilder::new(r"\bx\b").options(opts).build().is_err());
    }

    #[test]
    fn prefilter_disabled() {
        let mut opts = ExecOptions::default();
        opts.prefilter = false;
        let ex = ExecBuilder::new("abc").options(opts).build().unwrap();
        assert_eq!(ex.find_at("zzabc", 0), Some((2, 5)));
    }

    #[test]
    fn longest_match_routes_to_vm() {
        let mut opts = ExecOptions::default();
        opts.longest_match = true;
        let ex = ExecBuilder::new("a|ab").options(opts).build().unwrap();
        assert_eq!(ex.strategy(), Strategy::Nfa);
        assert_eq!(ex.find_at("xab", 0), Some((1, 3)));
    }

    #[test]
    fn invalid_options() {
        let mut opts = ExecOptions::default();
        opts.max_dfa_states = 0;
        assert!(ExecBuilder::new("a").options(opts).build().is_err());
    }
}
