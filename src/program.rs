// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use syntax::Expr;

use backtrack::BackMachine;
use compile::Compiler;
use dfa::DfaCache;
use inst::{Inst, Insts};
use nfa::NfaThreads;
use pool::{Pool, PoolGuard};
use prefilter::Prefilter;
use Error;

/// Program represents a compiled regular expression. Once an expression
/// is compiled, its representation is immutable and will never change.
/// (Well, almost. The matching engines pool scratch state that is reused
/// on subsequent searches, but that is interior mutability that isn't
/// observable by the caller.)
#[derive(Debug)]
pub struct Program {
    /// The original regular expression string.
    pub original: String,
    /// A sequence of instructions.
    pub insts: Insts,
    /// The sequence of capture group names. There is an entry for each
    /// capture group index and a name exists only if the capture group
    /// is named.
    pub cap_names: Vec<Option<String>>,
    /// A prefilter over literals that every match must start with, used
    /// by the VM engines to skip ahead in the input.
    pub prefixes: Prefilter,
    /// True iff program is anchored at the beginning.
    pub anchored_begin: bool,
    /// True iff program is anchored at the end.
    pub anchored_end: bool,
    /// True iff matching favors the longest leftmost match over the
    /// first one in priority order.
    pub longest: bool,
    /// The cap on the lazy DFA state cache built over this program.
    pub max_dfa_states: usize,
    /// How many idle scratch values each pool retains.
    pool_size: usize,
    /// Cached NFA thread lists.
    nfa_threads: Pool<NfaThreads>,
    /// Cached backtracking memory.
    backtrack: Pool<BackMachine>,
    /// Cached lazy DFA transition tables.
    dfa: Pool<DfaCache>,
}

/// Compiles one `Program` from an already-parsed expression.
#[derive(Debug)]
pub struct ProgramBuilder<'a> {
    pattern: &'a str,
    expr: &'a Expr,
    size_limit: usize,
    reverse: bool,
    longest: bool,
    max_dfa_states: usize,
    pool_size: usize,
    prefixes: Prefilter,
}

impl<'a> ProgramBuilder<'a> {
    /// Create a builder for the given pattern/expression pair. The
    /// pattern text is used in error messages only.
    pub fn new(pattern: &'a str, expr: &'a Expr) -> ProgramBuilder<'a> {
        ProgramBuilder {
            pattern: pattern,
            expr: expr,
            size_limit: 10 * (1 << 20),
            reverse: false,
            longest: false,
            max_dfa_states: 10_000,
            pool_size: 8,
            prefixes: Prefilter::none(),
        }
    }

    /// Bound the compiled program size, in bytes.
    pub fn size_limit(mut self, limit: usize) -> ProgramBuilder<'a> {
        self.size_limit = limit;
        self
    }

    /// Compile for right-to-left scanning.
    pub fn reverse(mut self, yes: bool) -> ProgramBuilder<'a> {
        self.reverse = yes;
        self
    }

    /// Use leftmost-longest match semantics.
    pub fn longest(mut self, yes: bool) -> ProgramBuilder<'a> {
        self.longest = yes;
        self
    }

    /// Bound the lazy DFA state cache built over this program.
    pub fn max_dfa_states(mut self, max: usize) -> ProgramBuilder<'a> {
        self.max_dfa_states = max;
        self
    }

    /// Bound how many idle scratch values each pool retains.
    pub fn pool_size(mut self, size: usize) -> ProgramBuilder<'a> {
        self.pool_size = size;
        self
    }

    /// Attach a prefix prefilter for VM skip-ahead.
    pub fn prefixes(mut self, prefixes: Prefilter) -> ProgramBuilder<'a> {
        self.prefixes = prefixes;
        self
    }

    /// Compile the program.
    pub fn compile(self) -> Result<Program, Error> {
        let (insts, cap_names) = Compiler::new(self.pattern, self.size_limit)
            .reverse(self.reverse)
            .compile(self.expr)?;
        let anchored_begin = insts.anchored_begin();
        let anchored_end = insts.anchored_end();
        Ok(Program {
            original: self.pattern.to_string(),
            insts: insts,
            cap_names: cap_names,
            prefixes: self.prefixes,
            anchored_begin: anchored_begin,
            anchored_end: anchored_end,
            longest: self.longest,
            max_dfa_states: self.max_dfa_states,
            pool_size: self.pool_size,
            nfa_threads: Pool::new(Box::new(NfaThreads::new), self.pool_size),
            backtrack: Pool::new(Box::new(BackMachine::new), self.pool_size),
            dfa: Pool::new(Box::new(DfaCache::new), self.pool_size),
        })
    }
}

impl Program {
    /// Acquire scratch thread lists for the NFA simulation.
    pub fn cache_nfa(&self) -> PoolGuard<NfaThreads> {
        self.nfa_threads.get()
    }

    /// Acquire scratch memory for the backtracking engine.
    pub fn cache_backtrack(&self) -> PoolGuard<BackMachine> {
        self.backtrack.get()
    }

    /// Acquire a (possibly warm) lazy DFA cache for this program.
    pub fn cache_dfa(&self) -> PoolGuard<DfaCache> {
        self.dfa.get()
    }

    /// Returns the total number of capture groups in the regular
    /// expression. This includes the zeroth capture.
    pub fn num_captures(&self) -> usize {
        num_captures(&self.insts)
    }

    /// Allocate new capture groups.
    pub fn alloc_captures(&self) -> Vec<Option<usize>> {
        vec![None; 2 * self.num_captures()]
    }
}

impl Clone for Program {
    fn clone(&self) -> Program {
        Program {
            original: self.original.clone(),
            insts: self.insts.clone(),
            cap_names: self.cap_names.clone(),
            prefixes: self.prefixes.clone(),
            anchored_begin: self.anchored_begin,
            anchored_end: self.anchored_end,
            longest: self.longest,
            max_dfa_states: self.max_dfa_states,
            pool_size: self.pool_size,
            nfa_threads: Pool::new(Box::new(NfaThreads::new), self.pool_size),
            backtrack: Pool::new(Box::new(BackMachine::new), self.pool_size),
            dfa: Pool::new(Box::new(DfaCache::new), self.pool_size),
        }
    }
}

/// Return the number of captures in the given sequence of instructions.
fn num_captures(insts: &[Inst]) -> usize {
    let mut n = 0;
    for inst in insts {
        if let Inst::Save(ref inst) = *inst {
            n = ::std::cmp::max(n, inst.slot + 1)
        }
    }
    // There's exactly 2 Save slots for every capture.
    n / 2
}
