// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The Pike VM: a full NFA simulation. It advances the whole thread set
// one byte at a time, so its running time is O(bytes * instructions) no
// matter the pattern. Capture slots ride along with every thread and are
// copied on write when a thread forks.
//
// In leftmost-first mode (the default), the first thread in priority
// order that reaches the match instruction wins and everything of lower
// priority is cut. In leftmost-longest mode the simulation keeps going
// until the thread set drains and prefers the earliest start, then the
// longest end.

use input::{Input, InputAt};
use program::Program;
use re::CaptureIdxs;

/// An NFA simulation matching engine.
#[derive(Debug)]
pub struct Nfa<'r, 't> {
    prog: &'r Program,
    input: Input<'t>,
}

impl<'r, 't> Nfa<'r, 't> {
    /// Execute the NFA matching engine.
    ///
    /// If there's a match, `exec` returns `true` and populates the given
    /// captures accordingly.
    pub fn exec(
        prog: &'r Program,
        caps: &mut CaptureIdxs,
        input: Input<'t>,
        start: usize,
    ) -> bool {
        let mut cache = prog.cache_nfa();
        cache.resize(prog.insts.len(), prog.num_captures());
        let at = input.at(start);
        Nfa { prog: prog, input: input }.exec_(&mut *cache, caps, at)
    }

    fn exec_(
        &mut self,
        q: &mut NfaThreads,
        caps: &mut CaptureIdxs,
        mut at: InputAt,
    ) -> bool {
        let mut matched = false;
        q.clist.clear();
        q.nlist.clear();
'LOOP:  loop {
            if q.clist.size == 0 {
                // Three ways to bail out when our current set of threads
                // is empty.
                //
                // 1. We have a match (and we are leftmost-first, or the
                //    set drained in longest mode), so we're done
                //    exploring any possible alternatives.
                //
                // 2. If the expression starts with a '^' we can
                //    terminate as soon as the last thread dies.
                if matched
                    || (!at.is_beginning() && self.prog.anchored_begin)
                {
                    break;
                }

                // 3. If there's a literal prefix for the program, try to
                //    jump ahead quickly. If it can't be found, then we
                //    can bail out early. Never do this for an anchored
                //    program: the prefix must sit exactly at the start.
                if !self.prog.anchored_begin
                    && !self.prog.prefixes.is_none()
                {
                    at = match self.input.prefix_at(&self.prog.prefixes, at)
                    {
                        None => break,
                        Some(at) => at,
                    };
                }
            }

            // This simulates a preceding '.*?' for every regex by adding
            // a state starting at the current position in the input for
            // the beginning of the program only if we don't already have
            // a match.
            if q.clist.size == 0
                || (!self.prog.anchored_begin && !matched)
            {
                self.add(&mut q.clist, caps, 0, at);
            }
            // The previous call to "add" actually inspects the position
            // just before the current character. For stepping through the
            // machine, we want to look at the current character, so we
            // advance the input.
            let at_next = self.input.at(at.next_pos());
            for i in 0..q.clist.size {
                let pc = q.clist.pc(i);
                let tcaps = q.clist.caps(i);
                if self.step(&mut q.nlist, caps, tcaps, pc, at, at_next) {
                    matched = true;
                    if caps.len() == 0 {
                        // If we only care if a match occurs (not its
                        // position), then we can quit right now.
                        break 'LOOP;
                    }
                    if !self.prog.longest {
                        // We don't need to check the rest of the threads
                        // in this set because we've matched something
                        // ("leftmost-first"). However, we still need to
                        // check threads in the next set to support
                        // things like greedy matching.
                        break;
                    }
                }
            }
            if at.is_end() {
                break;
            }
            at = at_next;
            q.swap();
            q.nlist.clear();
        }
        matched
    }

    fn step(
        &self,
        nlist: &mut Threads,
        caps: &mut [Option<usize>],
        thread_caps: &mut [Option<usize>],
        pc: usize,
        at: InputAt,
        at_next: InputAt,
    ) -> bool {
        use inst::Inst::*;
        match self.prog.insts[pc] {
            Match => {
                if self.prog.longest {
                    // Leftmost-longest: prefer the earliest start, then
                    // the longest end. Thread priority settles ties.
                    let better = match (caps.get(0), thread_caps.get(0)) {
                        (Some(&Some(cur)), Some(&Some(new))) => {
                            new < cur
                                || (new == cur
                                    && thread_caps[1] > caps[1])
                        }
                        (Some(&None), _) => true,
                        _ => true,
                    };
                    if better {
                        for (slot, val) in
                            caps.iter_mut().zip(thread_caps.iter())
                        {
                            *slot = *val;
                        }
                    }
                } else {
                    for (slot, val) in caps.iter_mut().zip(thread_caps.iter())
                    {
                        *slot = *val;
                    }
                }
                true
            }
            Bytes(ref inst) => {
                if let Some(b) = at.byte() {
                    if inst.matches(b) {
                        self.add(nlist, thread_caps, inst.goto, at_next);
                    }
                }
                false
            }
            EmptyLook(_) | Save(_) | Split(_) => false,
        }
    }

    fn add(
        &self,
        nlist: &mut Threads,
        thread_caps: &mut [Option<usize>],
        pc: usize,
        at: InputAt,
    ) {
        use inst::Inst::*;

        if nlist.contains(pc) {
            return;
        }
        let ti = nlist.add(pc);
        match self.prog.insts[pc] {
            EmptyLook(ref inst) => {
                let prev = self.input.previous_char(at);
                let next = self.input.next_char(at);
                if inst.matches(prev, next) {
                    self.add(nlist, thread_caps, inst.goto, at);
                }
            }
            Save(ref inst) => {
                if inst.slot >= thread_caps.len() {
                    self.add(nlist, thread_caps, inst.goto, at);
                } else {
                    let old = thread_caps[inst.slot];
                    thread_caps[inst.slot] = Some(at.pos());
                    self.add(nlist, thread_caps, inst.goto, at);
                    thread_caps[inst.slot] = old;
                }
            }
            Split(ref inst) => {
                self.add(nlist, thread_caps, inst.goto1, at);
                self.add(nlist, thread_caps, inst.goto2, at);
            }
            Match | Bytes(_) => {
                let t = nlist.thread(ti);
                for (slot, val) in t.caps.iter_mut().zip(thread_caps.iter()) {
                    *slot = *val;
                }
            }
        }
    }
}

/// Shared cached state between multiple invocations of an NFA engine in
/// the same thread.
///
/// It is exported so that it can be pooled by `program::Program`.
#[derive(Debug)]
pub struct NfaThreads {
    clist: Threads,
    nlist: Threads,
}

#[derive(Debug)]
struct Threads {
    dense: Vec<Thread>,
    sparse: Vec<usize>,
    size: usize,
}

#[derive(Clone, Debug)]
struct Thread {
    pc: usize,
    caps: Vec<Option<usize>>,
}

impl NfaThreads {
    /// Create empty scratch space; `resize` sizes it to a program.
    pub fn new() -> NfaThreads {
        NfaThreads { clist: Threads::new(), nlist: Threads::new() }
    }

    /// Size the thread lists for a program with `num_insts` instructions
    /// and `ncaps` capture groups. A no-op when already sized.
    pub fn resize(&mut self, num_insts: usize, ncaps: usize) {
        self.clist.resize(num_insts, ncaps);
        self.nlist.resize(num_insts, ncaps);
    }

    fn swap(&mut self) {
        ::std::mem::swap(&mut self.clist, &mut self.nlist);
    }
}

impl Threads {
    fn new() -> Threads {
        Threads { dense: vec![], sparse: vec![], size: 0 }
    }

    fn resize(&mut self, num_insts: usize, ncaps: usize) {
        let old_slots = self.dense.get(0).map_or(0, |t| t.caps.len());
        let new_slots = ncaps * 2;
        if num_insts != self.dense.len() || old_slots != new_slots {
            let t = Thread { pc: 0, caps: vec![None; new_slots] };
            *self = Threads {
                dense: vec![t; num_insts],
                sparse: vec![0; num_insts],
                size: 0,
            }
        }
    }

    fn add(&mut self, pc: usize) -> usize {
        let i = self.size;
        self.dense[i].pc = pc;
        self.sparse[pc] = i;
        self.size += 1;
        i
    }

    fn thread(&mut self, i: usize) -> &mut Thread {
        &mut self.dense[i]
    }

    fn contains(&self, pc: usize) -> bool {
        let s = self.sparse[pc];
        s < self.size && self.dense[s].pc == pc
    }

    fn clear(&mut self) {
        self.size = 0;
    }

    fn pc(&self, i: usize) -> usize {
        self.dense[i].pc
    }

    fn caps(&mut self, i: usize) -> &mut [Option<usize>] {
        &mut self.dense[i].caps
    }
}
