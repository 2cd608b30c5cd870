// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Thompson lowering from a parsed expression to a byte program.
//!
//! The compiler emits instructions with unfilled goto fields and patches
//! them as the surrounding construct takes shape. Character classes and
//! non-ASCII code points are decomposed into byte-range chains with
//! `utf8-ranges`, so the output is always a byte automaton. Bounded
//! repetitions are unrolled; the configured size limit is enforced on
//! every emitted instruction so pathological counts fail fast.
//!
//! In reverse mode, concatenations and the byte order of every code
//! point chain are flipped. A reverse program matches the reversal of
//! exactly the strings its forward twin matches, which is what the
//! right-to-left DFA scans need.

use std::mem;

use syntax::{CharClass, ClassRange, Expr, Repeater};
use utf8_ranges::Utf8Sequences;

use inst::{
    EmptyLook, Inst, InstBytes, InstEmptyLook, InstIdx, InstSave, InstSplit,
    Insts,
};
use Error;

/// A compiler from one parsed expression to one instruction sequence.
#[derive(Debug)]
pub struct Compiler<'p> {
    pattern: &'p str,
    size_limit: usize,
    reverse: bool,
    insts: Vec<Inst>,
    cap_names: Vec<Option<String>>,
}

/// Which goto field of an instruction still needs a target.
#[derive(Clone, Copy, Debug)]
enum GotoSlot {
    Goto,
    Goto1,
    Goto2,
}

/// A compiled sub-program: its entry point and the goto fields that must
/// be patched to whatever comes next.
#[derive(Debug)]
struct Patch {
    entry: InstIdx,
    holes: Vec<(InstIdx, GotoSlot)>,
}

impl<'p> Compiler<'p> {
    /// Create a compiler. `pattern` is only used for error messages;
    /// `size_limit` bounds the compiled program in bytes.
    pub fn new(pattern: &'p str, size_limit: usize) -> Compiler<'p> {
        Compiler {
            pattern: pattern,
            size_limit: size_limit,
            reverse: false,
            insts: vec![],
            cap_names: vec![None],
        }
    }

    /// Compile for right-to-left scanning.
    pub fn reverse(mut self, yes: bool) -> Compiler<'p> {
        self.reverse = yes;
        self
    }

    /// Compile the expression into a program framed as
    /// `Save(0) … Save(1) Match`.
    pub fn compile(
        mut self,
        expr: &Expr,
    ) -> Result<(Insts, Vec<Option<String>>), Error> {
        let save0 = self.push(Inst::Save(InstSave { goto: 0, slot: 0 }))?;
        let p = self.c(expr)?;
        let save1 = self.push(Inst::Save(InstSave { goto: 0, slot: 1 }))?;
        self.set(save0, GotoSlot::Goto, p.entry);
        self.fill(&p.holes, save1);
        let m = self.push(Inst::Match)?;
        self.set(save1, GotoSlot::Goto, m);
        let reverse = self.reverse;
        Ok((Insts::new(self.insts, reverse), self.cap_names))
    }

    fn c(&mut self, expr: &Expr) -> Result<Patch, Error> {
        match *expr {
            Expr::Empty => self.c_empty(),
            Expr::Literal { ref chars, casei } => {
                if self.reverse {
                    let rev: Vec<char> = chars.iter().rev().cloned().collect();
                    self.c_literal(&rev, casei)
                } else {
                    self.c_literal(chars, casei)
                }
            }
            Expr::LiteralBytes { ref bytes, casei } => {
                // Only reachable when byte-oriented parsing is enabled;
                // case insensitivity folds within ASCII there.
                let mut ranges = vec![];
                let iter: Vec<u8> = if self.reverse {
                    bytes.iter().rev().cloned().collect()
                } else {
                    bytes.clone()
                };
                for &b in &iter {
                    if casei && b.is_ascii() {
                        let lo = b.to_ascii_lowercase();
                        let up = b.to_ascii_uppercase();
                        ranges.push(vec![(lo, lo), (up, up)]);
                    } else {
                        ranges.push(vec![(b, b)]);
                    }
                }
                let mut patch = None;
                for alts in ranges {
                    let p = self.c_byte_alternates(&alts)?;
                    patch = Some(match patch {
                        None => p,
                        Some(prev) => self.join(prev, p),
                    });
                }
                match patch {
                    None => self.c_empty(),
                    Some(p) => Ok(p),
                }
            }
            Expr::AnyChar => self.c_char_ranges(&[
                ('\0', '\u{D7FF}'),
                ('\u{E000}', '\u{10FFFF}'),
            ]),
            Expr::AnyCharNoNL => self.c_char_ranges(&[
                ('\0', '\x09'),
                ('\x0B', '\u{D7FF}'),
                ('\u{E000}', '\u{10FFFF}'),
            ]),
            Expr::AnyByte => self.c_byte_alternates(&[(0, 255)]),
            Expr::AnyByteNoNL => {
                self.c_byte_alternates(&[(0, 9), (11, 255)])
            }
            Expr::Class(ref cls) => {
                let ranges: Vec<(char, char)> =
                    cls.iter().map(|r| (r.start, r.end)).collect();
                self.c_char_ranges(&ranges)
            }
            Expr::ClassBytes(ref cls) => {
                let ranges: Vec<(u8, u8)> =
                    cls.iter().map(|r| (r.start, r.end)).collect();
                self.c_byte_alternates(&ranges)
            }
            Expr::StartLine => self.c_empty_look(EmptyLook::StartLine),
            Expr::EndLine => self.c_empty_look(EmptyLook::EndLine),
            Expr::StartText => self.c_empty_look(EmptyLook::StartText),
            Expr::EndText => self.c_empty_look(EmptyLook::EndText),
            Expr::WordBoundary => self.c_empty_look(EmptyLook::WordBoundary),
            Expr::NotWordBoundary => {
                self.c_empty_look(EmptyLook::NotWordBoundary)
            }
            Expr::WordBoundaryAscii => {
                self.c_empty_look(EmptyLook::WordBoundaryAscii)
            }
            Expr::NotWordBoundaryAscii => {
                self.c_empty_look(EmptyLook::NotWordBoundaryAscii)
            }
            Expr::Group { ref e, i: None, .. } => self.c(e),
            Expr::Group { ref e, i: Some(i), ref name } => {
                while self.cap_names.len() <= i {
                    self.cap_names.push(None);
                }
                self.cap_names[i] = name.clone();
                let open = self.push(Inst::Save(InstSave {
                    goto: 0,
                    slot: 2 * i,
                }))?;
                let p = self.c(e)?;
                self.set(open, GotoSlot::Goto, p.entry);
                let close = self.push(Inst::Save(InstSave {
                    goto: 0,
                    slot: 2 * i + 1,
                }))?;
                self.fill(&p.holes, close);
                Ok(Patch {
                    entry: open,
                    holes: vec![(close, GotoSlot::Goto)],
                })
            }
            Expr::Concat(ref es) => {
                let mut patch = None;
                if self.reverse {
                    for e in es.iter().rev() {
                        let p = self.c(e)?;
                        patch = Some(match patch {
                            None => p,
                            Some(prev) => self.join(prev, p),
                        });
                    }
                } else {
                    for e in es {
                        let p = self.c(e)?;
                        patch = Some(match patch {
                            None => p,
                            Some(prev) => self.join(prev, p),
                        });
                    }
                }
                match patch {
                    None => self.c_empty(),
                    Some(p) => Ok(p),
                }
            }
            Expr::Alternate(ref es) => self.c_alternate(es),
            Expr::Repeat { ref e, r, greedy } => self.c_repeat(e, r, greedy),
        }
    }

    fn c_empty(&mut self) -> Result<Patch, Error> {
        // A split with both arms pointing forward is an epsilon no-op.
        let i = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }))?;
        Ok(Patch {
            entry: i,
            holes: vec![(i, GotoSlot::Goto1), (i, GotoSlot::Goto2)],
        })
    }

    fn c_empty_look(&mut self, look: EmptyLook) -> Result<Patch, Error> {
        let i = self.push(Inst::EmptyLook(InstEmptyLook {
            goto: 0,
            look: look,
        }))?;
        Ok(Patch { entry: i, holes: vec![(i, GotoSlot::Goto)] })
    }

    fn c_literal(
        &mut self,
        chars: &[char],
        casei: bool,
    ) -> Result<Patch, Error> {
        let mut patch = None;
        for &c in chars {
            let p = if casei {
                let cls = CharClass::new(vec![ClassRange {
                    start: c,
                    end: c,
                }])
                .case_fold();
                let ranges: Vec<(char, char)> =
                    cls.iter().map(|r| (r.start, r.end)).collect();
                self.c_char_ranges(&ranges)?
            } else {
                self.c_char(c)?
            };
            patch = Some(match patch {
                None => p,
                Some(prev) => self.join(prev, p),
            });
        }
        match patch {
            None => self.c_empty(),
            Some(p) => Ok(p),
        }
    }

    fn c_char(&mut self, c: char) -> Result<Patch, Error> {
        let mut buf = [0u8; 4];
        let bytes = c.encode_utf8(&mut buf).as_bytes().to_vec();
        self.c_byte_chain(&bytes)
    }

    /// A chain of exact bytes (reversed in reverse mode).
    fn c_byte_chain(&mut self, bytes: &[u8]) -> Result<Patch, Error> {
        let order: Vec<u8> = if self.reverse {
            bytes.iter().rev().cloned().collect()
        } else {
            bytes.to_vec()
        };
        let mut patch = None;
        for b in order {
            let i = self.push(Inst::Bytes(InstBytes {
                goto: 0,
                start: b,
                end: b,
            }))?;
            let p = Patch { entry: i, holes: vec![(i, GotoSlot::Goto)] };
            patch = Some(match patch {
                None => p,
                Some(prev) => self.join(prev, p),
            });
        }
        match patch {
            None => self.c_empty(),
            Some(p) => Ok(p),
        }
    }

    /// A set of scalar-value ranges, each decomposed into UTF-8 byte
    /// range chains, all alternated.
    fn c_char_ranges(
        &mut self,
        ranges: &[(char, char)],
    ) -> Result<Patch, Error> {
        // Collect every alternative as a sequence of byte ranges first;
        // the split chain is emitted around them.
        let mut alts: Vec<Vec<(u8, u8)>> = vec![];
        for &(start, end) in ranges {
            if end as u32 <= 0x7F {
                alts.push(vec![(start as u8, end as u8)]);
                continue;
            }
            for seq in Utf8Sequences::new(start, end) {
                let mut chain: Vec<(u8, u8)> =
                    seq.as_slice().iter().map(|r| (r.start, r.end)).collect();
                if self.reverse {
                    chain.reverse();
                }
                alts.push(chain);
            }
        }
        if alts.is_empty() {
            // An empty class can never match.
            let i = self.push(Inst::Bytes(InstBytes {
                goto: 0,
                start: 1,
                end: 0,
            }))?;
            return Ok(Patch { entry: i, holes: vec![(i, GotoSlot::Goto)] });
        }
        self.c_alternate_chains(alts)
    }

    /// One or more byte ranges, alternated. Each range is a one-byte
    /// alternative.
    fn c_byte_alternates(
        &mut self,
        ranges: &[(u8, u8)],
    ) -> Result<Patch, Error> {
        let alts: Vec<Vec<(u8, u8)>> =
            ranges.iter().map(|&r| vec![r]).collect();
        if alts.is_empty() {
            return self.c_empty();
        }
        self.c_alternate_chains(alts)
    }

    fn c_alternate_chains(
        &mut self,
        alts: Vec<Vec<(u8, u8)>>,
    ) -> Result<Patch, Error> {
        let mut holes = vec![];
        let mut entry = None;
        let mut prev_split: Option<InstIdx> = None;
        let last = alts.len() - 1;
        for (k, chain) in alts.into_iter().enumerate() {
            let split = if k < last {
                let s =
                    self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }))?;
                if let Some(ps) = prev_split {
                    self.set(ps, GotoSlot::Goto2, s);
                }
                if entry.is_none() {
                    entry = Some(s);
                }
                Some(s)
            } else {
                None
            };
            let mut patch: Option<Patch> = None;
            for (start, end) in chain {
                let i = self.push(Inst::Bytes(InstBytes {
                    goto: 0,
                    start: start,
                    end: end,
                }))?;
                let p = Patch { entry: i, holes: vec![(i, GotoSlot::Goto)] };
                patch = Some(match patch {
                    None => p,
                    Some(prev) => self.join(prev, p),
                });
            }
            let p = match patch {
                None => self.c_empty()?,
                Some(p) => p,
            };
            match split {
                Some(s) => self.set(s, GotoSlot::Goto1, p.entry),
                None => {
                    if let Some(ps) = prev_split {
                        self.set(ps, GotoSlot::Goto2, p.entry);
                    }
                    if entry.is_none() {
                        entry = Some(p.entry);
                    }
                }
            }
            holes.extend(p.holes);
            prev_split = split;
        }
        Ok(Patch { entry: entry.unwrap(), holes: holes })
    }

    fn c_alternate(&mut self, es: &[Expr]) -> Result<Patch, Error> {
        if es.is_empty() {
            return self.c_empty();
        }
        let mut holes = vec![];
        let mut entry = None;
        let mut prev_split: Option<InstIdx> = None;
        let last = es.len() - 1;
        for (k, e) in es.iter().enumerate() {
            if k < last {
                let s =
                    self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }))?;
                if let Some(ps) = prev_split {
                    self.set(ps, GotoSlot::Goto2, s);
                }
                if entry.is_none() {
                    entry = Some(s);
                }
                let p = self.c(e)?;
                self.set(s, GotoSlot::Goto1, p.entry);
                holes.extend(p.holes);
                prev_split = Some(s);
            } else {
                let p = self.c(e)?;
                if let Some(ps) = prev_split {
                    self.set(ps, GotoSlot::Goto2, p.entry);
                }
                if entry.is_none() {
                    entry = Some(p.entry);
                }
                holes.extend(p.holes);
            }
        }
        Ok(Patch { entry: entry.unwrap(), holes: holes })
    }

    fn c_repeat(
        &mut self,
        e: &Expr,
        r: Repeater,
        greedy: bool,
    ) -> Result<Patch, Error> {
        match r {
            Repeater::ZeroOrOne => self.c_zero_or_one(e, greedy),
            Repeater::ZeroOrMore => self.c_zero_or_more(e, greedy),
            Repeater::OneOrMore => self.c_one_or_more(e, greedy),
            Repeater::Range { min, max: None } => {
                let mut patch: Option<Patch> = None;
                for _ in 1..min {
                    let p = self.c(e)?;
                    patch = Some(match patch {
                        None => p,
                        Some(prev) => self.join(prev, p),
                    });
                }
                let tail = if min == 0 {
                    self.c_zero_or_more(e, greedy)?
                } else {
                    self.c_one_or_more(e, greedy)?
                };
                Ok(match patch {
                    None => tail,
                    Some(prev) => self.join(prev, tail),
                })
            }
            Repeater::Range { min, max: Some(max) } => {
                if max == 0 {
                    return self.c_empty();
                }
                let mut patch: Option<Patch> = None;
                for _ in 0..min {
                    let p = self.c(e)?;
                    patch = Some(match patch {
                        None => p,
                        Some(prev) => self.join(prev, p),
                    });
                }
                for _ in min..max {
                    let p = self.c_zero_or_one(e, greedy)?;
                    patch = Some(match patch {
                        None => p,
                        Some(prev) => self.join(prev, p),
                    });
                }
                match patch {
                    None => self.c_empty(),
                    Some(p) => Ok(p),
                }
            }
        }
    }

    fn c_zero_or_one(&mut self, e: &Expr, greedy: bool) -> Result<Patch, Error> {
        let s = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }))?;
        let p = self.c(e)?;
        let mut holes = p.holes;
        if greedy {
            self.set(s, GotoSlot::Goto1, p.entry);
            holes.push((s, GotoSlot::Goto2));
        } else {
            self.set(s, GotoSlot::Goto2, p.entry);
            holes.push((s, GotoSlot::Goto1));
        }
        Ok(Patch { entry: s, holes: holes })
    }

    fn c_zero_or_more(&mut self, e: &Expr, greedy: bool) -> Result<Patch, Error> {
        let s = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }))?;
        let p = self.c(e)?;
        self.fill(&p.holes, s);
        let hole = if greedy {
            self.set(s, GotoSlot::Goto1, p.entry);
            (s, GotoSlot::Goto2)
        } else {
            self.set(s, GotoSlot::Goto2, p.entry);
            (s, GotoSlot::Goto1)
        };
        Ok(Patch { entry: s, holes: vec![hole] })
    }

    fn c_one_or_more(&mut self, e: &Expr, greedy: bool) -> Result<Patch, Error> {
        let p = self.c(e)?;
        let s = self.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }))?;
        self.fill(&p.holes, s);
        let hole = if greedy {
            self.set(s, GotoSlot::Goto1, p.entry);
            (s, GotoSlot::Goto2)
        } else {
            self.set(s, GotoSlot::Goto2, p.entry);
            (s, GotoSlot::Goto1)
        };
        Ok(Patch { entry: p.entry, holes: vec![hole] })
    }

    fn join(&mut self, first: Patch, second: Patch) -> Patch {
        self.fill(&first.holes, second.entry);
        Patch { entry: first.entry, holes: second.holes }
    }

    fn fill(&mut self, holes: &[(InstIdx, GotoSlot)], target: InstIdx) {
        for &(idx, slot) in holes {
            self.set(idx, slot, target);
        }
    }

    fn set(&mut self, idx: InstIdx, slot: GotoSlot, target: InstIdx) {
        match slot {
            GotoSlot::Goto => match self.insts[idx] {
                Inst::Save(ref mut i) => i.goto = target,
                Inst::EmptyLook(ref mut i) => i.goto = target,
                Inst::Bytes(ref mut i) => i.goto = target,
                _ => unreachable!("goto hole on a split or match"),
            },
            GotoSlot::Goto1 => match self.insts[idx] {
                Inst::Split(ref mut i) => i.goto1 = target,
                _ => unreachable!("goto1 hole on a non-split"),
            },
            GotoSlot::Goto2 => match self.insts[idx] {
                Inst::Split(ref mut i) => i.goto2 = target,
                _ => unreachable!("goto2 hole on a non-split"),
            },
        }
    }

    fn push(&mut self, inst: Inst) -> Result<InstIdx, Error> {
        if (self.insts.len() + 1) * mem::size_of::<Inst>() > self.size_limit {
            return Err(Error::CompiledTooBig {
                pattern: self.pattern.to_string(),
                limit: self.size_limit,
            });
        }
        self.insts.push(inst);
        Ok(self.insts.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use syntax::ExprBuilder;

    use inst::Inst;
    use super::Compiler;

    fn compile(re: &str) -> ::inst::Insts {
        let expr = ExprBuilder::new().parse(re).unwrap();
        let (insts, _) = Compiler::new(re, 1 << 20).compile(&expr).unwrap();
        insts
    }

    #[test]
    fn frame() {
        let insts = compile("a");
        // Save(0), Bytes(a), Save(1), Match.
        assert_eq!(insts.len(), 4);
        match insts[insts.len() - 1] {
            Inst::Match => {}
            ref i => panic!("expected match, got {:?}", i),
        }
        assert!(!insts.anchored_begin());
        assert!(!insts.anchored_end());
    }

    #[test]
    fn anchors_detected() {
        assert!(compile("^abc").anchored_begin());
        assert!(compile("abc$").anchored_end());
        assert!(!compile("^abc").anchored_end());
        assert!(compile(r"^\.php$").anchored_end());
    }

    #[test]
    fn reverse_literal_bytes() {
        let expr = ExprBuilder::new().parse("ab").unwrap();
        let (insts, _) =
            Compiler::new("ab", 1 << 20).reverse(true).compile(&expr).unwrap();
        // The first byte matcher after Save(0) must be 'b'.
        let mut bytes = vec![];
        for inst in insts.iter() {
            if let Inst::Bytes(ref b) = *inst {
                bytes.push(b.start);
            }
        }
        assert_eq!(bytes, vec![b'b', b'a']);
    }

    #[test]
    fn size_limit_enforced() {
        let expr = ExprBuilder::new().parse("a{500}").unwrap();
        assert!(Compiler::new("a{500}", 64).compile(&expr).is_err());
    }

    #[test]
    fn unicode_class_decomposes() {
        // A multi-byte range must produce byte matchers only.
        let insts = compile("[α-ω]");
        let mut saw_bytes = false;
        for inst in insts.iter() {
            match *inst {
                Inst::Bytes(_) => saw_bytes = true,
                _ => {}
            }
        }
        assert!(saw_bytes);
    }
}
