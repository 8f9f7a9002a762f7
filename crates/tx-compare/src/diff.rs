//! Symbol-level edit-script engine.
//!
//! Implements Myers' O(N·D) shortest-edit-script search with the linear-space
//! refinement: each sub-problem is split at its *middle snake*, found by
//! running the forward and reverse searches towards each other, and the two
//! halves are solved recursively.
//!
//! The search is bounded by a [`Deadline`]. Once it expires, whatever is left
//! unsolved is emitted as one Delete run followed by one Insert run. The
//! script still covers both sequences exactly; it is merely no longer
//! guaranteed to be minimal, and the outcome is flagged `timed_out`.
//!
//! The returned script is normalized: adjacent runs never share an operation
//! and every block of edits between two equalities reads Delete-then-Insert.

use std::time::{Duration, Instant};

use tracing::debug;

use tx_core::Operation;

use crate::symbols::Symbol;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One run of an edit script: an operation over consecutive symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub op: Operation,
    pub symbols: Vec<Symbol>,
}

impl Edit {
    pub fn new(op: Operation, symbols: Vec<Symbol>) -> Self {
        Self { op, symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Ordered list of runs covering both input sequences.
pub type EditScript = Vec<Edit>;

/// Wall-clock limit for the search, polled cooperatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// No limit: the search always runs to a minimal script.
    pub fn never() -> Self {
        Self { at: None }
    }

    /// Expire `budget` from now. A budget too large to represent never expires.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(budget),
        }
    }

    /// `0` means no limit.
    pub fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Self::never()
        } else {
            Self::after(Duration::from_millis(ms))
        }
    }

    pub fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    pub script: EditScript,
    /// `true` when the deadline cut the search short.
    pub timed_out: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute an edit script turning `a` into `b`.
pub fn diff(a: &[Symbol], b: &[Symbol], deadline: Deadline) -> ScriptOutcome {
    let mut search = Search {
        deadline,
        timed_out: false,
        script: Vec::new(),
    };
    search.diff(a, b);

    if search.timed_out {
        debug!(
            a_len = a.len(),
            b_len = b.len(),
            "edit-script deadline reached; remaining regions emitted as replacements"
        );
    }

    ScriptOutcome {
        script: normalize(search.script),
        timed_out: search.timed_out,
    }
}

/// Number of inserted plus deleted symbols in `script`.
pub fn edit_distance(script: &[Edit]) -> usize {
    script
        .iter()
        .filter(|e| e.op != Operation::Equal)
        .map(Edit::len)
        .sum()
}

/// Merge same-operation neighbours, drop empty runs, and rewrite every block
/// of edits between two equalities as one Delete run then one Insert run.
pub fn normalize(script: EditScript) -> EditScript {
    let mut out: EditScript = Vec::with_capacity(script.len());
    let mut deleted = Vec::new();
    let mut inserted = Vec::new();

    for edit in script {
        match edit.op {
            Operation::Delete => deleted.extend(edit.symbols),
            Operation::Insert => inserted.extend(edit.symbols),
            Operation::Equal => {
                if edit.symbols.is_empty() {
                    continue;
                }
                flush_block(&mut out, &mut deleted, &mut inserted);
                match out.last_mut() {
                    Some(last) if last.op == Operation::Equal => last.symbols.extend(edit.symbols),
                    _ => out.push(edit),
                }
            }
        }
    }
    flush_block(&mut out, &mut deleted, &mut inserted);

    out
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn flush_block(out: &mut EditScript, deleted: &mut Vec<Symbol>, inserted: &mut Vec<Symbol>) {
    if !deleted.is_empty() {
        out.push(Edit::new(Operation::Delete, std::mem::take(deleted)));
    }
    if !inserted.is_empty() {
        out.push(Edit::new(Operation::Insert, std::mem::take(inserted)));
    }
}

fn common_prefix(a: &[Symbol], b: &[Symbol]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[Symbol], b: &[Symbol]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Per-call search state; nothing here outlives one [`diff`] invocation.
struct Search {
    deadline: Deadline,
    timed_out: bool,
    script: EditScript,
}

impl Search {
    fn diff(&mut self, a: &[Symbol], b: &[Symbol]) {
        let prefix = common_prefix(a, b);
        let (a_rest, b_rest) = (&a[prefix..], &b[prefix..]);
        let suffix = common_suffix(a_rest, b_rest);
        let a_mid = &a_rest[..a_rest.len() - suffix];
        let b_mid = &b_rest[..b_rest.len() - suffix];

        self.push(Operation::Equal, &a[..prefix]);
        self.compute(a_mid, b_mid);
        self.push(Operation::Equal, &a_rest[a_rest.len() - suffix..]);
    }

    /// Solve a sub-problem whose ends are known to differ.
    fn compute(&mut self, a: &[Symbol], b: &[Symbol]) {
        if a.is_empty() {
            self.push(Operation::Insert, b);
            return;
        }
        if b.is_empty() {
            self.push(Operation::Delete, a);
            return;
        }

        match self.middle_snake(a, b) {
            Some((x, y)) => {
                self.diff(&a[..x], &b[..y]);
                self.diff(&a[x..], &b[y..]);
            }
            None => {
                self.push(Operation::Delete, a);
                self.push(Operation::Insert, b);
            }
        }
    }

    fn push(&mut self, op: Operation, symbols: &[Symbol]) {
        if symbols.is_empty() {
            return;
        }
        if let Some(last) = self.script.last_mut() {
            if last.op == op {
                last.symbols.extend_from_slice(symbols);
                return;
            }
        }
        self.script.push(Edit::new(op, symbols.to_vec()));
    }

    /// Find a split point `(x, y)` on an optimal path from `(0, 0)` to
    /// `(a.len(), b.len())`.
    ///
    /// Returns `None` when the sequences share nothing or the deadline has
    /// expired; either way the caller replaces the whole region.
    fn middle_snake(&mut self, a: &[Symbol], b: &[Symbol]) -> Option<(usize, usize)> {
        let n = a.len() as isize;
        let m = b.len() as isize;
        let max_d = (n + m + 1) / 2;
        let offset = max_d;
        let width = (2 * max_d + 2) as usize;

        // Furthest x reached on each diagonal k, stored at `offset + k`.
        let mut forward = vec![-1isize; width];
        let mut reverse = vec![-1isize; width];
        forward[(offset + 1) as usize] = 0;
        reverse[(offset + 1) as usize] = 0;

        let delta = n - m;
        // With an odd delta the paths can only meet during a forward step.
        let front = delta % 2 != 0;

        // Diagonals that ran off the grid are trimmed from later passes.
        let mut k1_start = 0;
        let mut k1_end = 0;
        let mut k2_start = 0;
        let mut k2_end = 0;

        for d in 0..max_d {
            if self.deadline.expired() {
                self.timed_out = true;
                return None;
            }

            let mut k1 = -d + k1_start;
            while k1 <= d - k1_end {
                let k1_offset = (offset + k1) as usize;
                let mut x1 = if k1 == -d
                    || (k1 != d && forward[k1_offset - 1] < forward[k1_offset + 1])
                {
                    forward[k1_offset + 1]
                } else {
                    forward[k1_offset - 1] + 1
                };
                let mut y1 = x1 - k1;
                while x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                    x1 += 1;
                    y1 += 1;
                }
                forward[k1_offset] = x1;

                if x1 > n {
                    k1_end += 2;
                } else if y1 > m {
                    k1_start += 2;
                } else if front {
                    let k2_offset = offset + delta - k1;
                    if k2_offset >= 0 && (k2_offset as usize) < width {
                        let reached = reverse[k2_offset as usize];
                        if reached != -1 && x1 >= n - reached {
                            return Some((x1 as usize, y1 as usize));
                        }
                    }
                }
                k1 += 2;
            }

            let mut k2 = -d + k2_start;
            while k2 <= d - k2_end {
                let k2_offset = (offset + k2) as usize;
                let mut x2 = if k2 == -d
                    || (k2 != d && reverse[k2_offset - 1] < reverse[k2_offset + 1])
                {
                    reverse[k2_offset + 1]
                } else {
                    reverse[k2_offset - 1] + 1
                };
                let mut y2 = x2 - k2;
                while x2 < n
                    && y2 < m
                    && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize]
                {
                    x2 += 1;
                    y2 += 1;
                }
                reverse[k2_offset] = x2;

                if x2 > n {
                    k2_end += 2;
                } else if y2 > m {
                    k2_start += 2;
                } else if !front {
                    let k1_offset = offset + delta - k2;
                    if k1_offset >= 0 && (k1_offset as usize) < width {
                        let x1 = forward[k1_offset as usize];
                        if x1 != -1 {
                            let y1 = offset + x1 - k1_offset;
                            if x1 >= n - x2 {
                                return Some((x1 as usize, y1 as usize));
                            }
                        }
                    }
                }
                k2 += 2;
            }
        }

        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
