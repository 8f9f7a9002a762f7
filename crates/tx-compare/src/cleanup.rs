//! Semantic cleanup of raw edit scripts.
//!
//! A minimal script is often noisy: a single shared space between two
//! rewritten words, or an insertion whose boundary falls one token off from
//! where a reader expects it. Cleanup runs three passes over the script:
//!
//! 1. **Coalesce**: drop empty runs, merge neighbouring equalities, and fold
//!    every block of edits between two equalities into one *change*
//!    (`deleted` + `inserted`).
//! 2. **Shift**: slide a pure insertion or deletion that is flanked by
//!    equalities across one of them when the run ends with the preceding
//!    equality (or starts with the following one), which eliminates that
//!    equality outright. Shifts move whole symbols, so boundaries always fall
//!    on token boundaries.
//! 3. **Absorb**: an interior equality no heavier than the larger side of
//!    each neighbouring change is folded into a single change together with
//!    its neighbours. Below `edit_cost` the bar is the whole change on each
//!    side (deleted plus inserted), which only matters around replacements.
//!
//! Weights are supplied by the caller (the character length of each token),
//! so the thresholds mean the same thing at every granularity.
//!
//! Absorption only ever grows changes, and a growing change only makes its
//! neighbouring equalities more absorbable, so the pass converges to the same
//! result in any order. Consequently `cleanup` is idempotent and a larger
//! `edit_cost` never yields more runs.

use tx_core::Operation;

use crate::diff::{Edit, EditScript};
use crate::symbols::Symbol;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Clean up `script`, weighting each symbol with `weigh`.
pub fn cleanup<F>(script: EditScript, edit_cost: usize, weigh: F) -> EditScript
where
    F: Fn(Symbol) -> usize,
{
    let mut pieces = coalesce(script.into_iter().map(Piece::from));
    shift_boundaries(&mut pieces);
    absorb_noise(&mut pieces, edit_cost, &weigh);
    emit(pieces)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Equal(Vec<Symbol>),
    Change {
        deleted: Vec<Symbol>,
        inserted: Vec<Symbol>,
    },
}

impl From<Edit> for Piece {
    fn from(edit: Edit) -> Self {
        match edit.op {
            Operation::Equal => Piece::Equal(edit.symbols),
            Operation::Delete => Piece::Change {
                deleted: edit.symbols,
                inserted: Vec::new(),
            },
            Operation::Insert => Piece::Change {
                deleted: Vec::new(),
                inserted: edit.symbols,
            },
        }
    }
}

impl Piece {
    fn is_empty(&self) -> bool {
        match self {
            Piece::Equal(symbols) => symbols.is_empty(),
            Piece::Change { deleted, inserted } => deleted.is_empty() && inserted.is_empty(),
        }
    }
}

/// Regroup pieces so that equalities and changes strictly alternate and none
/// is empty.
fn coalesce(pieces: impl IntoIterator<Item = Piece>) -> Vec<Piece> {
    let mut out: Vec<Piece> = Vec::new();
    for piece in pieces {
        if piece.is_empty() {
            continue;
        }
        let unmerged = match out.last_mut() {
            Some(last) => merge_into(last, piece),
            None => Some(piece),
        };
        if let Some(piece) = unmerged {
            out.push(piece);
        }
    }
    out
}

/// Append `piece` to `last` when both are of the same kind; otherwise hand
/// it back.
fn merge_into(last: &mut Piece, piece: Piece) -> Option<Piece> {
    match (last, piece) {
        (Piece::Equal(last), Piece::Equal(symbols)) => {
            last.extend(symbols);
            None
        }
        (
            Piece::Change { deleted, inserted },
            Piece::Change {
                deleted: more_deleted,
                inserted: more_inserted,
            },
        ) => {
            deleted.extend(more_deleted);
            inserted.extend(more_inserted);
            None
        }
        (_, piece) => Some(piece),
    }
}

fn shift_boundaries(pieces: &mut Vec<Piece>) {
    let mut i = 1;
    while i + 1 < pieces.len() {
        if slide(pieces, i) {
            // The emptied equality disappears and its neighbours merge.
            *pieces = coalesce(std::mem::take(pieces));
            i = 1;
        } else {
            i += 1;
        }
    }
}

/// Try to slide the pure change at `i` across one of its flanking
/// equalities, leaving that equality empty. Returns `true` on success.
fn slide(pieces: &mut [Piece], i: usize) -> bool {
    let (before, rest) = pieces.split_at_mut(i);
    let (middle, after) = rest.split_at_mut(1);

    let (Piece::Equal(prev), Piece::Change { deleted, inserted }, Piece::Equal(next)) =
        (&mut before[i - 1], &mut middle[0], &mut after[0])
    else {
        return false;
    };

    let run = match (deleted.is_empty(), inserted.is_empty()) {
        (false, true) => deleted,
        (true, false) => inserted,
        _ => return false,
    };

    if run.ends_with(prev.as_slice()) {
        // p [r p] q  →  [p r] p q
        let keep = run.len() - prev.len();
        let mut shifted = prev.clone();
        shifted.extend_from_slice(&run[..keep]);
        *run = shifted;
        let mut merged = std::mem::take(prev);
        merged.append(next);
        *next = merged;
        true
    } else if run.starts_with(next.as_slice()) {
        // p [q r] q  →  p q [r q]
        let mut shifted = run[next.len()..].to_vec();
        shifted.extend_from_slice(next);
        *run = shifted;
        prev.append(next);
        true
    } else {
        false
    }
}

fn absorb_noise<F>(pieces: &mut Vec<Piece>, edit_cost: usize, weigh: &F)
where
    F: Fn(Symbol) -> usize,
{
    let mut i = 1;
    while i + 1 < pieces.len() {
        if !is_noise(&pieces[i - 1], &pieces[i], &pieces[i + 1], edit_cost, weigh) {
            i += 1;
            continue;
        }

        merge_around(pieces, i);
        // The merged change is larger now, so the equality to its left may
        // have become noise as well.
        i = i.saturating_sub(2).max(1);
    }
}

/// Fold the equality at `i` and the changes on both sides into one change.
fn merge_around(pieces: &mut Vec<Piece>, i: usize) {
    let right = pieces.remove(i + 1);
    let middle = pieces.remove(i);
    if let (
        Piece::Change { deleted, inserted },
        Piece::Equal(equal),
        Piece::Change {
            deleted: right_deleted,
            inserted: right_inserted,
        },
    ) = (&mut pieces[i - 1], middle, right)
    {
        deleted.extend_from_slice(&equal);
        deleted.extend(right_deleted);
        inserted.extend(equal);
        inserted.extend(right_inserted);
    }
}

fn is_noise<F>(left: &Piece, middle: &Piece, right: &Piece, edit_cost: usize, weigh: &F) -> bool
where
    F: Fn(Symbol) -> usize,
{
    match (left, middle, right) {
        (Piece::Change { .. }, Piece::Equal(equal), Piece::Change { .. }) => {
            let w = weight(equal, weigh);
            let (left_size, left_total) = change_size(left, weigh);
            let (right_size, right_total) = change_size(right, weigh);
            w <= left_size.min(right_size) || (w < edit_cost && w <= left_total.min(right_total))
        }
        _ => false,
    }
}

/// `(larger side, both sides)` weights of a change.
fn change_size<F>(piece: &Piece, weigh: &F) -> (usize, usize)
where
    F: Fn(Symbol) -> usize,
{
    match piece {
        Piece::Change { deleted, inserted } => {
            let (d, i) = (weight(deleted, weigh), weight(inserted, weigh));
            (d.max(i), d + i)
        }
        Piece::Equal(_) => (0, 0),
    }
}

fn weight<F>(symbols: &[Symbol], weigh: &F) -> usize
where
    F: Fn(Symbol) -> usize,
{
    symbols.iter().map(|&s| weigh(s)).sum()
}

fn emit(pieces: Vec<Piece>) -> EditScript {
    let mut script = Vec::with_capacity(pieces.len() * 2);
    for piece in pieces {
        match piece {
            Piece::Equal(symbols) => script.push(Edit::new(Operation::Equal, symbols)),
            Piece::Change { deleted, inserted } => {
                if !deleted.is_empty() {
                    script.push(Edit::new(Operation::Delete, deleted));
                }
                if !inserted.is_empty() {
                    script.push(Edit::new(Operation::Insert, inserted));
                }
            }
        }
    }
    script
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn syms(indices: &[usize]) -> Vec<Symbol> {
        indices.iter().map(|&i| Symbol::new(i)).collect()
    }

    fn equal(indices: &[usize]) -> Edit {
        Edit::new(Operation::Equal, syms(indices))
    }

    fn insert(indices: &[usize]) -> Edit {
        Edit::new(Operation::Insert, syms(indices))
    }

    fn delete(indices: &[usize]) -> Edit {
        Edit::new(Operation::Delete, syms(indices))
    }

    fn unit(_: Symbol) -> usize {
        1
    }

    fn rebuild(script: &[Edit], keep: Operation) -> Vec<Symbol> {
        script
            .iter()
            .filter(|e| e.op == Operation::Equal || e.op == keep)
            .flat_map(|e| e.symbols.iter().copied())
            .collect()
    }

    #[test]
    fn empty_script_stays_empty() {
        assert!(cleanup(Vec::new(), 4, unit).is_empty());
    }

    #[test]
    fn tiny_equality_between_edits_is_absorbed() {
        let script = vec![delete(&[1]), equal(&[2]), insert(&[3])];
        assert_eq!(
            cleanup(script, 4, unit),
            vec![delete(&[1, 2]), insert(&[2, 3])]
        );
    }

    #[test]
    fn leading_and_trailing_equalities_survive() {
        let script = vec![equal(&[1]), delete(&[2]), insert(&[3]), equal(&[4])];
        assert_eq!(cleanup(script.clone(), 100, unit), script);
    }

    #[test]
    fn large_equality_is_kept() {
        let script = vec![
            delete(&[1]),
            equal(&[2, 3, 4, 5, 6]),
            insert(&[7]),
        ];
        assert_eq!(cleanup(script.clone(), 4, unit), script);
    }

    #[test]
    fn equality_smaller_than_both_changes_is_absorbed_at_zero_cost() {
        let script = vec![
            delete(&[1, 2, 3]),
            insert(&[4, 5, 6]),
            equal(&[7, 8]),
            delete(&[9, 10, 11]),
        ];
        assert_eq!(
            cleanup(script, 0, unit),
            vec![delete(&[1, 2, 3, 7, 8, 9, 10, 11]), insert(&[4, 5, 6, 7, 8])]
        );
    }

    #[test]
    fn absorption_cascades_into_grown_changes() {
        // The second equality (weight 3) only becomes absorbable once the
        // first merge has grown the change to its left.
        let script = vec![
            delete(&[1, 2]),
            equal(&[3]),
            delete(&[4]),
            equal(&[5, 6, 7]),
            delete(&[8, 9, 10]),
        ];
        let cleaned = cleanup(script, 2, unit);
        assert_eq!(
            cleaned,
            vec![
                delete(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
                insert(&[3, 5, 6, 7]),
            ]
        );
    }

    #[test]
    fn cheap_equality_between_small_replacements_is_kept() {
        // k/s [itt] en/ing: three shared symbols outweigh the two-symbol
        // replacement on the left.
        let script = vec![
            delete(&[1]),
            insert(&[2]),
            equal(&[3, 4, 4]),
            delete(&[5, 6]),
            insert(&[7, 6, 8]),
        ];
        assert_eq!(cleanup(script.clone(), 4, unit), script);
    }

    #[test]
    fn cheap_equality_next_to_pure_edit_is_kept() {
        let script = vec![
            equal(&[1]),
            insert(&[2]),
            equal(&[3, 4, 5]),
            delete(&[6]),
            insert(&[7, 8, 9]),
            equal(&[10]),
        ];
        assert_eq!(cleanup(script.clone(), 4, unit), script);
    }

    #[test]
    fn edit_cost_absorbs_equality_between_replacements() {
        let script = vec![
            delete(&[1, 2]),
            insert(&[3, 4]),
            equal(&[5, 6]),
            delete(&[7]),
            insert(&[8]),
        ];
        // Too heavy for the larger-side rule (2 > 1) and not below cost 2.
        assert_eq!(cleanup(script.clone(), 2, unit), script);
        assert_eq!(
            cleanup(script, 3, unit),
            vec![delete(&[1, 2, 5, 6, 7]), insert(&[3, 4, 5, 6, 8])]
        );
    }

    #[test]
    fn weights_decide_absorption() {
        let script = vec![delete(&[1]), equal(&[2]), insert(&[3])];
        // Symbol 2 stands for a long token, so it is meaningful.
        let heavy = |s: Symbol| if s.index() == 2 { 10 } else { 1 };
        assert_eq!(cleanup(script.clone(), 4, heavy), script);
    }

    #[test]
    fn insertion_slides_left_over_matching_equality() {
        // A [B A] C  →  [A B] A C
        let script = vec![equal(&[1]), insert(&[2, 1]), equal(&[3])];
        assert_eq!(
            cleanup(script, 0, unit),
            vec![insert(&[1, 2]), equal(&[1, 3])]
        );
    }

    #[test]
    fn deletion_slides_right_over_matching_equality() {
        // A [C B] C  →  A C [B C]
        let script = vec![equal(&[1]), delete(&[3, 2]), equal(&[3])];
        assert_eq!(
            cleanup(script, 0, unit),
            vec![equal(&[1, 3]), delete(&[2, 3])]
        );
    }

    #[test]
    fn adjacent_runs_are_coalesced() {
        let script = vec![
            equal(&[1]),
            equal(&[2]),
            insert(&[3]),
            delete(&[4]),
            insert(&[5]),
            equal(&[]),
        ];
        assert_eq!(
            cleanup(script, 0, unit),
            vec![equal(&[1, 2]), delete(&[4]), insert(&[3, 5])]
        );
    }

    fn op_strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            Just(Operation::Equal),
            Just(Operation::Insert),
            Just(Operation::Delete),
        ]
    }

    fn script_strategy() -> impl Strategy<Value = EditScript> {
        prop::collection::vec(
            (op_strategy(), prop::collection::vec(0usize..4, 0..4)),
            0..12,
        )
        .prop_map(|runs| {
            runs.into_iter()
                .map(|(op, indices)| Edit::new(op, syms(&indices)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn cleanup_is_idempotent(script in script_strategy(), cost in 0usize..6) {
            let once = cleanup(script, cost, unit);
            let twice = cleanup(once.clone(), cost, unit);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn cleanup_preserves_both_sides(script in script_strategy(), cost in 0usize..6) {
            let cleaned = cleanup(script.clone(), cost, unit);
            prop_assert_eq!(rebuild(&cleaned, Operation::Delete), rebuild(&script, Operation::Delete));
            prop_assert_eq!(rebuild(&cleaned, Operation::Insert), rebuild(&script, Operation::Insert));
        }

        #[test]
        fn cleaned_runs_alternate_and_are_non_empty(script in script_strategy(), cost in 0usize..6) {
            let cleaned = cleanup(script, cost, unit);
            for pair in cleaned.windows(2) {
                prop_assert_ne!(pair[0].op, pair[1].op);
            }
            prop_assert!(cleaned.iter().all(|e| !e.is_empty()));
        }

        #[test]
        fn higher_cost_never_adds_runs(script in script_strategy(), low in 0usize..5, extra in 0usize..5) {
            let fine = cleanup(script.clone(), low, unit);
            let coarse = cleanup(script, low + extra, unit);
            prop_assert!(coarse.len() <= fine.len());
        }
    }
}
