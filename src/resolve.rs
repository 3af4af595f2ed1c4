//! Closest-match selection among the declared types that accept a value.
//!
//! Every declared type reachable from the value's type is a [`Candidate`].
//! A candidate *beats* another when it is reached by a better [`Rank`], or by
//! the same rank with a smaller priority. The winner is the one candidate no
//! other candidate beats.

use crate::conversion::Rank;
use smallvec::SmallVec;

/// A declared type that accepts the value being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Index of the declared type in its schema.
    pub slot: usize,
    /// How directly the value converts into the declared type.
    pub rank: Rank,
    /// Tie-breaker between equal ranks; smaller wins.
    pub priority: usize,
}

impl Candidate {
    /// A candidate whose priority is its declaration position.
    pub fn declared(slot: usize, rank: Rank) -> Self {
        Self {
            slot,
            rank,
            priority: slot,
        }
    }

    /// Returns true if `self` is strictly more specific than `other`.
    pub fn beats(&self, other: &Candidate) -> bool {
        (self.rank, self.priority) < (other.rank, other.priority)
    }
}

/// The outcome of resolving a value against a set of candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one candidate is beaten by no other.
    Unique(usize),
    /// Several candidates are equally specific; holds their slots.
    Ambiguous(SmallVec<[usize; 4]>),
    /// Nothing accepts the value.
    NoCandidate,
}

/// Picks the closest match among `candidates`.
///
/// With priorities taken from declaration order (see
/// [`Candidate::declared`]) the result is never `Ambiguous`.
pub fn resolve(candidates: &[Candidate]) -> Resolution {
    let unbeaten: SmallVec<[usize; 4]> = candidates
        .iter()
        .filter(|candidate| !candidates.iter().any(|other| other.beats(candidate)))
        .map(|candidate| candidate.slot)
        .collect();

    match unbeaten.as_slice() {
        [] => Resolution::NoCandidate,
        [slot] => Resolution::Unique(*slot),
        _ => Resolution::Ambiguous(unbeaten),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_no_candidates() {
        assert_eq!(resolve(&[]), Resolution::NoCandidate);
    }

    #[test]
    fn test_better_rank_wins_regardless_of_order() {
        let candidates = [
            Candidate::declared(0, Rank::Standard),
            Candidate::declared(1, Rank::Promotion),
            Candidate::declared(2, Rank::UserDefined),
        ];
        assert_eq!(resolve(&candidates), Resolution::Unique(1));
    }

    #[test]
    fn test_exact_beats_everything() {
        let candidates = [
            Candidate::declared(0, Rank::Promotion),
            Candidate::declared(3, Rank::Exact),
        ];
        assert_eq!(resolve(&candidates), Resolution::Unique(3));
    }

    #[test]
    fn test_equal_rank_falls_back_to_declaration_order() {
        let candidates = [
            Candidate::declared(4, Rank::Standard),
            Candidate::declared(2, Rank::Standard),
        ];
        assert_eq!(resolve(&candidates), Resolution::Unique(2));
    }

    #[test]
    fn test_equal_rank_and_priority_is_ambiguous() {
        let candidates = [
            Candidate {
                slot: 0,
                rank: Rank::Standard,
                priority: 1,
            },
            Candidate {
                slot: 2,
                rank: Rank::Standard,
                priority: 1,
            },
            Candidate {
                slot: 3,
                rank: Rank::UserDefined,
                priority: 0,
            },
        ];
        assert_eq!(resolve(&candidates), Resolution::Ambiguous(smallvec![0, 2]));
    }

    #[test]
    fn test_beats_is_strict() {
        let a = Candidate::declared(0, Rank::Exact);
        assert!(!a.beats(&a));
    }
}
