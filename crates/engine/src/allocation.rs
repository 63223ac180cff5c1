//! Fair-share allocation of a total across weighted participants.
//!
//! The engine splits a real-valued total into whole units, proportionally to
//! each participant's weight, so that the integer shares add up **exactly**
//! to the rounded total (largest remainder method, a.k.a. Hamilton
//! apportionment):
//!
//! 1. the grand total is rounded once (half away from zero) to get the target;
//! 2. a single rate `total / total_weight` is computed;
//! 3. every participant gets `floor(weight × rate)`;
//! 4. the units still missing to reach the target are handed out, one each,
//!    to the participants with the largest dropped fraction.
//!
//! Ties between equal fractions are broken by input order: the sort is
//! stable, so the participant listed first wins. Callers that want
//! reproducible results must therefore pass participants in a stable order.
//!
//! ```rust
//! use engine::{Participant, allocate};
//!
//! let participants = vec![
//!     Participant::new("a", 1.0),
//!     Participant::new("b", 1.0),
//!     Participant::new("c", 1.0),
//! ];
//! let allocation = allocate(7.0, &participants).unwrap();
//! assert_eq!(allocation.get(&"a"), Some(3));
//! assert_eq!(allocation.get(&"b"), Some(2));
//! assert_eq!(allocation.total(), 7);
//! ```
//!
//! The function is pure: it reads only its arguments, so it can be called
//! from any number of threads at once.

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use crate::{EngineError, ResultEngine};

/// A participant in an allocation: an opaque id and a non-negative weight.
#[derive(Clone, Debug, PartialEq)]
pub struct Participant<K> {
    pub id: K,
    pub weight: f64,
}

impl<K> Participant<K> {
    pub fn new(id: K, weight: f64) -> Self {
        Self { id, weight }
    }
}

/// Result of [`allocate`]: the integer share of every participant.
///
/// Shares are kept in the order the participants were given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation<K> {
    shares: Vec<(K, i64)>,
}

impl<K> Allocation<K> {
    /// Iterate `(id, share)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, i64)> {
        self.shares.iter().map(|(id, share)| (id, *share))
    }

    /// Sum of all shares.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.shares.iter().map(|(_, share)| share).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

impl<K: PartialEq> Allocation<K> {
    /// Share allocated to `id`, if `id` took part in the allocation.
    pub fn get(&self, id: &K) -> Option<i64> {
        self.shares
            .iter()
            .find_map(|(key, share)| (key == id).then_some(*share))
    }
}

impl<K: Eq + Hash> Allocation<K> {
    pub fn into_map(self) -> HashMap<K, i64> {
        self.shares.into_iter().collect()
    }
}

impl<K> IntoIterator for Allocation<K> {
    type Item = (K, i64);
    type IntoIter = std::vec::IntoIter<(K, i64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.into_iter()
    }
}

/// Split `total_cost` across `participants` proportionally to their weight.
///
/// Guarantees, for valid input:
/// - an empty list yields an empty allocation;
/// - when every weight is zero every share is zero (no division happens);
/// - otherwise the shares sum to `total_cost.round()` exactly, and each
///   share is within one unit of `weight / total_weight × total_cost`.
///
/// # Errors
///
/// [`EngineError::InvalidArgument`] when `total_cost` or a weight is
/// negative or not finite, when two participants share the same id, or when
/// the rounded total does not fit in an `i64`.
pub fn allocate<K>(total_cost: f64, participants: &[Participant<K>]) -> ResultEngine<Allocation<K>>
where
    K: Clone + Eq + Hash,
{
    if !total_cost.is_finite() || total_cost < 0.0 {
        return Err(EngineError::InvalidArgument(format!(
            "total cost must be finite and >= 0, got {total_cost}"
        )));
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !participant.weight.is_finite() || participant.weight < 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "weight must be finite and >= 0, got {}",
                participant.weight
            )));
        }
        if !seen.insert(&participant.id) {
            return Err(EngineError::InvalidArgument(
                "duplicate participant id".to_string(),
            ));
        }
    }

    let total_weight: f64 = participants.iter().map(|p| p.weight).sum();
    if total_weight == 0.0 {
        return Ok(Allocation {
            shares: participants.iter().map(|p| (p.id.clone(), 0)).collect(),
        });
    }

    let rate = total_cost / total_weight;
    if !rate.is_finite() {
        return Err(EngineError::InvalidArgument(format!(
            "total weight {total_weight} is too small to split {total_cost}"
        )));
    }
    let too_large = || {
        EngineError::InvalidArgument(format!(
            "total cost {total_cost} does not fit in whole units"
        ))
    };
    let rounded = total_cost.round();
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    if rounded >= i64::MAX as f64 {
        return Err(too_large());
    }
    let target = rounded as i64;

    let mut shares = Vec::with_capacity(participants.len());
    let mut fractions = Vec::with_capacity(participants.len());
    let mut floor_sum = 0i64;
    for (index, participant) in participants.iter().enumerate() {
        let exact = participant.weight * rate;
        let base = exact.floor();
        floor_sum = floor_sum
            .checked_add(base as i64)
            .ok_or_else(too_large)?;
        shares.push((participant.id.clone(), base as i64));
        fractions.push((index, exact - base));
    }

    // Each floor drops less than one unit, so the gap is at most `len`.
    let remainder = (target - floor_sum).clamp(0, participants.len() as i64) as usize;

    // `sort_by` is stable: equal fractions keep the input order.
    fractions.sort_by(|a, b| b.1.total_cmp(&a.1));
    for &(index, _) in fractions.iter().take(remainder) {
        shares[index].1 += 1;
    }

    Ok(Allocation { shares })
}

/// Split an integer `total` evenly across `ids` (weight 1 each).
///
/// The first ids in iteration order absorb the leftover units.
pub fn split_evenly<K, I>(total: i64, ids: I) -> ResultEngine<Allocation<K>>
where
    K: Clone + Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let participants: Vec<Participant<K>> =
        ids.into_iter().map(|id| Participant::new(id, 1.0)).collect();
    allocate(total as f64, &participants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equal(ids: &[&'static str], weight: f64) -> Vec<Participant<&'static str>> {
        ids.iter().map(|id| Participant::new(*id, weight)).collect()
    }

    #[test]
    fn three_equal_participants_share_one_hundred() {
        let allocation = allocate(100.0, &equal(&["a", "b", "c"], 10.0)).unwrap();

        assert_eq!(allocation.get(&"a"), Some(34));
        assert_eq!(allocation.get(&"b"), Some(33));
        assert_eq!(allocation.get(&"c"), Some(33));
        assert_eq!(allocation.total(), 100);
    }

    #[test]
    fn zero_total_gives_zero_to_everyone() {
        let participants = vec![Participant::new("a", 3.0), Participant::new("b", 1.5)];
        let allocation = allocate(0.0, &participants).unwrap();

        assert!(allocation.iter().all(|(_, share)| share == 0));
    }

    #[test]
    fn zero_total_weight_does_not_divide() {
        let allocation = allocate(50.0, &equal(&["a", "b"], 0.0)).unwrap();

        assert_eq!(allocation.get(&"a"), Some(0));
        assert_eq!(allocation.get(&"b"), Some(0));
        assert_eq!(allocation.total(), 0);
    }

    #[test]
    fn single_participant_takes_everything() {
        let allocation = allocate(10.0, &equal(&["a"], 1.0)).unwrap();
        assert_eq!(allocation.get(&"a"), Some(10));
    }

    #[test]
    fn one_leftover_unit_goes_to_the_first_tied_participant() {
        let allocation = allocate(7.0, &equal(&["a", "b", "c"], 1.0)).unwrap();

        assert_eq!(
            allocation.iter().collect::<Vec<_>>(),
            vec![(&"a", 3), (&"b", 2), (&"c", 2)]
        );
    }

    #[test]
    fn tie_break_follows_input_order() {
        let allocation = allocate(7.0, &equal(&["c", "b", "a"], 1.0)).unwrap();

        assert_eq!(allocation.get(&"c"), Some(3));
        assert_eq!(allocation.get(&"a"), Some(2));
    }

    #[test]
    fn largest_fraction_wins_the_leftover() {
        let participants = vec![
            Participant::new("a", 1.0),
            Participant::new("b", 2.0),
            Participant::new("c", 4.0),
        ];
        // rate = 10 / 7: exact = 1.43, 2.86, 5.71 -> floors 1, 2, 5 (sum 8)
        let allocation = allocate(10.0, &participants).unwrap();

        assert_eq!(allocation.get(&"a"), Some(1));
        assert_eq!(allocation.get(&"b"), Some(3));
        assert_eq!(allocation.get(&"c"), Some(6));
        assert_eq!(allocation.total(), 10);
    }

    #[test]
    fn fractional_total_is_rounded_once() {
        let allocation = allocate(10.5, &equal(&["a", "b"], 1.0)).unwrap();
        assert_eq!(allocation.total(), 11);

        let allocation = allocate(10.49, &equal(&["a", "b"], 1.0)).unwrap();
        assert_eq!(allocation.total(), 10);
    }

    #[test]
    fn half_meals_are_valid_weights() {
        let participants = vec![Participant::new("a", 0.5), Participant::new("b", 1.5)];
        let allocation = allocate(100.0, &participants).unwrap();

        assert_eq!(allocation.get(&"a"), Some(25));
        assert_eq!(allocation.get(&"b"), Some(75));
    }

    #[test]
    fn empty_participants_give_empty_allocation() {
        let allocation = allocate::<&str>(42.0, &[]).unwrap();
        assert!(allocation.is_empty());
        assert_eq!(allocation.total(), 0);
    }

    #[test]
    fn negative_input_is_rejected() {
        assert!(matches!(
            allocate(-1.0, &equal(&["a"], 1.0)),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            allocate(1.0, &equal(&["a"], -1.0)),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            allocate(f64::NAN, &equal(&["a"], 1.0)),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        assert!(matches!(
            allocate(1.0, &equal(&["a", "a"], 1.0)),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn split_evenly_distributes_leftover_to_first_ids() {
        let allocation = split_evenly(1001, ["x", "y", "z"]).unwrap();

        assert_eq!(allocation.get(&"x"), Some(334));
        assert_eq!(allocation.get(&"y"), Some(334));
        assert_eq!(allocation.get(&"z"), Some(333));
    }

    #[test]
    fn into_map_keeps_every_share() {
        let map = allocate(9.0, &equal(&["a", "b", "c"], 1.0))
            .unwrap()
            .into_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map.values().sum::<i64>(), 9);
    }

    #[test]
    fn totals_beyond_i64_are_rejected() {
        for (total, ids) in [(1e19, &["a", "b"][..]), (1e20, &["a"][..])] {
            assert!(matches!(
                allocate(total, &equal(ids, 1.0)),
                Err(EngineError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn large_totals_below_the_limit_still_add_up() {
        let allocation = allocate(4e18, &equal(&["a", "b"], 1.0)).unwrap();

        assert_eq!(allocation.get(&"a"), Some(2_000_000_000_000_000_000));
        assert_eq!(allocation.total(), 4_000_000_000_000_000_000);
    }
}
