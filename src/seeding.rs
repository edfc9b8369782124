use crate::traits::Entrant;
use indexmap::IndexSet;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, trace};

/// Minimum number of entrants to build a bracket.
pub const MIN_ENTRANTS: usize = 2;

/// Number of seeds placed on fixed template positions. Seeds after these are placed first-fit.
pub const TEMPLATE_SEEDS: usize = 8;

/// Returns the number of first-round slots of a bracket for `entrants` entrants.
///
/// This is the smallest power of two greater than or equal to `entrants`, but never less than 2.
#[inline]
pub fn bracket_size(entrants: usize) -> usize {
    entrants.max(MIN_ENTRANTS).next_power_of_two()
}

/// Returns the template slot (1-based) of the `rank`-th seed (1-based) in a bracket of `size` slots.
///
/// [`None`] for ranks after [`TEMPLATE_SEEDS`].
pub fn template_slot(rank: usize, size: usize) -> Option<usize> {
    let half = size / 2;
    let quarter = size / 4;
    match rank {
        1 => Some(1),
        2 => Some(size),
        3 => Some(half),
        4 => Some(half + 1),
        5 => Some(quarter),
        6 => Some(3 * quarter),
        7 => Some(3 * quarter + 1),
        8 => Some(quarter + 1),
        _ => None,
    }
}

/// Shape of a bracket: its size and the slots reserved as byes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BracketLayout {
    /// Number of first-round slots (a power of two).
    pub size: usize,
    /// Reserved bye slots (1-based), in reservation order.
    pub byes: IndexSet<usize>,
}

impl BracketLayout {
    /// Computes the layout of a bracket for `entrants` entrants.
    pub fn for_field(entrants: usize) -> Self {
        let size = bracket_size(entrants);
        let claimed: Vec<usize> = (1..=entrants.min(TEMPLATE_SEEDS))
            .filter_map(|rank| template_slot(rank, size))
            .collect();
        let byes = reserve_byes(size, size - entrants.min(size), |slot| claimed.contains(&slot));
        BracketLayout { size, byes }
    }

    /// Number of byes of the bracket.
    #[inline]
    pub fn bye_count(&self) -> usize {
        self.byes.len()
    }

    /// Returns whether `slot` (1-based) is a bye.
    #[inline]
    pub fn is_bye(&self, slot: usize) -> bool {
        self.byes.contains(&slot)
    }
}

/// A first-round duel of a seeded bracket.
#[derive(Debug)]
pub struct BracketDuel<T> {
    /// The entrant in the odd slot. [`None`] if the bottom entrant automatically passes the turn.
    pub top: Option<T>,
    /// The entrant in the even slot. [`None`] if the top entrant automatically passes the turn.
    pub bottom: Option<T>,

    _phantom: PhantomData<()>,
}

impl<T> BracketDuel<T> {
    /// Returns whether the duel is a bye.
    #[inline]
    pub fn is_bye(&self) -> bool {
        self.top.is_none() || self.bottom.is_none()
    }
}

/// A seeded bracket, padded to its full size.
#[derive(Debug)]
pub struct SeededBracket<E> {
    /// The layout the entrants were placed on.
    pub layout: BracketLayout,
    slots: Vec<Option<E>>,
}

impl<E> SeededBracket<E> {
    /// The slots of the bracket in order. Index 0 is slot 1; empty slots are byes.
    #[inline]
    pub fn slots(&self) -> &[Option<E>] {
        &self.slots
    }

    /// Returns the entrant in `slot` (1-based), if any.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&E> {
        self.slots.get(slot.checked_sub(1)?)?.as_ref()
    }

    /// Returns the first-round duels, pairing slots 1-2, 3-4, ...
    pub fn first_round(&self) -> Vec<BracketDuel<&E>> {
        self.slots
            .chunks(2)
            .map(|pair| BracketDuel {
                top: pair.first().and_then(Option::as_ref),
                bottom: pair.get(1).and_then(Option::as_ref),
                _phantom: PhantomData,
            })
            .collect()
    }

    /// Drops the byes, returning the entrants in slot order.
    #[inline]
    pub fn into_entrants(self) -> Vec<E> {
        self.slots.into_iter().flatten().collect()
    }
}

#[derive(Error, Debug)]
#[cfg_attr(test, derive(Eq, PartialEq))]
#[non_exhaustive]
pub enum SeedingError {
    /// Not enough entrants to build a bracket (see [`MIN_ENTRANTS`]).
    #[error("not enough entrants to build a bracket ({0} needed, but {1} were provided)")]
    NotEnoughEntrants(usize, usize),
}

/// Orders entrants into bracket positions.
///
/// Returns the entrants in slot order with their seeds reassigned to their draw order; byes are
/// omitted. Fewer than [`MIN_ENTRANTS`] entrants are returned unchanged.
pub fn optimize_seeding<E: Entrant>(entrants: Vec<E>) -> Vec<E> {
    if entrants.len() < MIN_ENTRANTS {
        return entrants;
    }

    match seed_bracket(entrants) {
        Ok(bracket) => bracket.into_entrants(),
        Err(_) => unreachable!(), // The length was checked above
    }
}

/// Seeds the entrants into a full bracket, keeping the byes as empty slots.
pub fn seed_bracket<E: Entrant>(mut entrants: Vec<E>) -> Result<SeededBracket<E>, SeedingError> {
    if entrants.len() < MIN_ENTRANTS {
        return Err(SeedingError::NotEnoughEntrants(MIN_ENTRANTS, entrants.len()));
    }

    // Stable, so unseeded entrants keep their input order
    entrants.sort_by_key(|e| (e.seed().is_none(), e.seed()));

    let count = entrants.len();
    let size = bracket_size(count);
    let mut slots: Vec<Option<E>> = Vec::with_capacity(size);
    slots.resize_with(size, || None);

    let mut rest = Vec::with_capacity(count.saturating_sub(TEMPLATE_SEEDS));
    for (i, mut entrant) in entrants.into_iter().enumerate() {
        let rank = i + 1;
        entrant.assign_seed(rank as u32);
        match template_slot(rank, size) {
            Some(slot) if slots[slot - 1].is_none() => slots[slot - 1] = Some(entrant),
            _ => rest.push(entrant),
        }
    }

    let byes = reserve_byes(size, size - count, |slot| slots[slot - 1].is_some());
    debug!(entrants = count, size, byes = byes.len(), "seeding bracket");

    {
        let mut free = (1..=size).filter(|slot| !byes.contains(slot));
        for entrant in rest {
            let slot = free
                .by_ref()
                .find(|&slot| slots[slot - 1].is_none())
                .unwrap_or_else(|| unreachable!("a bracket always has a free slot for each entrant"));
            trace!(id = entrant.id(), seed = ?entrant.seed(), slot, "placed entrant");
            slots[slot - 1] = Some(entrant);
        }
    }

    Ok(SeededBracket {
        layout: BracketLayout { size, byes },
        slots,
    })
}

/// Reserves `count` bye slots among the slots not `occupied`.
///
/// Even slots are tried from the bottom of the bracket up, then odd slots. A slot whose
/// first-round partner is already a bye is only taken if nothing else is left.
fn reserve_byes(size: usize, count: usize, occupied: impl Fn(usize) -> bool) -> IndexSet<usize> {
    let candidates: Vec<usize> = (1..=size / 2)
        .rev()
        .map(|i| 2 * i)
        .chain((1..=size / 2).rev().map(|i| 2 * i - 1))
        .filter(|&slot| !occupied(slot))
        .collect();

    let mut byes = IndexSet::with_capacity(count);
    for &slot in &candidates {
        if byes.len() == count {
            break;
        }
        if !byes.contains(&partner(slot)) {
            byes.insert(slot);
        }
    }
    for &slot in &candidates {
        if byes.len() == count {
            break;
        }
        byes.insert(slot);
    }

    byes
}

#[inline(always)]
fn partner(slot: usize) -> usize {
    if slot % 2 == 0 {
        slot - 1
    } else {
        slot + 1
    }
}
