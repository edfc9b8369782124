use crate::traits::Entrant;
use crate::{gen_seeder, RandGen, Seeder};
use rand::prelude::SliceRandom;
use rand::Rng;
use tracing::trace;

/// Draws a random order for the entrants and reseeds them by that order.
///
/// The input is left untouched. Every entrant of the returned list has its seed overwritten with
/// its new 1-based position, discarding any previous seed.
#[inline]
pub fn shuffle_teams<E: Entrant + Clone>(entrants: &[E]) -> Vec<E> {
    shuffle_teams_with_seeder(entrants, gen_seeder())
}

/// Like [`shuffle_teams`], but the draw is fully determined by `seeder`.
pub fn shuffle_teams_with_seeder<E: Entrant + Clone>(entrants: &[E], mut seeder: Seeder) -> Vec<E> {
    let mut rng: RandGen = seeder.make_rng();
    shuffle_teams_with_rng(entrants, &mut rng)
}

/// Like [`shuffle_teams`], drawing from the provided random generator.
pub fn shuffle_teams_with_rng<E: Entrant + Clone>(entrants: &[E], rng: &mut impl Rng) -> Vec<E> {
    let mut drawn = entrants.to_vec();
    // Fisher-Yates
    drawn.shuffle(rng);

    for (i, entrant) in drawn.iter_mut().enumerate() {
        entrant.assign_seed(i as u32 + 1);
        trace!(id = entrant.id(), seed = i + 1, "drawn");
    }
    drawn
}
