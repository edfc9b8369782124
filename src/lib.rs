#![forbid(unsafe_code)]

//! Seeding and sizing engine for esports tournaments.
//!
//! Everything here is a pure function over the data the caller passes in: bracket seeding
//! with byes ([`seeding`]), randomized draws ([`shuffle`]), Swiss-system sizing ([`swiss`])
//! and group sizing/draws ([`groups`]). [`config`] reads the format fragment of a stored
//! tournament configuration and turns it into a plan.

use rand::{thread_rng, Rng};

pub mod config;
pub mod groups;
pub mod seeding;
pub mod shuffle;
pub mod swiss;
pub mod traits;

pub use rand_seeder::Seeder;
pub use traits::{DisplayData, Entrant, TeamEntry};

/// Minimum number of entrants needed to build a bracket.
pub const MIN_ENTRANTS: usize = seeding::MIN_ENTRANTS;

/// The random generator used for every randomized draw.
pub type RandGen = rand_pcg::Pcg64;

/// Generates a new random seed, suitable for [`Seeder::from`].
#[inline]
pub fn gen_seed() -> [u8; 32] {
    thread_rng().gen()
}

/// Creates a [`Seeder`] from a new random seed.
#[inline]
pub fn gen_seeder() -> Seeder {
    Seeder::from(gen_seed())
}
