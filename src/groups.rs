use crate::traits::Entrant;
use crate::{RandGen, Seeder};
use rand::prelude::SliceRandom;
use rand::Rng;
use std::marker::PhantomData;
use std::num::NonZero;
use thiserror::Error;
use tracing::debug;

/// Minimum number of teams per group.
pub const MIN_TEAMS_PER_GROUP: usize = 2;

/// Returns the maximum number of teams a group holds when `total_teams` are split into `groups`.
#[inline]
pub fn calculate_max_teams_per_group(total_teams: usize, groups: NonZero<usize>) -> usize {
    total_teams.div_ceil(groups.get())
}

/// Drawn groups.
pub struct Groups<'a, E: Entrant> {
    /// The drawn groups.
    pub groups: Vec<Group<'a, E>>,

    _phantom: PhantomData<()>,
}

/// A drawn group.
#[derive(Debug)]
pub struct Group<'a, E: Entrant> {
    /// The teams making part of this group, strongest draw first.
    pub teams: Vec<&'a E>,

    /// The round-robin schedule of the group. Nobody plays twice in the same round.
    pub rounds: Vec<Vec<Duel<'a, E>>>,

    _phantom: PhantomData<()>,
}

impl<'a, E: Entrant> Group<'a, E> {
    #[inline]
    fn new() -> Group<'a, E> {
        Group {
            teams: Vec::new(),
            rounds: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Iterates over every duel of the group, in schedule order.
    #[inline]
    pub fn duels(&self) -> impl Iterator<Item = &Duel<'a, E>> + '_ {
        self.rounds.iter().flatten()
    }
}

impl<E: Entrant> Clone for Group<'_, E> {
    #[inline]
    fn clone(&self) -> Self {
        Group {
            teams: self.teams.clone(),
            rounds: self.rounds.clone(),
            _phantom: PhantomData,
        }
    }
}

/// A duel of a drawn group.
#[derive(Debug)]
pub struct Duel<'a, E: Entrant> {
    /// Team playing at home (or on the first side).
    pub home: &'a E,
    /// Team playing away (or on the second side).
    pub away: &'a E,

    _phantom: PhantomData<()>,
}

impl<E: Entrant> Clone for Duel<'_, E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entrant> Copy for Duel<'_, E> {}

#[derive(Error, Debug)]
#[cfg_attr(test, derive(Eq, PartialEq))]
#[non_exhaustive]
pub enum GroupDrawError {
    /// Not enough teams for the provided number of groups (see [`MIN_TEAMS_PER_GROUP`]).
    #[error("not enough teams to draw groups ({0} needed, but {1} were provided)")]
    NotEnoughTeams(usize, usize),
}

/// Draws `number_of_groups` groups from the provided teams.
///
/// Teams are dealt by seed in serpentine order (1st pass left to right, 2nd pass right to left,
/// ...) so each group gets a comparable spread of strength. Unseeded teams, and teams sharing a
/// seed, are dealt in a random order determined by `seeder`.
pub fn draw_groups<E: Entrant>(
    teams: &[E],
    number_of_groups: NonZero<usize>,
    mut seeder: Seeder,
) -> Result<Groups<E>, GroupDrawError> {
    let count = number_of_groups.get();
    if teams.len() < count * MIN_TEAMS_PER_GROUP {
        return Err(GroupDrawError::NotEnoughTeams(
            count * MIN_TEAMS_PER_GROUP,
            teams.len(),
        ));
    }

    let mut rng: RandGen = seeder.make_rng();

    let mut order: Vec<&E> = teams.iter().collect();
    order.shuffle(&mut rng);
    order.sort_by_key(|t| (t.seed().is_none(), t.seed())); // Stable, so ties keep the shuffled order

    let mut groups: Vec<_> = (0..count).map(|_| Group::new()).collect();
    for (i, team) in order.into_iter().enumerate() {
        let (pass, pos) = (i / count, i % count);
        let index = if pass % 2 == 0 { pos } else { count - 1 - pos };
        groups[index].teams.push(team);
    }

    for group in &mut groups {
        group.rounds = round_robin(&group.teams, &mut rng);
    }

    debug!(
        teams = teams.len(),
        groups = count,
        max_per_group = calculate_max_teams_per_group(teams.len(), number_of_groups),
        "drew groups"
    );

    Ok(Groups {
        groups,
        _phantom: PhantomData,
    })
}

fn round_robin<'a, E: Entrant>(teams: &[&'a E], rng: &mut impl Rng) -> Vec<Vec<Duel<'a, E>>> {
    // Circle method: the first slot stays, the others rotate by one each round
    let mut slots: Vec<Option<&'a E>> = teams.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let len = slots.len();
    let mut rounds = Vec::with_capacity(len.saturating_sub(1));
    for _ in 1..len {
        let round: Vec<_> = (0..len / 2)
            .filter_map(|i| match (slots[i], slots[len - 1 - i]) {
                (Some(t1), Some(t2)) => {
                    let (home, away) = if rng.gen() { (t1, t2) } else { (t2, t1) };
                    Some(Duel {
                        home,
                        away,
                        _phantom: PhantomData,
                    })
                }
                _ => None,
            })
            .collect();
        rounds.push(round);
        slots[1..].rotate_right(1);
    }

    rounds
}

#[cfg(test)]
mod test {
    use crate::groups::{calculate_max_teams_per_group, draw_groups, GroupDrawError, MIN_TEAMS_PER_GROUP};
    use crate::{gen_seed, gen_seeder, Entrant, Seeder, TeamEntry};
    use itertools::Itertools;
    use std::collections::HashSet;
    use std::num::NonZero;

    fn teams(n: usize) -> Vec<TeamEntry> {
        (1..=n).map(|i| TeamEntry::seeded(format!("t{i}"), i as u32)).collect()
    }

    #[test]
    fn test_groups() {
        // Run with --nocapture

        let mut teams = teams(6);
        teams.extend(["X", "Y", "Z"].into_iter().map(TeamEntry::new));
        let groups = draw_groups(&teams, NonZero::new(2).unwrap(), gen_seeder()).unwrap();

        let mut i = 0;
        for group in groups.groups {
            i += 1;
            println!("Group {i}:");
            println!("\tTeams:");
            for team in &group.teams {
                println!("\t\t{} ({:?})", team.id, team.seed);
            }
            println!("\tDuels:");
            for (round, duels) in group.rounds.iter().enumerate() {
                for duel in duels {
                    println!("\t\t{}: {} -> {}", round + 1, duel.home.id, duel.away.id);
                }
            }
        }
    }

    #[test]
    fn max_teams_per_group() {
        assert_eq!(calculate_max_teams_per_group(10, NonZero::new(3).unwrap()), 4);
        assert_eq!(calculate_max_teams_per_group(9, NonZero::new(3).unwrap()), 3);
        assert_eq!(calculate_max_teams_per_group(8, NonZero::new(1).unwrap()), 8);
        assert_eq!(calculate_max_teams_per_group(0, NonZero::new(4).unwrap()), 0);
    }

    #[test]
    fn not_enough_teams() {
        let teams = teams(5);
        let err = draw_groups(&teams, NonZero::new(3).unwrap(), gen_seeder()).err();
        assert_eq!(err, Some(GroupDrawError::NotEnoughTeams(6, 5)));
    }

    #[test]
    fn serpentine_deal() {
        let teams = teams(8);
        let groups = draw_groups(&teams, NonZero::new(2).unwrap(), gen_seeder()).unwrap();
        let seeds: Vec<Vec<_>> = groups
            .groups
            .iter()
            .map(|g| g.teams.iter().map(|t| t.seed().unwrap()).collect())
            .collect();
        assert_eq!(seeds, vec![vec![1, 4, 5, 8], vec![2, 3, 6, 7]]);
    }

    #[test]
    fn test_large_groups() {
        for n in MIN_TEAMS_PER_GROUP..=60 {
            for g in 1..=(n / MIN_TEAMS_PER_GROUP).min(8) {
                let groups_count = NonZero::new(g).unwrap();
                let teams = teams(n);
                let groups = draw_groups(&teams, groups_count, gen_seeder()).unwrap();
                let max = calculate_max_teams_per_group(n, groups_count);

                assert_eq!(groups.groups.len(), g);
                assert_eq!(groups.groups.iter().map(|g| g.teams.len()).sum::<usize>(), n);

                for group in &groups.groups {
                    assert!(group.teams.len() <= max);
                    assert!(group.teams.len() >= MIN_TEAMS_PER_GROUP);

                    // Every pair meets exactly once
                    let size = group.teams.len();
                    let pairs: HashSet<_> = group
                        .duels()
                        .map(|d| [d.home.id.as_str(), d.away.id.as_str()].into_iter().sorted().collect_vec())
                        .collect();
                    assert_eq!(group.duels().count(), size * (size - 1) / 2);
                    assert_eq!(pairs.len(), size * (size - 1) / 2);
                    for (t1, t2) in group.teams.iter().tuple_combinations() {
                        let pair = [t1.id.as_str(), t2.id.as_str()].into_iter().sorted().collect_vec();
                        assert!(pairs.contains(&pair));
                    }

                    // Nobody plays twice in a round
                    for round in &group.rounds {
                        let playing: HashSet<_> = round.iter().flat_map(|d| [d.home.id.as_str(), d.away.id.as_str()]).collect();
                        assert_eq!(playing.len(), round.len() * 2);
                    }
                }
            }
        }
    }

    #[test]
    fn test_reproducibility() {
        let mut teams = teams(4);
        teams.extend((0..8).map(|i| TeamEntry::new(format!("u{i}"))));

        let describe = |seed: [u8; 32]| -> Vec<Vec<String>> {
            draw_groups(&teams, NonZero::new(3).unwrap(), Seeder::from(seed))
                .unwrap()
                .groups
                .iter()
                .map(|g| g.duels().map(|d| format!("{}-{}", d.home.id, d.away.id)).collect())
                .collect()
        };

        // Execute a bunch of times to test against different seeds
        for _ in 0..50 {
            let seed = gen_seed();
            assert_eq!(describe(seed), describe(seed));
        }
    }
}
