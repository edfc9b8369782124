use serde::{Deserialize, Serialize};
use tracing::debug;

/// Field sizes (inclusive upper bounds) at which the Swiss breakpoints change.
const TIERS: [usize; 7] = [4, 8, 16, 32, 64, 128, 256];

/// Rounds played for each tier of [`TIERS`].
const TIER_ROUNDS: [u32; 7] = [2, 3, 5, 6, 7, 8, 9];

/// Number of wins (or losses) that decides a participant, for each tier of [`TIERS`].
const TIER_RECORDS: [u32; 7] = [1, 2, 3, 4, 5, 6, 7];

/// Wins and losses after which a participant stops playing.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RecordThreshold {
    pub wins: u32,
    pub losses: u32,
}

/// Sizing of a Swiss stage, ready to be displayed.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwissPlan {
    pub participants: usize,
    pub rounds: u32,
    pub threshold: RecordThreshold,
    /// Expected matches for rounds `1..=rounds`.
    pub matches_per_round: Vec<usize>,
}

impl SwissPlan {
    pub fn new(participants: usize) -> Self {
        let rounds = calculate_max_rounds(participants);
        let plan = SwissPlan {
            participants,
            rounds,
            threshold: required_wins_losses(participants),
            matches_per_round: (1..=rounds)
                .map(|round| calculate_matches_per_round(participants, round))
                .collect(),
        };
        debug!(
            participants,
            rounds,
            wins = plan.threshold.wins,
            losses = plan.threshold.losses,
            "swiss plan"
        );
        plan
    }

    /// Total number of matches of the stage.
    #[inline]
    pub fn total_matches(&self) -> usize {
        self.matches_per_round.iter().sum()
    }
}

/// Returns the number of Swiss rounds for `participants` participants.
pub fn calculate_max_rounds(participants: usize) -> u32 {
    match tier(participants) {
        Some(i) => TIER_ROUNDS[i],
        None => ceil_log2(participants) + 1,
    }
}

/// Returns the record that takes a participant out of the stage (qualified or eliminated).
///
/// This comes from its own table, not from the round count: between 9 and 256 participants it is
/// `rounds - 2`, elsewhere `rounds - 1`.
pub fn required_wins_losses(participants: usize) -> RecordThreshold {
    let record = match tier(participants) {
        Some(i) => TIER_RECORDS[i],
        None => ceil_log2(participants),
    };
    RecordThreshold {
        wins: record,
        losses: record,
    }
}

/// Returns the expected number of matches in the 1-based `round`.
///
/// Idealized model: every active participant plays once per round, the first half of the active
/// participants win and the second half lose, an odd one out gets a free win. The history is
/// replayed from the first round on every call. Round 0 is treated as the first round.
pub fn calculate_matches_per_round(participants: usize, round: u32) -> usize {
    let threshold = required_wins_losses(participants);
    let mut records = vec![(0u32, 0u32); participants];

    let active = |records: &[(u32, u32)]| -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, &(wins, losses))| wins < threshold.wins && losses < threshold.losses)
            .map(|(i, _)| i)
            .collect()
    };

    for _ in 1..round {
        let playing = active(&records);
        if playing.len() < 2 {
            return 0;
        }

        let half = playing.len() / 2;
        for &i in &playing[..half] {
            records[i].0 += 1;
        }
        for &i in &playing[half..2 * half] {
            records[i].1 += 1;
        }
        if let Some(&bye) = playing.get(2 * half) {
            records[bye].0 += 1;
        }
    }

    active(&records).len() / 2
}

#[inline]
fn tier(participants: usize) -> Option<usize> {
    TIERS.iter().position(|&max| participants <= max)
}

#[inline]
fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}
