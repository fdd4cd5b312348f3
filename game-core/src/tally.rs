use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Player, PlayerId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct VoteTally {
    ballots: BTreeMap<PlayerId, PlayerId>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cast(&mut self, voter: PlayerId, candidate: PlayerId) {
        self.ballots.insert(voter, candidate);
    }

    pub fn clear(&mut self) {
        self.ballots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    pub fn voters(&self) -> usize {
        self.ballots.len()
    }

    pub fn ballots(&self) -> &BTreeMap<PlayerId, PlayerId> {
        &self.ballots
    }

    pub fn counts(&self, players: &[Player]) -> BTreeMap<PlayerId, u32> {
        let mut counts: BTreeMap<PlayerId, u32> = players
            .iter()
            .filter(|p| p.is_active())
            .map(|p| (p.id, 0))
            .collect();
        for candidate in self.ballots.values() {
            *counts.entry(*candidate).or_insert(0) += 1;
        }
        counts
    }
}

pub fn leaders(counts: &BTreeMap<PlayerId, u32>) -> Vec<PlayerId> {
    let Some(max) = counts.values().copied().max().filter(|max| *max > 0) else {
        return Vec::new();
    };
    counts
        .iter()
        .filter(|(_, count)| **count == max)
        .map(|(id, _)| *id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::new(i, format!("p{i}"))).collect()
    }

    #[test]
    fn counts_include_every_active_player() {
        let mut players = roster(4);
        players[3].eliminated = true;
        let mut tally = VoteTally::new();
        tally.cast(0, 1);

        let counts = tally.counts(&players);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&0], 0);
        assert_eq!(counts[&1], 1);
        assert_eq!(counts[&2], 0);
        assert!(!counts.contains_key(&3));
    }

    #[test]
    fn recast_replaces_previous_ballot() {
        let players = roster(4);
        let mut tally = VoteTally::new();
        tally.cast(0, 1);
        tally.cast(2, 1);
        tally.cast(0, 3);

        let counts = tally.counts(&players);
        assert_eq!(counts[&1], 1);
        assert_eq!(counts[&3], 1);
        assert_eq!(counts.values().sum::<u32>(), 2);
        assert_eq!(tally.voters(), 2);
    }

    #[test]
    fn sum_of_counts_equals_distinct_voters() {
        let players = roster(6);
        let mut tally = VoteTally::new();
        let casts = [(0, 1), (1, 2), (0, 2), (3, 2), (4, 5), (3, 1), (1, 1)];
        for (voter, candidate) in casts {
            tally.cast(voter, candidate);
            let total: u32 = tally.counts(&players).values().sum();
            assert_eq!(total as usize, tally.voters());
        }
        assert_eq!(tally.voters(), 4);
    }

    #[test]
    fn leaders_reports_ties_and_empty_tallies() {
        let mut counts = BTreeMap::new();
        counts.insert(0, 0);
        counts.insert(1, 0);
        assert!(leaders(&counts).is_empty());

        counts.insert(1, 2);
        counts.insert(2, 2);
        counts.insert(3, 1);
        assert_eq!(leaders(&counts), vec![1, 2]);

        counts.insert(3, 3);
        assert_eq!(leaders(&counts), vec![3]);
    }

    #[test]
    fn clear_drops_all_ballots() {
        let mut tally = VoteTally::new();
        tally.cast(0, 1);
        tally.clear();
        assert!(tally.is_empty());
    }
}
