use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Player, PlayerId, Role};

pub fn assign_roles<R: Rng + ?Sized>(players: &mut [Player], impostor_count: usize, rng: &mut R) {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.shuffle(rng);

    for player in players.iter_mut() {
        player.role = Role::Civilian;
    }
    for &index in order.iter().take(impostor_count) {
        players[index].role = Role::Impostor;
    }
}

pub fn choose_starting_player<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Option<PlayerId> {
    let civilians: Vec<PlayerId> = players
        .iter()
        .filter(|p| p.role == Role::Civilian)
        .map(|p| p.id)
        .collect();
    civilians.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn roster(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::new(i, format!("p{i}"))).collect()
    }

    #[test]
    fn exact_impostor_count_for_every_valid_setup() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in 3..=12 {
            for k in 1..n {
                let mut players = roster(n);
                assign_roles(&mut players, k, &mut rng);
                let impostors = players.iter().filter(|p| p.role == Role::Impostor).count();
                assert_eq!(impostors, k, "n={n} k={k}");

                let start = choose_starting_player(&players, &mut rng).unwrap();
                assert_eq!(players[start].role, Role::Civilian, "n={n} k={k}");
            }
        }
    }

    #[test]
    fn reassignment_resets_previous_roles() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut players = roster(5);
        for p in players.iter_mut() {
            p.role = Role::Impostor;
        }
        assign_roles(&mut players, 1, &mut rng);
        assert_eq!(
            players.iter().filter(|p| p.role == Role::Impostor).count(),
            1
        );
    }

    #[test]
    fn every_player_can_be_chosen() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut hits: HashMap<PlayerId, usize> = HashMap::new();
        for _ in 0..2_000 {
            let mut players = roster(4);
            assign_roles(&mut players, 1, &mut rng);
            let impostor = players.iter().find(|p| p.role == Role::Impostor).unwrap();
            *hits.entry(impostor.id).or_default() += 1;
        }
        assert_eq!(hits.len(), 4);
        for count in hits.values() {
            // 500 expected per seat
            assert!((350..650).contains(count), "skewed draw: {hits:?}");
        }
    }

    #[test]
    fn no_starting_player_without_civilians() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut players = roster(3);
        for p in players.iter_mut() {
            p.role = Role::Impostor;
        }
        assert_eq!(choose_starting_player(&players, &mut rng), None);
    }
}
