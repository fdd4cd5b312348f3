use crate::model::{Player, PlayerId};

pub fn next_active(players: &[Player], from: PlayerId) -> Option<PlayerId> {
    let n = players.len();
    if n == 0 {
        return None;
    }
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&id| players[id].is_active())
}

pub fn first_active_from(players: &[Player], origin: PlayerId) -> Option<PlayerId> {
    match players.get(origin) {
        Some(player) if player.is_active() => Some(origin),
        _ => next_active(players, origin),
    }
}
