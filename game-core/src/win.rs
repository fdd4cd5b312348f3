use crate::model::{Player, Role, Winner};

pub fn evaluate_winner(players: &[Player]) -> Option<Winner> {
    let (impostors, civilians) = players
        .iter()
        .filter(|p| p.is_active())
        .fold((0usize, 0usize), |(imp, civ), p| match p.role {
            Role::Impostor => (imp + 1, civ),
            Role::Civilian => (imp, civ + 1),
        });

    if impostors == 0 {
        Some(Winner::Civilians)
    } else if impostors >= civilians {
        Some(Winner::Impostors)
    } else {
        None
    }
}
