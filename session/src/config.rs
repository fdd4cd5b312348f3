use std::env;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

/// Process-level settings, read from the environment.
///
/// - `SETTINGS_PATH`: JSON file backing the preferences store. Unset keeps
///   preferences in memory.
/// - `GAME_SEED`: fixed seed for role, word and tie draws.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub settings_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let settings_path = lookup("SETTINGS_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let seed = lookup("GAME_SEED").and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!(value = %raw, "ignoring non-numeric GAME_SEED");
                None
            }
        });
        Self {
            settings_path,
            seed,
        }
    }

    pub fn rng(&self) -> ChaCha8Rng {
        self.seed
            .map(ChaCha8Rng::seed_from_u64)
            .unwrap_or_else(ChaCha8Rng::from_entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_path_and_seed() {
        let config = SessionConfig::from_lookup(lookup(&[
            ("SETTINGS_PATH", "/tmp/prefs.json"),
            ("GAME_SEED", " 42 "),
        ]));
        assert_eq!(config.settings_path, Some(PathBuf::from("/tmp/prefs.json")));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn blank_or_bad_values_are_ignored() {
        let config =
            SessionConfig::from_lookup(lookup(&[("SETTINGS_PATH", "  "), ("GAME_SEED", "abc")]));
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = SessionConfig {
            seed: Some(3),
            ..SessionConfig::default()
        };
        assert_eq!(config.rng().next_u64(), config.rng().next_u64());
    }
}
