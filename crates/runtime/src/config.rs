//! Runtime configuration and its environment loader.
use std::env;
use std::time::Duration;

use battle_core::BattleConfig;

/// Runtime configuration shared by the orchestrator and the arena worker.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    /// How long the current actor may hold the turn.
    pub turn_timeout: Duration,
    /// How long a cell prompt waits for its answer.
    pub prompt_timeout: Duration,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Fixed seed for the battle RNG. Drawn from the OS when unset.
    pub rng_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            turn_timeout: Duration::from_secs(300),
            prompt_timeout: Duration::from_secs(30),
            command_buffer_size: 32,
            event_buffer_size: 128,
            rng_seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `ARENA_TURN_TIMEOUT_SECS` / `ARENA_PROMPT_TIMEOUT_SECS`
    /// - `ARENA_COMMAND_BUFFER` / `ARENA_EVENT_BUFFER`
    /// - `ARENA_RNG_SEED`
    /// - `ARENA_CRIT_PERCENT` / `ARENA_FLEE_PERCENT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] with a custom variable source.
    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(secs) = parse::<u64>(lookup("ARENA_TURN_TIMEOUT_SECS")) {
            config.turn_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(secs) = parse::<u64>(lookup("ARENA_PROMPT_TIMEOUT_SECS")) {
            config.prompt_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(capacity) = parse::<usize>(lookup("ARENA_COMMAND_BUFFER")) {
            config.command_buffer_size = capacity.max(1);
        }

        if let Some(capacity) = parse::<usize>(lookup("ARENA_EVENT_BUFFER")) {
            config.event_buffer_size = capacity.max(1);
        }

        config.rng_seed = parse(lookup("ARENA_RNG_SEED"));

        if let Some(percent) = parse::<u32>(lookup("ARENA_CRIT_PERCENT")) {
            config.battle = config.battle.with_crit_chance(percent);
        }

        if let Some(percent) = parse::<u32>(lookup("ARENA_FLEE_PERCENT")) {
            config.battle = config.battle.with_flee_chance(percent);
        }

        config
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config_from(&[]);
        assert_eq!(config.turn_timeout, Duration::from_secs(300));
        assert_eq!(config.prompt_timeout, Duration::from_secs(30));
        assert_eq!(config.command_buffer_size, 32);
        assert_eq!(config.event_buffer_size, 128);
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.battle, BattleConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("ARENA_TURN_TIMEOUT_SECS", "60"),
            ("ARENA_PROMPT_TIMEOUT_SECS", " 5 "),
            ("ARENA_COMMAND_BUFFER", "0"),
            ("ARENA_RNG_SEED", "42"),
            ("ARENA_CRIT_PERCENT", "250"),
            ("ARENA_FLEE_PERCENT", "75"),
        ]);
        assert_eq!(config.turn_timeout, Duration::from_secs(60));
        assert_eq!(config.prompt_timeout, Duration::from_secs(5));
        assert_eq!(config.command_buffer_size, 1);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.battle.crit_chance, 100);
        assert_eq!(config.battle.flee_chance, 75);
    }

    #[test]
    fn garbage_is_ignored() {
        let config = config_from(&[("ARENA_TURN_TIMEOUT_SECS", "soon"), ("ARENA_RNG_SEED", "-1")]);
        assert_eq!(config.turn_timeout, Duration::from_secs(300));
        assert_eq!(config.rng_seed, None);
    }
}
