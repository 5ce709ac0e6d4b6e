//! Runner configuration.

use std::env;
use std::str::FromStr;
use tracing::warn;

pub const WORKERS_ENV: &str = "LEDGER_WORKERS";
pub const BUFFER_SIZE_ENV: &str = "LEDGER_BUFFER_SIZE";

const DEFAULT_WORKERS: usize = 4;
const DEFAULT_BUFFER_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Number of tasks applying rows in parallel. Rows for one account always
    /// go to the same task.
    pub workers: usize,
    /// Capacity of each task's channel.
    pub buffer_size: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl RunnerConfig {
    /// Reads `LEDGER_WORKERS` and `LEDGER_BUFFER_SIZE`. Missing, unparsable
    /// or zero values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            workers: positive(WORKERS_ENV, lookup(WORKERS_ENV), defaults.workers),
            buffer_size: positive(BUFFER_SIZE_ENV, lookup(BUFFER_SIZE_ENV), defaults.buffer_size),
        }
    }
}

fn positive<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + PartialEq + Default,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => value,
        _ => {
            warn!(key, value = %raw, "ignoring invalid setting");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RunnerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RunnerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            config(&[]),
            RunnerConfig {
                workers: 4,
                buffer_size: 1024
            }
        );
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[(WORKERS_ENV, "8"), (BUFFER_SIZE_ENV, " 16 ")]);
        assert_eq!(cfg.workers, 8);
        assert_eq!(cfg.buffer_size, 16);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[(WORKERS_ENV, "0"), (BUFFER_SIZE_ENV, "lots")]);
        assert_eq!(cfg, RunnerConfig::default());
    }
}
