use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Unparsable { key: &'static str, value: String },
    #[error("{key}: {value} is outside {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("task quota needs three proportions (build,gather,rest), got {0:?}")]
    QuotaArity(String),
    #[error("task quota proportions must each lie in [0, 1] and sum to at most 1, got {0:?}")]
    QuotaRange(String),
}

/// Share of the roster assigned to each objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskQuota {
    pub build: f64,
    pub gather: f64,
    pub rest: f64,
}

impl TaskQuota {
    pub fn new(build: f64, gather: f64, rest: f64) -> Self {
        Self {
            build,
            gather,
            rest,
        }
    }

    fn is_valid(&self) -> bool {
        let parts = [self.build, self.gather, self.rest];
        parts.iter().all(|p| (0.0..=1.0).contains(p)) && parts.iter().sum::<f64>() <= 1.0 + 1e-9
    }
}

impl Default for TaskQuota {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.0)
    }
}

impl FromStr for TaskQuota {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| ConfigError::Unparsable {
                key: "task quota",
                value: s.to_string(),
            })?;

        let [build, gather, rest] = parts[..] else {
            return Err(ConfigError::QuotaArity(s.to_string()));
        };

        let quota = TaskQuota::new(build, gather, rest);
        if !quota.is_valid() {
            return Err(ConfigError::QuotaRange(s.to_string()));
        }
        Ok(quota)
    }
}

/// Where a builder with a full cargo goes to found new territory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildSitePolicy {
    /// Breadth-first search for the nearest empty tile.
    #[default]
    NearestEmpty,
    /// Nearest free tile bordering own territory, else the nearest empty tile.
    Periphery,
}

impl FromStr for BuildSitePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(BuildSitePolicy::NearestEmpty),
            "periphery" => Ok(BuildSitePolicy::Periphery),
            _ => Err(ConfigError::Unparsable {
                key: "build site",
                value: s.to_string(),
            }),
        }
    }
}

/// Library-facing knobs of the decision engine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FleetConfig {
    pub task_quota: TaskQuota,
    pub build_site: BuildSitePolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    pub seed: u64,
    pub map_size: i32,
    pub turns: u32,
    pub fleet: FleetConfig,
    pub replays_folder: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            map_size: 16,
            turns: 360,
            fleet: FleetConfig::default(),
            replays_folder: None,
        }
    }
}

impl BotConfig {
    /// Read `MINEBOT_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seed = parse_var(&lookup, "MINEBOT_SEED")?.unwrap_or(defaults.seed);
        let map_size = parse_var(&lookup, "MINEBOT_MAP_SIZE")?.unwrap_or(defaults.map_size);
        if !(8..=64).contains(&map_size) {
            return Err(ConfigError::OutOfRange {
                key: "MINEBOT_MAP_SIZE",
                value: map_size.into(),
                min: 8,
                max: 64,
            });
        }
        let turns = parse_var(&lookup, "MINEBOT_TURNS")?.unwrap_or(defaults.turns);
        let task_quota = lookup("MINEBOT_TASK_QUOTA")
            .map(|value| value.parse::<TaskQuota>())
            .transpose()?
            .unwrap_or_default();
        let build_site = lookup("MINEBOT_BUILD_SITE")
            .map(|value| value.parse::<BuildSitePolicy>())
            .transpose()?
            .unwrap_or_default();
        let replays_folder = lookup("MINEBOT_REPLAYS_FOLDER").filter(|v| !v.is_empty());

        Ok(Self {
            seed,
            map_size,
            turns,
            fleet: FleetConfig {
                task_quota,
                build_site,
            },
            replays_folder,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::Unparsable { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = BotConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BotConfig::default());
        assert_eq!(config.fleet.task_quota, TaskQuota::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_reads_all_variables() {
        let config = BotConfig::from_lookup(lookup(&[
            ("MINEBOT_SEED", "42"),
            ("MINEBOT_MAP_SIZE", "24"),
            ("MINEBOT_TURNS", "100"),
            ("MINEBOT_TASK_QUOTA", "0.6, 0.3, 0.1"),
            ("MINEBOT_BUILD_SITE", "Periphery"),
            ("MINEBOT_REPLAYS_FOLDER", "replays"),
        ]))
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.map_size, 24);
        assert_eq!(config.turns, 100);
        assert_eq!(config.fleet.task_quota, TaskQuota::new(0.6, 0.3, 0.1));
        assert_eq!(config.fleet.build_site, BuildSitePolicy::Periphery);
        assert_eq!(config.replays_folder.as_deref(), Some("replays"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            BotConfig::from_lookup(lookup(&[("MINEBOT_SEED", "abc")])).unwrap_err(),
            ConfigError::Unparsable {
                key: "MINEBOT_SEED",
                value: "abc".to_string()
            }
        );
        assert!(matches!(
            BotConfig::from_lookup(lookup(&[("MINEBOT_MAP_SIZE", "4")])),
            Err(ConfigError::OutOfRange { value: 4, .. })
        ));
        assert!(BotConfig::from_lookup(lookup(&[("MINEBOT_BUILD_SITE", "anywhere")])).is_err());
        assert!(matches!(
            BotConfig::from_lookup(lookup(&[("MINEBOT_TASK_QUOTA", "1,1,1")])),
            Err(ConfigError::QuotaRange(_))
        ));
    }

    #[test]
    fn test_task_quota_validation() {
        assert_eq!(
            "0.8,0.2,0".parse::<TaskQuota>().unwrap(),
            TaskQuota::new(0.8, 0.2, 0.0)
        );
        assert_eq!(
            "0.5,0.5".parse::<TaskQuota>().unwrap_err(),
            ConfigError::QuotaArity("0.5,0.5".to_string())
        );
        assert_eq!(
            "0.7,0.7,0".parse::<TaskQuota>().unwrap_err(),
            ConfigError::QuotaRange("0.7,0.7,0".to_string())
        );
        assert!("-0.1,0.5,0".parse::<TaskQuota>().is_err());
        assert!("a,b,c".parse::<TaskQuota>().is_err());
    }
}
