use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// Board size accepted from the user, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct BoardSize(usize);

impl BoardSize {
    pub const MIN: usize = 4;
    pub const MAX: usize = 16;

    pub fn new(n: usize) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(ConfigError::BoardSizeOutOfRange {
                size: n,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn clamped(n: usize) -> Self {
        Self(n.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self(8)
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<BoardSize> for usize {
    fn from(size: BoardSize) -> usize {
        size.0
    }
}

impl FromStr for BoardSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidNumber(s.to_owned()))?;
        Self::new(n)
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Row-by-row depth-first search with an on-demand safety check.
    Dfs,
    /// Column-by-column search that prunes the remaining columns' domains
    /// after each placement.
    #[default]
    Csp,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Csp, Algorithm::Dfs];

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Dfs => "DFS Backtracking",
            Algorithm::Csp => "CSP with Constraint Propagation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Algorithm::Dfs => {
                "Explores placements row by row, checking safety at each step. \
                 Backtracks when a row has no safe column left."
            }
            Algorithm::Csp => {
                "Places queens column by column and prunes the candidate rows of \
                 every other column after each placement. Backtracks when a \
                 column runs out of candidates."
            }
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" => Ok(Algorithm::Dfs),
            "csp" => Ok(Algorithm::Csp),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Dfs => "dfs",
            Algorithm::Csp => "csp",
        })
    }
}

/// Delay between published steps. Only these presets are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
    VeryFast,
    Faster,
    Fastest,
}

impl Speed {
    pub const ALL: [Speed; 6] = [
        Speed::Slow,
        Speed::Medium,
        Speed::Fast,
        Speed::VeryFast,
        Speed::Faster,
        Speed::Fastest,
    ];

    pub fn millis(self) -> u64 {
        match self {
            Speed::Slow => 1000,
            Speed::Medium => 500,
            Speed::Fast => 250,
            Speed::VeryFast => 100,
            Speed::Faster => 10,
            Speed::Fastest => 1,
        }
    }

    pub fn delay(self) -> Duration {
        Duration::from_millis(self.millis())
    }

    pub fn from_millis(ms: u64) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|s| s.millis() == ms)
            .ok_or(ConfigError::UnsupportedSpeed(ms))
    }

    pub fn label(self) -> &'static str {
        match self {
            Speed::Slow => "Slow (1s)",
            Speed::Medium => "Medium (0.5s)",
            Speed::Fast => "Fast (0.25s)",
            Speed::VeryFast => "Very Fast (0.1s)",
            Speed::Faster => "Faster (0.01s)",
            Speed::Fastest => "Fastest (0.001s)",
        }
    }
}

impl TryFrom<u64> for Speed {
    type Error = ConfigError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        Self::from_millis(ms)
    }
}

impl From<Speed> for u64 {
    fn from(speed: Speed) -> u64 {
        speed.millis()
    }
}

impl FromStr for Speed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ms = s
            .trim()
            .trim_end_matches("ms")
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber(s.to_owned()))?;
        Self::from_millis(ms)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    pub size: BoardSize,
    pub algorithm: Algorithm,
    pub speed: Speed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_first_launch() {
        let config = Config::default();
        assert_eq!(config.size.get(), 8);
        assert_eq!(config.algorithm, Algorithm::Csp);
        assert_eq!(config.speed.millis(), 500);
    }

    #[test]
    fn test_board_size_bounds() {
        assert!(BoardSize::new(4).is_ok());
        assert!(BoardSize::new(16).is_ok());
        assert_eq!(
            BoardSize::new(3),
            Err(ConfigError::BoardSizeOutOfRange {
                size: 3,
                min: 4,
                max: 16
            })
        );
        assert!(BoardSize::new(17).is_err());
        assert_eq!(BoardSize::clamped(1).get(), 4);
        assert_eq!(BoardSize::clamped(40).get(), 16);
        assert_eq!(BoardSize::clamped(9).get(), 9);
    }

    #[test]
    fn test_parse_from_command_line() {
        assert_eq!("12".parse::<BoardSize>().unwrap().get(), 12);
        assert_eq!(
            "eight".parse::<BoardSize>(),
            Err(ConfigError::InvalidNumber("eight".into()))
        );
        assert_eq!("DFS".parse::<Algorithm>().unwrap(), Algorithm::Dfs);
        assert_eq!(" csp ".parse::<Algorithm>().unwrap(), Algorithm::Csp);
        assert!("bfs".parse::<Algorithm>().is_err());
        assert_eq!("250".parse::<Speed>().unwrap(), Speed::Fast);
        assert_eq!("10ms".parse::<Speed>().unwrap(), Speed::Faster);
        assert_eq!("300".parse::<Speed>(), Err(ConfigError::UnsupportedSpeed(300)));
    }

    #[test]
    fn test_speed_presets_round_trip_through_millis() {
        for speed in Speed::ALL {
            assert_eq!(Speed::from_millis(speed.millis()), Ok(speed));
        }
    }

    #[test]
    fn test_config_serializes_as_plain_values() {
        let config = Config {
            size: BoardSize::new(6).unwrap(),
            algorithm: Algorithm::Dfs,
            speed: Speed::Fastest,
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "size": 6, "algorithm": "dfs", "speed": 1 })
        );
        let bad = serde_json::from_value::<Config>(
            serde_json::json!({ "size": 20, "algorithm": "dfs", "speed": 1 }),
        );
        assert!(bad.is_err());
    }
}
