//! Auto-advance intervals

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time a slide stays on screen before auto-advancing, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SpeedLevel(u64);

impl SpeedLevel {
    pub const MIN_MS: u64 = 100;
    pub const MAX_MS: u64 = 600_000;

    /// Creates a level, rejecting intervals outside `MIN_MS..=MAX_MS`
    pub fn from_millis(ms: u64) -> EngineResult<Self> {
        if !(Self::MIN_MS..=Self::MAX_MS).contains(&ms) {
            return Err(EngineError::InvalidSpeed(ms));
        }
        Ok(Self(ms))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Human readable label such as `10s/slide` or `1.5s/slide`
    pub fn label(&self) -> String {
        format!("{}s/slide", self.as_secs_f64())
    }
}

impl TryFrom<u64> for SpeedLevel {
    type Error = EngineError;

    fn try_from(ms: u64) -> EngineResult<Self> {
        Self::from_millis(ms)
    }
}

impl From<SpeedLevel> for u64 {
    fn from(level: SpeedLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Which end of the table a speed change moves toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedDirection {
    /// Shorter interval (lower table index)
    Faster,
    /// Longer interval (higher table index)
    Slower,
}

impl SpeedDirection {
    /// Maps the `+1` / `-1` convention of the UI buttons; anything else is ignored
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            1 => Some(Self::Faster),
            -1 => Some(Self::Slower),
            _ => None,
        }
    }
}

/// Ordered, read-only list of allowed intervals.
///
/// Stored ascending, so index 0 is the fastest level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTable {
    levels: Vec<SpeedLevel>,
}

impl SpeedTable {
    /// Default intervals offered by the viewer
    pub const DEFAULT_MS: [u64; 11] = [
        1000, 2000, 4000, 6000, 8000, 10000, 12000, 14000, 16000, 18000, 20000,
    ];

    /// Default interval used before the viewer picks another one
    pub const DEFAULT_INITIAL_MS: u64 = 10_000;

    pub fn new(millis: Vec<u64>) -> EngineResult<Self> {
        if millis.is_empty() {
            return Err(EngineError::InvalidSpeedTable(
                "at least one speed is required".to_string(),
            ));
        }

        if let Some(pair) = millis.windows(2).find(|w| w[0] >= w[1]) {
            return Err(EngineError::InvalidSpeedTable(format!(
                "speeds must be strictly ascending ({} followed by {})",
                pair[0], pair[1]
            )));
        }

        let levels = millis
            .into_iter()
            .map(SpeedLevel::from_millis)
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[SpeedLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn fastest(&self) -> SpeedLevel {
        self.levels[0]
    }

    pub fn slowest(&self) -> SpeedLevel {
        self.levels[self.levels.len() - 1]
    }

    pub fn contains(&self, level: SpeedLevel) -> bool {
        self.index_of(level).is_some()
    }

    pub fn index_of(&self, level: SpeedLevel) -> Option<usize> {
        self.levels.binary_search(&level).ok()
    }

    /// Looks up a table member by its millisecond value
    pub fn level(&self, ms: u64) -> EngineResult<SpeedLevel> {
        self.levels
            .iter()
            .copied()
            .find(|l| l.as_millis() == ms)
            .ok_or(EngineError::SpeedNotInTable(ms))
    }

    /// Closest member to an arbitrary interval; ties go to the faster level
    pub fn nearest(&self, ms: u64) -> SpeedLevel {
        self.levels
            .iter()
            .copied()
            .min_by_key(|l| l.as_millis().abs_diff(ms))
            .unwrap_or_else(|| self.fastest())
    }

    /// Moves one step toward the requested end, clamped at the boundary.
    ///
    /// A `current` value that is not a member is first snapped to the
    /// nearest level.
    pub fn step(&self, current: SpeedLevel, direction: SpeedDirection) -> SpeedLevel {
        let index = self
            .index_of(current)
            .unwrap_or_else(|| self.index_of(self.nearest(current.as_millis())).unwrap_or(0));

        let next = match direction {
            SpeedDirection::Faster => index.saturating_sub(1),
            SpeedDirection::Slower => (index + 1).min(self.levels.len() - 1),
        };

        self.levels[next]
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            levels: Self::DEFAULT_MS.iter().map(|&ms| SpeedLevel(ms)).collect(),
        }
    }
}
