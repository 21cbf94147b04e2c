//! Wave schedule and the spawn cursor that walks it.

use crate::balloon::BalloonKind;
use crate::config;
use crate::error::ParseError;
use std::str::FromStr;

/// `count` balloons of one kind, released one per spawn delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveEntry {
    pub kind: BalloonKind,
    pub count: u32,
}

impl WaveEntry {
    pub fn new(kind: BalloonKind, count: u32) -> Self {
        WaveEntry { kind, count }
    }
}

impl FromStr for WaveEntry {
    type Err = ParseError;

    /// Parses `KIND:COUNT`, e.g. `BLUE:4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, count) = s
            .split_once(':')
            .ok_or_else(|| ParseError::WaveEntry(s.to_string()))?;
        let kind = kind.parse::<BalloonKind>()?;
        let count = count
            .trim()
            .parse::<u32>()
            .map_err(|_| ParseError::WaveEntry(s.to_string()))?;
        Ok(WaveEntry { kind, count })
    }
}

/// An ordered list of spawn entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    pub entries: Vec<WaveEntry>,
}

impl Wave {
    pub fn new(entries: Vec<WaveEntry>) -> Self {
        Wave { entries }
    }

    pub fn total_balloons(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl FromStr for Wave {
    type Err = ParseError;

    /// Parses a comma separated list of entries, e.g. `RED:6,BLUE:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse::<WaveEntry>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Wave { entries })
    }
}

/// The built-in schedule: a single wave of reds.
pub fn default_schedule() -> Vec<Wave> {
    vec![Wave::new(vec![WaveEntry::new(
        BalloonKind::Red,
        config::DEFAULT_WAVE_COUNT,
    )])]
}

// Cursor over the schedule: which wave, which entry, how many released so far
#[derive(Debug, Clone)]
pub struct Spawner {
    schedule: Vec<Wave>,
    pub wave_index: usize,
    pub entry_index: usize,
    pub spawned_in_entry: u32,
    pub timer: f64,
    pub delay: f64,
}

impl Spawner {
    pub fn new(schedule: Vec<Wave>, delay: f64) -> Self {
        Spawner {
            schedule,
            wave_index: 0,
            entry_index: 0,
            spawned_in_entry: 0,
            timer: 0.0,
            delay,
        }
    }

    pub fn schedule(&self) -> &[Wave] {
        &self.schedule
    }

    pub fn current_wave(&self) -> Option<&Wave> {
        self.schedule.get(self.wave_index)
    }

    /// True once every wave has been completed.
    pub fn is_exhausted(&self) -> bool {
        self.wave_index >= self.schedule.len()
    }

    /// True when every entry of the current wave has released its full count.
    pub fn wave_fully_spawned(&self) -> bool {
        self.current_wave()
            .is_none_or(|wave| self.entry_index >= wave.entries.len())
    }

    /// One spawn decision for this tick. A satisfied entry is retired without
    /// spending the tick's time; otherwise the timer accumulates and a balloon
    /// is released once it reaches the spawn delay.
    pub fn tick(&mut self, dt: f64) -> Option<BalloonKind> {
        let entry = *self.current_wave()?.entries.get(self.entry_index)?;

        if self.spawned_in_entry >= entry.count {
            crate::debug_spawn!(
                "Wave {} entry {} ({} x{}) complete",
                self.wave_index + 1,
                self.entry_index,
                entry.kind,
                entry.count
            );
            self.entry_index += 1;
            self.spawned_in_entry = 0;
            self.timer = 0.0;
            return None;
        }

        self.timer += dt;
        if self.timer >= self.delay {
            self.spawned_in_entry += 1;
            self.timer = 0.0;
            return Some(entry.kind);
        }
        None
    }

    /// Move to the next wave and reset the per-entry counters. Returns false
    /// when the schedule is exhausted.
    pub fn next_wave(&mut self) -> bool {
        self.wave_index += 1;
        self.reset_counters();
        !self.is_exhausted()
    }

    pub fn reset_counters(&mut self) {
        self.entry_index = 0;
        self.spawned_in_entry = 0;
        self.timer = 0.0;
    }
}
