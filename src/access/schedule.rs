use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::config::{SCHEDULE_HOUR_OFFSET, SCHEDULE_WEEKDAY_OFFSET};

/// Weekly access window: one mask per day, bit `h` opens hour `h`.
/// Day 0 is Monday.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule([u32; 7]);

impl Schedule {
    pub const ALWAYS: Schedule = Schedule([u32::MAX; 7]);
    pub const NEVER: Schedule = Schedule([0; 7]);

    pub fn new(days: [u32; 7]) -> Self {
        Self(days)
    }

    pub fn days(&self) -> &[u32; 7] {
        &self.0
    }

    pub fn allows(&self, slot: ScheduleSlot) -> bool {
        self.0[slot.day] & (1 << slot.hour) != 0
    }
}

/// Position in the weekly grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub day: usize,
    pub hour: u32,
}

impl ScheduleSlot {
    pub fn new(day: usize, hour: u32) -> Option<Self> {
        (day < 7 && hour < 24).then_some(Self { day, hour })
    }

    /// Maps the device clock onto the stored grid.
    ///
    /// The hour is shifted by [`SCHEDULE_HOUR_OFFSET`] without carrying into
    /// the day, and the day index is `(weekday_from_sunday + 5) % 7`. Stored
    /// schedules were written against exactly this mapping.
    pub fn at(now: DateTime<Utc>) -> Self {
        let weekday = now.weekday().number_from_sunday();
        Self {
            day: ((weekday + SCHEDULE_WEEKDAY_OFFSET) % 7) as usize,
            hour: (now.hour() + SCHEDULE_HOUR_OFFSET) % 24,
        }
    }
}

/// Schedule part of a provisioning request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScheduleSpec {
    /// Empty field: leave the stored schedule alone.
    Keep,
    /// `*`
    Always,
    /// `-`
    Never,
    /// Up to seven space separated hex masks, missing days closed.
    Masks([u32; 7]),
}

impl ScheduleSpec {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        match s {
            "" => return Ok(Self::Keep),
            "*" => return Ok(Self::Always),
            "-" => return Ok(Self::Never),
            _ => {}
        }
        let mut days = [0u32; 7];
        for (i, field) in s.split_whitespace().enumerate() {
            if i >= days.len() {
                return Err(format!("more than 7 day masks in {s:?}"));
            }
            let digits = field
                .strip_prefix("0x")
                .or_else(|| field.strip_prefix("0X"))
                .unwrap_or(field);
            days[i] = u32::from_str_radix(digits, 16)
                .map_err(|e| format!("bad day mask {field:?}: {e}"))?;
        }
        Ok(Self::Masks(days))
    }

    /// Schedule after applying this field to `current`.
    pub fn apply(self, current: Schedule) -> Schedule {
        match self {
            Self::Keep => current,
            Self::Always => Schedule::ALWAYS,
            Self::Never => Schedule::NEVER,
            Self::Masks(days) => Schedule(days),
        }
    }
}
