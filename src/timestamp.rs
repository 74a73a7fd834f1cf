//! Bit-packed directory-entry timestamps.
//!
//! A 32-bit field, packed LSB first: seconds/2 (5 bits), minutes (6),
//! hours (5), day (5), month (4), year since 1980 (7). The raw value and
//! the field view alias the same bits; conversion is always done through
//! explicit shifts and masks, never by reinterpreting memory.

use chrono::{DateTime, Datelike, Local, Timelike};
use std::fmt;
use std::time::SystemTime;

const MONTHS: [&str; 13] = [
    "---", "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Decoded view of a packed timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp {
    /// Seconds divided by two, 0..=29.
    pub seconds2: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day: u8,
    pub month: u8,
    /// Years since 1980, 0..=127.
    pub year: u8,
}

impl Timestamp {
    /// Pack into the on-disk 32-bit representation.
    pub fn pack(&self) -> u32 {
        (u32::from(self.seconds2) & 0x1f)
            | (u32::from(self.minutes) & 0x3f) << 5
            | (u32::from(self.hours) & 0x1f) << 11
            | (u32::from(self.day) & 0x1f) << 16
            | (u32::from(self.month) & 0x0f) << 21
            | (u32::from(self.year) & 0x7f) << 25
    }

    /// Unpack from the on-disk 32-bit representation.
    pub fn unpack(raw: u32) -> Self {
        Timestamp {
            seconds2: (raw & 0x1f) as u8,
            minutes: (raw >> 5 & 0x3f) as u8,
            hours: (raw >> 11 & 0x1f) as u8,
            day: (raw >> 16 & 0x1f) as u8,
            month: (raw >> 21 & 0x0f) as u8,
            year: (raw >> 25 & 0x7f) as u8,
        }
    }

    /// Timestamp for a source file's modification time, in local time.
    pub fn from_system_time(time: SystemTime) -> Self {
        let local: DateTime<Local> = time.into();
        Timestamp {
            seconds2: (local.second() / 2) as u8,
            minutes: local.minute() as u8,
            hours: local.hour() as u8,
            day: local.day() as u8,
            month: local.month() as u8,
            year: local.year().saturating_sub(1980).clamp(0, 127) as u8,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = MONTHS.get(self.month as usize).unwrap_or(&MONTHS[0]);
        let year = if self.year > 0 {
            1980 + u32::from(self.year)
        } else {
            0
        };
        write!(
            f,
            "{} {:2},{:04}  {:02}:{:02}:{:02}",
            month,
            self.day,
            year,
            self.hours,
            self.minutes,
            u32::from(self.seconds2) * 2
        )
    }
}
