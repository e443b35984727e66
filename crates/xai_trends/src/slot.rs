use std::fmt;
use time::macros::offset;
use time::{Date, OffsetDateTime, UtcOffset};

// JST
pub const LOCAL_OFFSET: UtcOffset = offset!(+9);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Morning = 0,
    Afternoon = 1,
}

impl Slot {
    pub fn from_hour(hour: u8) -> Self {
        if hour < 12 {
            Slot::Morning
        } else {
            Slot::Afternoon
        }
    }

    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Slot::Morning),
            1 => Some(Slot::Afternoon),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub date: Date,
    pub slot: Slot,
}

impl SlotKey {
    pub fn new(date: Date, slot: Slot) -> Self {
        Self { date, slot }
    }

    pub fn from_trigger(trigger: OffsetDateTime) -> Self {
        let local_now = trigger.to_offset(LOCAL_OFFSET);
        Self {
            date: local_now.date(),
            slot: Slot::from_hour(local_now.hour()),
        }
    }

    /// `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.to_string()
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} slot {}", self.date, self.slot.as_i64())
    }
}
