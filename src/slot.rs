/// Six fixed buckets partitioning the 24-hour day, plus a sentinel for
/// records whose request timestamp could not be parsed. Variant order is
/// day order, so derived `Ord` sorts summary rows chronologically with
/// Unknown last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeSlot {
    Night,        // 00:00 - 03:59
    EarlyMorning, // 04:00 - 07:59
    Morning,      // 08:00 - 11:59
    Afternoon,    // 12:00 - 16:59
    Evening,      // 17:00 - 20:59
    LateNight,    // 21:00 - 23:59
    Unknown,
}

impl TimeSlot {
    /// The six real slots in day order.
    pub const DAY: [TimeSlot; 6] = [
        TimeSlot::Night,
        TimeSlot::EarlyMorning,
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::LateNight,
    ];

    pub fn classify(hour: Option<u32>) -> TimeSlot {
        match hour {
            Some(0..=3) => TimeSlot::Night,
            Some(4..=7) => TimeSlot::EarlyMorning,
            Some(8..=11) => TimeSlot::Morning,
            Some(12..=16) => TimeSlot::Afternoon,
            Some(17..=20) => TimeSlot::Evening,
            Some(21..=23) => TimeSlot::LateNight,
            _ => TimeSlot::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Night => "Night (0-3)",
            TimeSlot::EarlyMorning => "Early Morning (4-7)",
            TimeSlot::Morning => "Morning (8-11)",
            TimeSlot::Afternoon => "Afternoon (12-16)",
            TimeSlot::Evening => "Evening (17-20)",
            TimeSlot::LateNight => "Late Night (21-23)",
            TimeSlot::Unknown => "Unknown",
        }
    }
}
