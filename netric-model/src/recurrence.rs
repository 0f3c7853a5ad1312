use netric_types::wire::{as_object, opt_i64, opt_id, opt_string, pick};
use netric_types::{Error, Result};
use serde_json::{Value, json};

/// Day-of-week bits used in `day_of_week_mask`.
pub mod weekday {
    pub const SUNDAY: i64 = 1;
    pub const MONDAY: i64 = 1 << 1;
    pub const TUESDAY: i64 = 1 << 2;
    pub const WEDNESDAY: i64 = 1 << 3;
    pub const THURSDAY: i64 = 1 << 4;
    pub const FRIDAY: i64 = 1 << 5;
    pub const SATURDAY: i64 = 1 << 6;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecurrenceType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    /// The nth weekday of every month (e.g. the second Tuesday).
    MonthNth,
    Yearly,
    /// The nth weekday of a month every year.
    YearNth,
}

impl RecurrenceType {
    /// The numeric code used on the wire.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Daily => 1,
            Self::Weekly => 2,
            Self::Monthly => 3,
            Self::MonthNth => 4,
            Self::Yearly => 5,
            Self::YearNth => 6,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        Ok(match code {
            0 => Self::None,
            1 => Self::Daily,
            2 => Self::Weekly,
            3 => Self::Monthly,
            4 => Self::MonthNth,
            5 => Self::Yearly,
            6 => Self::YearNth,
            other => {
                return Err(Error::InvalidData(format!(
                    "unknown recurrence type: {other}"
                )));
            }
        })
    }
}

/// How a recurring entity (event, task) repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrencePattern {
    pub id: Option<String>,
    pub rec_type: RecurrenceType,
    pub interval: i64,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub day_of_month: Option<i64>,
    pub month_of_year: Option<i64>,
    pub instance: Option<i64>,
    pub day_of_week_mask: i64,
}

impl Default for RecurrencePattern {
    fn default() -> Self {
        Self {
            id: None,
            rec_type: RecurrenceType::None,
            interval: 1,
            date_start: None,
            date_end: None,
            day_of_month: None,
            month_of_year: None,
            instance: None,
            day_of_week_mask: 0,
        }
    }
}

impl RecurrencePattern {
    #[must_use]
    pub fn new(rec_type: RecurrenceType) -> Self {
        Self {
            rec_type,
            ..Self::default()
        }
    }

    /// Returns true when the pattern actually repeats.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.rec_type != RecurrenceType::None
    }

    /// Returns true if `day` (one of the [`weekday`] bits) is selected.
    #[must_use]
    pub fn has_day(&self, day: i64) -> bool {
        self.day_of_week_mask & day != 0
    }

    /// Parses the wire shape. Null means the entity does not recur.
    pub fn from_data(data: &Value) -> Result<Option<Self>> {
        if data.is_null() {
            return Ok(None);
        }
        let map = as_object(data, "recurrence pattern")?;

        let rec_type = match pick(map, &["recur_type", "type"]).and_then(opt_i64) {
            Some(code) => RecurrenceType::from_code(code)?,
            None => RecurrenceType::None,
        };

        Ok(Some(Self {
            id: map.get("id").and_then(opt_id),
            rec_type,
            interval: map.get("interval").and_then(opt_i64).unwrap_or(1),
            date_start: map.get("date_start").and_then(opt_string),
            date_end: map.get("date_end").and_then(opt_string),
            day_of_month: map.get("day_of_month").and_then(opt_i64),
            month_of_year: map.get("month_of_year").and_then(opt_i64),
            instance: map.get("instance").and_then(opt_i64),
            day_of_week_mask: map.get("day_of_week_mask").and_then(opt_i64).unwrap_or(0),
        }))
    }

    #[must_use]
    pub fn to_data(&self) -> Value {
        json!({
            "id": self.id,
            "recur_type": self.rec_type.code(),
            "interval": self.interval,
            "date_start": self.date_start,
            "date_end": self.date_end,
            "day_of_month": self.day_of_month,
            "month_of_year": self.month_of_year,
            "instance": self.instance,
            "day_of_week_mask": self.day_of_week_mask,
        })
    }
}
