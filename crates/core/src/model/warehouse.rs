use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::series::Sample;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub size: String,
    pub credit_per_hour: f64,
}

/// Timestamps are kept as the backend sent them; it stores whatever the
/// ingested export contained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WarehouseMetering {
    pub id: i64,
    pub warehouse_name: String,
    pub start_time: String,
    pub end_time: String,
    pub credits_used: f64,
}

impl WarehouseMetering {
    pub fn credit_sample(&self) -> Sample {
        Sample::new(self.start_time.clone(), self.credits_used)
    }

    pub fn start_day(&self) -> Option<NaiveDate> {
        leading_date(&self.start_time)
    }
}

/// Calendar date at the front of a timestamp, whatever follows it
/// (`T`/space separator, fractional seconds, offset).
fn leading_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_and_remainder(raw.trim_start(), "%Y-%m-%d")
        .ok()
        .map(|(day, _)| day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn metering_keeps_timestamp_text_verbatim() {
        let row: WarehouseMetering = serde_json::from_str(
            r#"{"id":1,"warehouse_name":"WH_CORE","start_time":"2024-01-01 00:00:00",
                "end_time":"2024-01-01 01:00:00","credits_used":2.5}"#,
        )
        .unwrap();
        assert_eq!(row.start_time, "2024-01-01 00:00:00");
        assert_eq!(row.credit_sample().label, "2024-01-01 00:00:00");
        assert_eq!(row.start_day(), day(2024, 1, 1));
    }

    #[test]
    fn leading_date_variants() {
        assert_eq!(leading_date("2024-01-02T00:00:00+00:00"), day(2024, 1, 2));
        assert_eq!(leading_date("2024-01-02T00:00:00.123Z"), day(2024, 1, 2));
        assert_eq!(leading_date("2024-01-02"), day(2024, 1, 2));
        assert_eq!(leading_date("01/02/2024 10:00"), None);
        assert_eq!(leading_date(""), None);
    }
}
