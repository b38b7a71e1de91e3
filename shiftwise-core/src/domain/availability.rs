//! Staff availability domain types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An absence (vacation, sick leave, ...) blocking a staff member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AbsenceWindow {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Availability of one staff member over the requested range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffAvailability {
    pub staff_id: String,
    pub staff_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub available: bool,
    #[serde(default)]
    pub absences: Vec<AbsenceWindow>,
}

impl StaffAvailability {
    pub fn is_absent_on(&self, date: NaiveDate) -> bool {
        self.absences.iter().any(|a| a.covers(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absent_on() {
        let staff: StaffAvailability = serde_json::from_value(serde_json::json!({
            "staffId": "s1",
            "staffName": "Ada",
            "available": false,
            "absences": [{ "startDate": "2025-01-08", "endDate": "2025-01-09", "reason": "VACATION" }]
        }))
        .unwrap();

        let day = |d: &str| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap();
        assert!(!staff.is_absent_on(day("2025-01-07")));
        assert!(staff.is_absent_on(day("2025-01-08")));
        assert!(staff.is_absent_on(day("2025-01-09")));
        assert!(!staff.is_absent_on(day("2025-01-10")));
    }
}
