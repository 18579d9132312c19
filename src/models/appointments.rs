use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub const TABLE: &str = "appointments";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Cancelled,
    /// Anything else the table holds, null included.
    #[default]
    #[serde(other)]
    Unknown,
}

fn lenient_status<'de, D: Deserializer<'de>>(d: D) -> Result<AppointmentStatus, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(AppointmentStatus::deserialize(value).unwrap_or_default())
}

// Rows with a missing or malformed date are kept but never placed on a day.
fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(value
        .as_str()
        .and_then(|s| s.get(..10))
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    #[serde(deserialize_with = "super::id_string")]
    pub doctor_id: String,
    #[serde(default, deserialize_with = "super::opt_id_string")]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: AppointmentStatus,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStats {
    pub total_appointments: usize,
    pub booked_appointments: usize,
    pub cancelled_appointments: usize,
}

impl AppointmentStats {
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        appointments
            .iter()
            .fold(Self::default(), |mut stats, appointment| {
                stats.total_appointments += 1;
                match appointment.status {
                    AppointmentStatus::Booked => stats.booked_appointments += 1,
                    AppointmentStatus::Cancelled => stats.cancelled_appointments += 1,
                    AppointmentStatus::Unknown => {}
                }
                stats
            })
    }

    /// Share of appointments still booked, as a rounded percentage.
    pub fn fill_rate(&self) -> u32 {
        if self.total_appointments == 0 {
            return 0;
        }
        (self.booked_appointments as f64 / self.total_appointments as f64 * 100.0).round() as u32
    }
}

#[derive(Serialize)]
pub struct CancelAppointment {
    pub status: AppointmentStatus,
}

impl Default for CancelAppointment {
    fn default() -> Self {
        Self {
            status: AppointmentStatus::Cancelled,
        }
    }
}

#[cfg(test)]
pub(crate) fn appointment(id: &str, doctor_id: &str, date: &str, status: &str) -> Appointment {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "doctor_id": doctor_id,
        "patient_name": "Patient",
        "date": date,
        "time": "09:30",
        "status": status,
    }))
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_and_fill_rate() {
        let list = vec![
            appointment("1", "d", "2025-03-02", "booked"),
            appointment("2", "d", "2025-03-03", "booked"),
            appointment("3", "d", "2025-03-04", "cancelled"),
        ];
        let stats = AppointmentStats::from_appointments(&list);
        assert_eq!(stats.total_appointments, 3);
        assert_eq!(stats.booked_appointments, 2);
        assert_eq!(stats.cancelled_appointments, 1);
        assert_eq!(stats.fill_rate(), 67);
        assert_eq!(AppointmentStats::default().fill_rate(), 0);
    }

    #[test]
    fn integer_ids_are_accepted() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": 42,
            "doctor_id": "d-1",
            "patient_id": 7,
            "date": "2025-01-01",
            "status": "cancelled"
        }))
        .unwrap();
        assert_eq!(appt.id, "42");
        assert_eq!(appt.patient_id.as_deref(), Some("7"));
        assert_eq!(appt.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn odd_rows_still_decode() {
        let rows: Vec<Appointment> = serde_json::from_value(json!([
            { "id": 1, "doctor_id": "d", "date": "2025-03-02", "status": null },
            { "id": 2, "doctor_id": "d", "date": null, "status": "no-show" },
            { "id": 3, "doctor_id": "d", "date": "2025-03-04T09:00:00", "status": "booked" },
            { "id": 4, "doctor_id": "d", "date": "soon" }
        ]))
        .unwrap();
        let statuses: Vec<_> = rows.iter().map(|a| a.status).collect();
        assert_eq!(
            statuses,
            [
                AppointmentStatus::Unknown,
                AppointmentStatus::Unknown,
                AppointmentStatus::Booked,
                AppointmentStatus::Unknown
            ]
        );
        assert_eq!(rows[1].date, None);
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2025, 3, 4));
        assert_eq!(rows[3].date, None);

        let stats = AppointmentStats::from_appointments(&rows);
        assert_eq!(stats.total_appointments, 4);
        assert_eq!(stats.booked_appointments, 1);
        assert_eq!(stats.cancelled_appointments, 0);
    }
}
