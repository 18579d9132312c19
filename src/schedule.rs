use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    models::appointments::{Appointment, AppointmentStatus},
    utils::{week_days, week_start},
};

const WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub is_today: bool,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<ScheduleDay>,
}

impl WeekSchedule {
    /// Sunday-to-Saturday grid for the week containing `anchor`, holding only booked appointments.
    pub fn build(appointments: &[Appointment], anchor: NaiveDate, today: NaiveDate) -> Self {
        let start = week_start(anchor);
        let days: Vec<ScheduleDay> = week_days(start)
            .into_iter()
            .map(|date| ScheduleDay {
                date,
                weekday: WEEKDAYS[date.weekday().num_days_from_sunday() as usize],
                is_today: date == today,
                appointments: appointments
                    .iter()
                    .filter(|a| a.date == Some(date) && a.status == AppointmentStatus::Booked)
                    .cloned()
                    .collect(),
            })
            .collect();

        Self {
            week_start: start,
            week_end: days.last().map_or(start, |day| day.date),
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::appointments::appointment, utils::parse_date_str};

    #[test]
    fn only_booked_appointments_inside_the_week() {
        let list = vec![
            appointment("1", "d", "2025-03-01", "booked"), // previous Saturday
            appointment("2", "d", "2025-03-02", "booked"),
            appointment("3", "d", "2025-03-05", "cancelled"),
            appointment("4", "d", "2025-03-05", "booked"),
            appointment("5", "d", "2025-03-08", "booked"),
            appointment("6", "d", "2025-03-09", "booked"), // next Sunday
            appointment("7", "d", "not a date", "booked"),
            appointment("8", "d", "2025-03-04", "pending"),
        ];
        let schedule = WeekSchedule::build(
            &list,
            parse_date_str("2025-03-06").unwrap(),
            parse_date_str("2025-03-05").unwrap(),
        );

        assert_eq!(schedule.week_start, parse_date_str("2025-03-02").unwrap());
        assert_eq!(schedule.week_end, parse_date_str("2025-03-08").unwrap());
        assert_eq!(schedule.days[0].weekday, "sunday");
        assert_eq!(schedule.days[6].weekday, "saturday");

        let ids: Vec<Vec<&str>> = schedule
            .days
            .iter()
            .map(|day| day.appointments.iter().map(|a| a.id.as_str()).collect())
            .collect();
        assert_eq!(
            ids,
            vec![vec!["2"], vec![], vec![], vec!["4"], vec![], vec![], vec!["5"]]
        );

        let today: Vec<bool> = schedule.days.iter().map(|day| day.is_today).collect();
        assert_eq!(today, [false, false, false, true, false, false, false]);
    }
}
