use crate::modules::timesheets::core::day_log::{format_clock_time, project_entry};
use crate::modules::timesheets::core::time_log::TimeLogEntry;
use crate::shared::core::primitives::{DateRange, Timestamp};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DaySummary {
    pub log_id: String,
    pub date: NaiveDate,
    pub clocked_in_at: Option<String>,
    pub clocked_out_at: Option<String>,
    pub total_work_ms: i64,
    pub total_break_ms: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

/// Entries of the seven days ending at `selected_date`, newest first.
pub fn week_history(
    logs: &[TimeLogEntry],
    selected_date: NaiveDate,
    now: Timestamp,
) -> Vec<DaySummary> {
    let range = DateRange::new(
        selected_date - Days::new(6),
        selected_date,
    );

    let mut summaries: Vec<DaySummary> = logs
        .iter()
        .filter(|log| range.contains(log.date))
        .map(|log| {
            let stats = project_entry(log, now);
            DaySummary {
                log_id: log.id.clone(),
                date: log.date,
                clocked_in_at: stats.clocked_in_at,
                clocked_out_at: log.clock_out_time.map(format_clock_time),
                total_work_ms: stats.total_work_ms,
                total_break_ms: stats.total_break_ms,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.date.cmp(&a.date));
    summaries
}

/// The Sunday-to-Saturday week containing `date`.
pub fn calendar_week(date: NaiveDate) -> DateRange {
    let start = date - Days::new(u64::from(date.weekday().num_days_from_sunday()));
    DateRange::new(start, start + Days::new(6))
}

pub fn hours_worked_this_week(
    logs: &[TimeLogEntry],
    selected_date: NaiveDate,
    now: Timestamp,
) -> i64 {
    let week = calendar_week(selected_date);
    logs.iter()
        .filter(|log| week.contains(log.date))
        .map(|log| project_entry(log, now).total_work_ms)
        .sum::<i64>()
        .max(0)
}

/// Inclusive pay period containing `date`, starting on `start_day`.
pub fn pay_period_range(
    date: NaiveDate,
    frequency: PaymentFrequency,
    start_day: Weekday,
) -> DateRange {
    let offset = (7 + date.weekday().num_days_from_sunday() - start_day.num_days_from_sunday()) % 7;
    let start = date - Days::new(u64::from(offset));

    let end_exclusive = match frequency {
        PaymentFrequency::Weekly => start + Days::new(7),
        PaymentFrequency::Biweekly => start + Days::new(14),
        PaymentFrequency::Monthly => start
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX),
    };

    DateRange::new(start, end_exclusive.pred_opt().unwrap_or(end_exclusive))
}

#[cfg(test)]
mod history_tests {
    use super::*;
    use crate::tests::fixtures::time_logs::{TimeLogEntryBuilder, at, day, on};
    use rstest::rstest;

    const HOUR: i64 = 3_600_000;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn closed_day(d: u32, hours: u32) -> TimeLogEntry {
        TimeLogEntryBuilder::new()
            .id(format!("log-{d}"))
            .clock_in(on(d, 9, 0))
            .clock_out(on(d, 9 + hours, 0))
            .build()
    }

    #[rstest]
    fn it_should_list_the_last_seven_days_newest_first() {
        let logs = vec![
            closed_day(7, 8),
            closed_day(8, 8),
            closed_day(10, 6),
            closed_day(13, 7),
            TimeLogEntryBuilder::new().id("log-14").clock_in(at(9, 0, 0)).build(),
        ];
        let history = week_history(&logs, day(), at(11, 0, 0));
        let ids: Vec<&str> = history.iter().map(|s| s.log_id.as_str()).collect();
        assert_eq!(ids, vec!["log-14", "log-13", "log-10", "log-8"]);
        assert_eq!(history[0].total_work_ms, 2 * HOUR);
        assert_eq!(history[1].total_work_ms, 7 * HOUR);
        assert_eq!(history[1].clocked_out_at.as_deref(), Some("4:00 PM"));
    }

    #[rstest]
    fn it_should_sum_the_calendar_week_including_live_work() {
        // 2025-03-14 is a Friday; the week runs Sunday 9th to Saturday 15th.
        let logs = vec![
            closed_day(8, 8),
            closed_day(10, 8),
            closed_day(11, 7),
            TimeLogEntryBuilder::new().clock_in(at(9, 0, 0)).build(),
        ];
        let total = hours_worked_this_week(&logs, day(), at(12, 0, 0));
        assert_eq!(total, 8 * HOUR + 7 * HOUR + 3 * HOUR);
    }

    #[rstest]
    #[case(date(14), date(9), date(15))]
    #[case(date(9), date(9), date(15))]
    #[case(date(15), date(9), date(15))]
    fn it_should_bound_the_calendar_week(
        #[case] input: NaiveDate,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        assert_eq!(calendar_week(input), DateRange::new(start, end));
    }

    #[rstest]
    #[case(PaymentFrequency::Weekly, Weekday::Mon, date(10), date(16))]
    #[case(PaymentFrequency::Biweekly, Weekday::Mon, date(10), date(23))]
    #[case(PaymentFrequency::Monthly, Weekday::Mon, date(10), NaiveDate::from_ymd_opt(2025, 4, 9).unwrap())]
    #[case(PaymentFrequency::Weekly, Weekday::Fri, date(14), date(20))]
    #[case(PaymentFrequency::Weekly, Weekday::Sat, date(8), date(14))]
    fn it_should_compute_pay_periods(
        #[case] frequency: PaymentFrequency,
        #[case] start_day: Weekday,
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
    ) {
        assert_eq!(
            pay_period_range(day(), frequency, start_day),
            DateRange::new(start, end)
        );
    }
}
