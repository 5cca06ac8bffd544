//! Calendar projection of a weekly plan template
//!
//! Plans rarely start on a Monday. The first plan week runs from the start
//! date through the following Sunday (inclusive); every later week runs
//! Monday through Sunday. All arithmetic is done on [`NaiveDate`] values and
//! whole calendar days, so DST transitions cannot shift a day boundary.

use crate::plan::{Plan, PlanItem};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A template day resolved onto a concrete calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedDayInstance {
    pub date: NaiveDate,
    /// Running day number from the plan start (day 1 = start date)
    pub day_number: u32,
    pub week_number: u32,
    pub template_index: usize,
    pub is_rest_day: bool,
    pub items: Vec<PlanItem>,
}

/// One bucket of the full plan calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedWeek {
    pub week_number: u32,
    pub days: Vec<DatedDayInstance>,
}

/// Monday of the calendar week containing `date`
pub fn week_start_monday(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(date.weekday().num_days_from_monday())))
        .unwrap_or(NaiveDate::MIN)
}

/// Length in days of the first plan week (start date through Sunday)
pub fn first_week_length(start: NaiveDate) -> i64 {
    7 - i64::from(start.weekday().num_days_from_monday())
}

/// Unclamped plan week a date falls into (1 for dates before the start)
fn week_number_for(plan: &Plan, date: NaiveDate) -> u32 {
    let days_diff = (date - plan.start_date).num_days();
    if days_diff < 0 {
        return 1;
    }

    let first_len = first_week_length(plan.start_date);
    if days_diff < first_len {
        1
    } else {
        let later = 2 + (days_diff - first_len) / 7;
        u32::try_from(later).unwrap_or(u32::MAX)
    }
}

/// Plan week that is current on `today`, clamped to `[1, total_weeks]`
pub fn current_week_number(plan: &Plan, today: NaiveDate) -> u32 {
    week_number_for(plan, today).clamp(1, plan.total_weeks.max(1))
}

/// First calendar date of plan week `week_number`
pub fn week_start(plan: &Plan, week_number: u32) -> NaiveDate {
    if week_number <= 1 {
        return plan.start_date;
    }
    let offset = first_week_length(plan.start_date) + i64::from(week_number - 2) * 7;
    plan.start_date
        .checked_add_signed(Duration::days(offset))
        .unwrap_or(NaiveDate::MAX)
}

fn instance_for(plan: &Plan, date: NaiveDate, week_number: u32) -> DatedDayInstance {
    let template_index = plan.template_index_for(date);
    let template = &plan.weekly_template[template_index];
    let day_number = (date - plan.start_date).num_days() + 1;

    DatedDayInstance {
        date,
        day_number: u32::try_from(day_number).unwrap_or(0),
        week_number,
        template_index,
        is_rest_day: template.is_rest_day,
        items: if template.is_rest_day {
            Vec::new()
        } else {
            template.items.clone()
        },
    }
}

/// The dated plan day on `date`, or `None` outside the active span
pub fn day_on(plan: &Plan, date: NaiveDate) -> Option<DatedDayInstance> {
    plan.contains(date)
        .then(|| instance_for(plan, date, week_number_for(plan, date)))
}

/// Dated days of plan week `week_number` (clamped to the plan length)
pub fn project_week_number(plan: &Plan, week_number: u32) -> Vec<DatedDayInstance> {
    let week_number = week_number.clamp(1, plan.total_weeks.max(1));
    days_from(plan, week_start(plan, week_number), week_number)
}

/// Active days from `first` through the following Sunday or the plan end
fn days_from(plan: &Plan, first: NaiveDate, week_number: u32) -> Vec<DatedDayInstance> {
    let end = plan.end_date();
    let mut days = Vec::with_capacity(7);

    let mut date = first;
    while date < end {
        days.push(instance_for(plan, date, week_number));
        if date.weekday() == Weekday::Sun || days.len() == 7 {
            break;
        }
        date += Duration::days(1);
    }

    days
}

/// Dated days of the week that is current on `today`
///
/// Inside the span this is always the calendar week containing `today`, even
/// for the short remainder week a non-Monday start leaves after week
/// `total_weeks`. Before the plan starts it is the first (possibly partial)
/// week; after it ends, the last numbered week.
pub fn project_week(plan: &Plan, today: NaiveDate) -> Vec<DatedDayInstance> {
    if !plan.contains(today) {
        return project_week_number(plan, current_week_number(plan, today));
    }

    let week_number = week_number_for(plan, today);
    let first = if week_number <= 1 {
        plan.start_date
    } else {
        week_start_monday(today)
    };
    days_from(plan, first, week_number)
}

/// Entire active span of the plan bucketed into plan weeks
///
/// When the start is not a Monday the span ends mid-week, so the final
/// bucket may be a short remainder week numbered `total_weeks + 1`.
pub fn project_plan(plan: &Plan) -> Vec<ProjectedWeek> {
    let mut weeks: Vec<ProjectedWeek> = Vec::new();
    let end = plan.end_date();
    let mut date = plan.start_date;

    while date < end {
        let week_number = week_number_for(plan, date);
        let instance = instance_for(plan, date, week_number);
        match weeks.last_mut() {
            Some(week) if week.week_number == week_number => week.days.push(instance),
            _ => weeks.push(ProjectedWeek {
                week_number,
                days: vec![instance],
            }),
        }
        date += Duration::days(1);
    }

    weeks
}
