use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::calendar::{HolidayCalendar, NoticePolicy};
use crate::models::{Event, EventKind, Settings};

/// Every 3 accumulated points of one kind moves the projected date by one day.
pub const POINTS_PER_DAY: u32 = 3;

/// Derived numbers, recomputed from scratch on every call and never persisted.
/// A pure function of (events, settings, today); absent values are `None`,
/// never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_stress_points: u32,
    pub total_happy_points: u32,
    pub stress_days_earned: u32,
    pub happy_days_earned: u32,
    pub stress_points_until_next_day: u32,
    pub happy_points_until_next_day: u32,
    pub projected_resignation_date: Option<NaiveDate>,
    pub remaining_working_days: Option<u32>,
    pub tenure_months: Option<i32>,
    pub legal_notice_days: Option<u32>,
    pub legal_notice_date: Option<NaiveDate>,
}

pub fn compute_stats(
    events: &[Event],
    settings: &Settings,
    today: NaiveDate,
    calendar: &HolidayCalendar,
    policy: &NoticePolicy,
) -> Stats {
    let total_stress_points = sum_points(events, EventKind::Stress);
    let total_happy_points = sum_points(events, EventKind::Happy);

    // Stress pulls the date closer, happiness pushes it back.
    let stress_days_earned = total_stress_points / POINTS_PER_DAY;
    let happy_days_earned = total_happy_points / POINTS_PER_DAY;

    let mut stats = Stats {
        total_stress_points,
        total_happy_points,
        stress_days_earned,
        happy_days_earned,
        stress_points_until_next_day: points_until_next_day(total_stress_points),
        happy_points_until_next_day: points_until_next_day(total_happy_points),
        projected_resignation_date: None,
        remaining_working_days: None,
        tenure_months: None,
        legal_notice_days: None,
        legal_notice_date: None,
    };

    let Some(target) = settings.target_resignation_date else {
        return stats;
    };

    let projected =
        target - Days::new(u64::from(stress_days_earned)) + Days::new(u64::from(happy_days_earned));
    stats.projected_resignation_date = Some(projected);

    stats.remaining_working_days = Some(if projected < today {
        0
    } else {
        calendar.count_working_days(today, projected)
    });

    if let Some(onboarding) = settings.onboarding_date {
        let tenure = whole_months_between(onboarding, projected);
        let notice_days = policy.notice_days(tenure);
        stats.tenure_months = Some(tenure);
        stats.legal_notice_days = Some(notice_days);
        if notice_days > 0 {
            stats.legal_notice_date = Some(projected - Days::new(u64::from(notice_days)));
        }
    }

    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Recommendation {
    pub adaptation_date: Option<NaiveDate>,
    pub experience_date: Option<NaiveDate>,
}

/// Suggested resignation targets measured from the onboarding date: 12 months
/// to settle in, 15 months to have the experience count. Plain calendar
/// arithmetic, no holiday adjustment.
pub fn recommended_dates(onboarding: Option<NaiveDate>) -> Recommendation {
    let Some(onboarding) = onboarding else {
        return Recommendation::default();
    };
    Recommendation {
        adaptation_date: Some(onboarding + Months::new(12)),
        experience_date: Some(onboarding + Months::new(15)),
    }
}

fn sum_points(events: &[Event], kind: EventKind) -> u32 {
    events
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| u32::from(e.points))
        .sum()
}

// At an exact multiple of the threshold this reports a full 3 ("just crossed
// a threshold"), never 0.
fn points_until_next_day(total: u32) -> u32 {
    POINTS_PER_DAY - (total % POINTS_PER_DAY)
}

/// Whole calendar months between two dates, truncated toward zero. Negative
/// when `to` precedes `from`.
fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut months =
        (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32);
    if months > 0 && to.day() < from.day() {
        months -= 1;
    } else if months < 0 && to.day() > from.day() {
        months += 1;
    }
    months
}
