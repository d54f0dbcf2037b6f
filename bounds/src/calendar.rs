//! Calendar frequencies for ticks on datetime axes.
//!
//! Fixed frequencies (hour, day, week) simply step from the first date.
//! Anchored frequencies (month/year begin/end) are rolled forward onto their
//! first anchor before stepping, the time of day is carried along unchanged.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta};
use itertools::Itertools;

/// A calendar frequency (or offset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    MonthEnd,
    MonthBegin,
    YearEnd,
    YearBegin,
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

impl Frequency {
    fn fixed_step(self) -> Option<TimeDelta> {
        match self {
            Frequency::Hourly => Some(TimeDelta::hours(1)),
            Frequency::Daily => Some(TimeDelta::days(1)),
            Frequency::Weekly => Some(TimeDelta::weeks(1)),
            _ => None,
        }
    }

    /// Whether `dt` lies on this frequency's anchor
    pub fn is_on_offset(self, dt: NaiveDateTime) -> bool {
        let date = dt.date();
        match self {
            Frequency::Hourly | Frequency::Daily | Frequency::Weekly => true,
            Frequency::MonthEnd => month_end(date) == Some(date),
            Frequency::MonthBegin => date.day() == 1,
            Frequency::YearEnd => date.month() == 12 && date.day() == 31,
            Frequency::YearBegin => date.month() == 1 && date.day() == 1,
        }
    }

    /// The next anchor strictly after `dt`
    pub fn forward(self, dt: NaiveDateTime) -> Option<NaiveDateTime> {
        if let Some(step) = self.fixed_step() {
            return dt.checked_add_signed(step);
        }
        let date = dt.date();
        let next = match self {
            Frequency::MonthEnd => {
                let end = month_end(date)?;
                if date < end {
                    end
                } else {
                    month_end(first_of_month(date)?.checked_add_months(Months::new(1))?)?
                }
            }
            Frequency::MonthBegin => first_of_month(date)?.checked_add_months(Months::new(1))?,
            Frequency::YearEnd => {
                let end = NaiveDate::from_ymd_opt(date.year(), 12, 31)?;
                if date < end {
                    end
                } else {
                    NaiveDate::from_ymd_opt(date.year() + 1, 12, 31)?
                }
            }
            Frequency::YearBegin => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)?,
            Frequency::Hourly | Frequency::Daily | Frequency::Weekly => return None,
        };
        Some(next.and_time(dt.time()))
    }

    /// The previous anchor strictly before `dt`
    pub fn backward(self, dt: NaiveDateTime) -> Option<NaiveDateTime> {
        if let Some(step) = self.fixed_step() {
            return dt.checked_sub_signed(step);
        }
        let date = dt.date();
        let previous = match self {
            Frequency::MonthEnd => first_of_month(date)?.pred_opt()?,
            Frequency::MonthBegin => {
                let begin = first_of_month(date)?;
                if date > begin {
                    begin
                } else {
                    begin.checked_sub_months(Months::new(1))?
                }
            }
            Frequency::YearEnd => NaiveDate::from_ymd_opt(date.year() - 1, 12, 31)?,
            Frequency::YearBegin => {
                let begin = NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
                if date > begin {
                    begin
                } else {
                    NaiveDate::from_ymd_opt(date.year() - 1, 1, 1)?
                }
            }
            Frequency::Hourly | Frequency::Daily | Frequency::Weekly => return None,
        };
        Some(previous.and_time(dt.time()))
    }

    /// `dt` itself if it is on an anchor, otherwise the next anchor
    pub fn roll_forward(self, dt: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.is_on_offset(dt) {
            Some(dt)
        } else {
            self.forward(dt)
        }
    }
}

/// All anchors of `freq` within `[start, end]`
pub fn date_range(start: NaiveDateTime, end: NaiveDateTime, freq: Frequency) -> Vec<NaiveDateTime> {
    let mut dates = Vec::new();
    let mut current = freq.roll_forward(start);
    while let Some(dt) = current {
        if dt > end {
            break;
        }
        dates.push(dt);
        current = freq.forward(dt);
    }
    dates
}

/// How a calendar method places its ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarRule {
    /// A tick at every anchor between the (padded) data extrema
    Frequent {
        freq: Frequency,
        /// Moves the start back to the previous anchor of this frequency
        onset: Option<Frequency>,
        /// Moves the end forward to the next anchor of this frequency
        offset: Option<Frequency>,
    },
    /// A tick in the middle between consecutive anchors
    Mid { freq: Frequency },
}

impl CalendarRule {
    pub(crate) const fn every(freq: Frequency) -> Self {
        CalendarRule::Frequent {
            freq,
            onset: None,
            offset: None,
        }
    }

    pub(crate) const fn padded(
        freq: Frequency,
        onset: Option<Frequency>,
        offset: Option<Frequency>,
    ) -> Self {
        CalendarRule::Frequent { freq, onset, offset }
    }

    pub(crate) const fn mid(freq: Frequency) -> Self {
        CalendarRule::Mid { freq }
    }

    /// Ticks for the given dates, keeping every `step`-th one
    pub fn ticks(self, dates: &[NaiveDateTime], step: usize) -> Vec<NaiveDateTime> {
        let step = step.max(1);
        let (Some(&min), Some(&max)) = (dates.iter().min(), dates.iter().max()) else {
            return Vec::new();
        };
        match self {
            CalendarRule::Frequent {
                freq,
                onset,
                offset,
            } => {
                let start = onset.and_then(|o| o.backward(min)).unwrap_or(min);
                let end = offset.and_then(|o| o.forward(max)).unwrap_or(max);
                date_range(start, end, freq)
                    .into_iter()
                    .step_by(step)
                    .collect()
            }
            CalendarRule::Mid { freq } => date_range(min, max, freq)
                .into_iter()
                .tuple_windows()
                .map(|(a, b)| a + (b - a) / 2)
                .step_by(step)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        dt(y, m, d, 0, 0)
    }

    #[test]
    fn test_hourly_keeps_start_time() {
        let ticks = CalendarRule::every(Frequency::Hourly)
            .ticks(&[dt(2000, 1, 1, 3, 10), dt(2000, 1, 1, 0, 30)], 1);
        assert_eq!(
            ticks,
            vec![
                dt(2000, 1, 1, 0, 30),
                dt(2000, 1, 1, 1, 30),
                dt(2000, 1, 1, 2, 30)
            ]
        );
    }

    #[test]
    fn test_weekly_with_step() {
        let ticks = CalendarRule::every(Frequency::Weekly)
            .ticks(&[day(2000, 1, 1), day(2000, 2, 15)], 2);
        assert_eq!(
            ticks,
            vec![day(2000, 1, 1), day(2000, 1, 15), day(2000, 1, 29), day(2000, 2, 12)]
        );
    }

    #[test]
    fn test_month_end_with_onset() {
        let rule = CalendarRule::padded(Frequency::MonthEnd, Some(Frequency::MonthBegin), None);
        let ticks = rule.ticks(&[day(2000, 1, 15), day(2000, 4, 10)], 1);
        assert_eq!(ticks, vec![day(2000, 1, 31), day(2000, 2, 29), day(2000, 3, 31)]);
    }

    #[test]
    fn test_month_begin_with_onset_and_offset() {
        let rule = CalendarRule::padded(
            Frequency::MonthBegin,
            Some(Frequency::MonthBegin),
            Some(Frequency::MonthBegin),
        );
        let ticks = rule.ticks(&[day(2000, 1, 15), day(2000, 4, 10)], 1);
        assert_eq!(
            ticks,
            vec![
                day(2000, 1, 1),
                day(2000, 2, 1),
                day(2000, 3, 1),
                day(2000, 4, 1),
                day(2000, 5, 1)
            ]
        );
    }

    #[test]
    fn test_mid_month() {
        let ticks = CalendarRule::mid(Frequency::MonthEnd).ticks(&[day(2000, 1, 15), day(2000, 4, 10)], 1);
        assert_eq!(ticks, vec![dt(2000, 2, 14, 12, 0), dt(2000, 3, 15, 12, 0)]);
    }

    #[test]
    fn test_year_rules() {
        let dates = [day(2001, 6, 1), day(2003, 2, 1)];

        let begin = CalendarRule::padded(
            Frequency::YearBegin,
            Some(Frequency::YearBegin),
            Some(Frequency::YearBegin),
        )
        .ticks(&dates, 1);
        assert_eq!(
            begin,
            vec![day(2001, 1, 1), day(2002, 1, 1), day(2003, 1, 1), day(2004, 1, 1)]
        );

        let end = CalendarRule::padded(Frequency::YearEnd, Some(Frequency::YearBegin), None)
            .ticks(&dates, 1);
        assert_eq!(end, vec![day(2001, 12, 31), day(2002, 12, 31)]);

        let mid = CalendarRule::mid(Frequency::YearBegin).ticks(&dates, 1);
        assert_eq!(mid, vec![dt(2002, 7, 2, 12, 0)]);
    }

    #[test]
    fn test_backward_on_anchor_moves_one_period() {
        assert_eq!(Frequency::MonthBegin.backward(day(2000, 3, 1)), Some(day(2000, 2, 1)));
        assert_eq!(Frequency::YearBegin.backward(day(2000, 1, 1)), Some(day(1999, 1, 1)));
        assert_eq!(Frequency::MonthEnd.forward(day(2000, 1, 31)), Some(day(2000, 2, 29)));
    }

    #[test]
    fn test_empty_dates() {
        assert!(CalendarRule::every(Frequency::Daily).ticks(&[], 1).is_empty());
    }
}
