use super::repository::{self, Location, LocationWithOpeningHours, OpeningHours};
use crate::{
    modules::cart::types::{self as cart, CartItem},
    types::Context,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use std::sync::Arc;

pub const SLOT_MINUTES: i64 = 15;
pub const BASE_PREPARATION_MINUTES: i64 = 15;
pub const MINUTES_PER_EXTRA_PIZZA: i64 = 2;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PickupTime {
    pub time: NaiveDateTime,
    pub label: String,
}

#[derive(Debug)]
pub enum Error {
    LocationNotFound,
    UnexpectedError,
}

impl From<repository::Error> for Error {
    fn from(_: repository::Error) -> Self {
        Error::UnexpectedError
    }
}

pub async fn get_active_locations(ctx: Arc<Context>) -> Result<Vec<Location>, Error> {
    Ok(repository::find_active(&ctx.db_conn.pool).await?)
}

pub async fn get_location_with_opening_hours(
    ctx: Arc<Context>,
    id: i32,
) -> Result<Option<LocationWithOpeningHours>, Error> {
    let location = match repository::find_active_by_id(&ctx.db_conn.pool, id).await? {
        Some(location) => location,
        None => return Ok(None),
    };

    let opening_hours =
        repository::find_opening_hours_by_location_id(&ctx.db_conn.pool, location.id).await?;

    Ok(Some(LocationWithOpeningHours {
        location,
        opening_hours,
    }))
}

pub async fn get_available_pickup_times(
    ctx: Arc<Context>,
    id: i32,
    cart_items: Vec<CartItem>,
    now: NaiveDateTime,
) -> Result<Vec<PickupTime>, Error> {
    let location = get_location_with_opening_hours(ctx, id)
        .await?
        .ok_or(Error::LocationNotFound)?;

    let preparation = preparation_time(cart::total_quantity(&cart_items));

    Ok(available_pickup_times(
        &location.opening_hours,
        preparation,
        now,
    ))
}

/// 15 minutes for the first pizza and 2 more for each one after it.
pub fn preparation_time(total_quantity: u32) -> Duration {
    let extra_pizzas = total_quantity.saturating_sub(1) as i64;
    Duration::minutes(BASE_PREPARATION_MINUTES + extra_pizzas * MINUTES_PER_EXTRA_PIZZA)
}

fn day_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_monday() as i16
}

fn round_up_to_slot(t: NaiveDateTime) -> NaiveDateTime {
    let slot_seconds = SLOT_MINUTES * 60;
    let seconds = t.time().num_seconds_from_midnight() as i64;
    let truncated =
        t.date().and_time(NaiveTime::MIN) + Duration::seconds(seconds - seconds % slot_seconds);

    if truncated == t {
        t
    } else {
        truncated + Duration::seconds(slot_seconds)
    }
}

/// The open interval a day's hours describe, rolling past midnight when the
/// closing time is not after the opening time.
fn opening_window(hours: &OpeningHours, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    if hours.is_closed {
        return None;
    }

    let open = date.and_time(hours.open_time);
    let close = if hours.close_time <= hours.open_time {
        (date + Duration::days(1)).and_time(hours.close_time)
    } else {
        date.and_time(hours.close_time)
    };

    Some((open, close))
}

/// Pickup slots still reachable from `now`: on the 15 minute grid, no earlier
/// than `now + preparation`, and no later than closing time. Yesterday's hours
/// are consulted too so a late-night shift keeps offering slots after midnight.
pub fn available_pickup_times(
    opening_hours: &[OpeningHours],
    preparation: Duration,
    now: NaiveDateTime,
) -> Vec<PickupTime> {
    let earliest = round_up_to_slot(now + preparation);
    let today = now.date();
    let days = [today.pred_opt(), Some(today)];

    let mut slots = days
        .into_iter()
        .flatten()
        .filter_map(|date| {
            opening_hours
                .iter()
                .find(|hours| hours.day_of_week == day_index(date))
                .and_then(|hours| opening_window(hours, date))
        })
        .flat_map(|(open, close)| {
            let mut slot = earliest.max(round_up_to_slot(open));
            let mut window = vec![];

            while slot <= close {
                window.push(slot);
                slot += Duration::minutes(SLOT_MINUTES);
            }

            window
        })
        .collect::<Vec<_>>();

    slots.sort();
    slots.dedup();

    slots
        .into_iter()
        .map(|time| PickupTime {
            label: time.format("%H:%M").to_string(),
            time,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-10-16 is a Friday.
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn hours(day_of_week: i16, open: (u32, u32), close: (u32, u32), is_closed: bool) -> OpeningHours {
        OpeningHours {
            id: day_of_week as i32 + 1,
            location_id: 1,
            day_of_week,
            open_time: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            close_time: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap(),
            is_closed,
        }
    }

    const THURSDAY: i16 = 3;
    const FRIDAY: i16 = 4;

    #[test]
    fn preparation_grows_with_pizza_count() {
        assert_eq!(preparation_time(0), Duration::minutes(15));
        assert_eq!(preparation_time(1), Duration::minutes(15));
        assert_eq!(preparation_time(3), Duration::minutes(19));
    }

    #[test]
    fn absurd_carts_leave_no_slots_today() {
        let slots = available_pickup_times(
            &[hours(FRIDAY, (11, 0), (22, 0), false)],
            preparation_time(u32::MAX),
            at(16, 10, 0),
        );

        assert!(slots.is_empty());
    }

    #[test]
    fn covers_whole_day_before_opening() {
        let slots = available_pickup_times(
            &[hours(FRIDAY, (11, 0), (22, 0), false)],
            preparation_time(1),
            at(16, 10, 0),
        );

        assert_eq!(slots.len(), 45);
        assert_eq!(slots.first().unwrap().time, at(16, 11, 0));
        assert_eq!(slots.first().unwrap().label, "11:00");
        assert_eq!(slots.last().unwrap().time, at(16, 22, 0));
    }

    #[test]
    fn first_slot_respects_preparation_time() {
        let slots = available_pickup_times(
            &[hours(FRIDAY, (11, 0), (22, 0), false)],
            preparation_time(3),
            at(16, 17, 3),
        );

        assert_eq!(slots.first().unwrap().time, at(16, 17, 30));
        assert!(slots
            .iter()
            .all(|slot| slot.time >= at(16, 17, 3) + preparation_time(3)));
    }

    #[test]
    fn slots_sit_on_the_grid_in_increasing_order() {
        let slots = available_pickup_times(
            &[hours(FRIDAY, (11, 7), (22, 0), false)],
            preparation_time(2),
            at(16, 9, 41),
        );

        assert_eq!(slots.first().unwrap().time, at(16, 11, 15));
        assert!(slots.iter().all(|slot| slot.time.minute() % 15 == 0));
        assert!(slots.windows(2).all(|pair| pair[0].time < pair[1].time));
        assert!(slots.iter().all(|slot| slot.time <= at(16, 22, 0)));
    }

    #[test]
    fn closed_or_unknown_days_have_no_slots() {
        assert!(available_pickup_times(
            &[hours(FRIDAY, (11, 0), (22, 0), true)],
            preparation_time(1),
            at(16, 10, 0),
        )
        .is_empty());

        assert!(available_pickup_times(&[], preparation_time(1), at(16, 10, 0)).is_empty());
    }

    #[test]
    fn no_slots_once_closing_is_out_of_reach() {
        let slots = available_pickup_times(
            &[hours(FRIDAY, (11, 0), (22, 0), false)],
            preparation_time(1),
            at(16, 21, 50),
        );

        assert!(slots.is_empty());
    }

    #[test]
    fn late_shift_from_yesterday_continues_after_midnight() {
        let slots = available_pickup_times(
            &[
                hours(THURSDAY, (18, 0), (2, 0), false),
                hours(FRIDAY, (11, 0), (22, 0), true),
            ],
            preparation_time(1),
            at(16, 0, 30),
        );

        let labels = slots.iter().map(|slot| slot.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["00:45", "01:00", "01:15", "01:30", "01:45", "02:00"]);
    }

    #[test]
    fn late_shift_today_runs_into_tomorrow() {
        let slots = available_pickup_times(
            &[hours(FRIDAY, (18, 0), (1, 0), false)],
            preparation_time(1),
            at(16, 23, 20),
        );

        assert_eq!(slots.first().unwrap().time, at(16, 23, 45));
        assert_eq!(slots.last().unwrap().time, at(17, 1, 0));
        assert_eq!(slots.len(), 6);
    }
}
