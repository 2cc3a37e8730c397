//! Shipping-schedule calendar check.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::models::ShippingSchedule;
use crate::selection::RouteEnds;

/// ISO weekday number: Monday=1 .. Sunday=7
pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Whether any schedule row for (carrier, shipping city, delivery city)
/// lists both the shipment's shipping weekday and delivery weekday.
/// A route with unknown dates or cities cannot match any row.
pub fn schedule_allows(schedules: &[ShippingSchedule], carrier_id: Uuid, route: &RouteEnds) -> bool {
    let (Some(shipping_city), Some(delivery_city), Some(ship_date), Some(delivery_date)) = (
        route.shipping_city.as_deref(),
        route.delivery_city.as_deref(),
        route.shipping_date,
        route.delivery_date,
    ) else {
        return false;
    };

    let shipping_day = iso_weekday(ship_date);
    let delivery_day = iso_weekday(delivery_date);

    schedules.iter().any(|s| {
        s.carrier_id == carrier_id
            && s.shipping_city == shipping_city
            && s.delivery_city == delivery_city
            && s.shipping_days.contains(&shipping_day)
            && s.delivery_days.contains(&delivery_day)
    })
}
