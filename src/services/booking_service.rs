use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Asset, Booking};

use super::{audit, ServiceError, ServiceResult};

/// Inclusive day count: booking 2024-01-01 through 2024-01-01 is one
/// day, not zero.
pub fn booking_days(start: NaiveDate, end: NaiveDate) -> Option<i64> {
    if end < start {
        return None;
    }
    Some((end - start).num_days() + 1)
}

/// Validate a date range against the asset's minimum stay and price it.
pub fn quote(asset: &Asset, start: NaiveDate, end: NaiveDate) -> Result<(i64, Decimal), ServiceError> {
    let days = booking_days(start, end)
        .ok_or_else(|| ServiceError::Validation("End date must not precede start date".to_string()))?;

    let min_days = asset.min_booking_days.max(1) as i64;
    if days < min_days {
        return Err(ServiceError::Validation(format!(
            "This asset requires a minimum booking of {} days",
            min_days
        )));
    }

    let total = asset.base_price_per_day * Decimal::from(days);
    Ok((days, total))
}

pub async fn list_assets() -> ServiceResult<Vec<Asset>> {
    let pool = DatabaseManager::pool().await?;
    let assets = sqlx::query_as::<_, Asset>(
        "SELECT * FROM assets WHERE status = 'AVAILABLE' ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await?;
    Ok(assets)
}

pub async fn get_asset(asset_id: Uuid) -> ServiceResult<Asset> {
    let pool = DatabaseManager::pool().await?;
    sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
        .bind(asset_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Asset not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub asset_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Price is always computed server-side from the stored day rate.
pub async fn create_booking(customer_id: Uuid, req: BookingRequest) -> ServiceResult<Booking> {
    let asset = get_asset(req.asset_id).await?;
    let (_, total) = quote(&asset, req.start_date, req.end_date)?;

    let pool = DatabaseManager::pool().await?;
    let booking = sqlx::query_as::<_, Booking>(
        "INSERT INTO bookings (customer_id, asset_id, start_date, end_date, total_price, status, payment_status)
         VALUES ($1, $2, $3, $4, $5, 'CONFIRMED', 'PENDING')
         RETURNING *",
    )
    .bind(customer_id)
    .bind(req.asset_id)
    .bind(req.start_date)
    .bind(req.end_date)
    .bind(total)
    .fetch_one(&pool)
    .await?;

    audit::append(
        Some(customer_id),
        "BOOKING_CREATED",
        "bookings",
        Some(booking.id.to_string()),
        json!({ "asset_id": req.asset_id, "total_price": total }),
    );

    Ok(booking)
}

pub async fn bookings_for(customer_id: Uuid) -> ServiceResult<Vec<Booking>> {
    let pool = DatabaseManager::pool().await?;
    let bookings = sqlx::query_as::<_, Booking>(
        "SELECT * FROM bookings WHERE customer_id = $1 ORDER BY created_at DESC",
    )
    .bind(customer_id)
    .fetch_all(&pool)
    .await?;
    Ok(bookings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn asset(price: i64, min_days: i32) -> Asset {
        Asset {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            name: "Billboard A".to_string(),
            asset_type: "BILLBOARD".to_string(),
            base_price_per_day: Decimal::from(price),
            min_booking_days: min_days,
            status: "AVAILABLE".to_string(),
            created_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn same_day_counts_as_one() {
        assert_eq!(booking_days(date(2024, 1, 1), date(2024, 1, 1)), Some(1));
    }

    #[test]
    fn end_before_start_is_invalid() {
        assert_eq!(booking_days(date(2024, 1, 2), date(2024, 1, 1)), None);
    }

    #[test]
    fn below_minimum_stay_is_rejected() {
        let err = quote(&asset(1000, 15), date(2024, 3, 1), date(2024, 3, 1)).unwrap_err();
        match err {
            ServiceError::Validation(msg) => {
                assert!(msg.contains("minimum booking of 15 days"), "{msg}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn meets_minimum_and_prices_per_day() {
        // 19 inclusive days at 1000/day
        let (days, total) = quote(&asset(1000, 15), date(2024, 3, 1), date(2024, 3, 19)).unwrap();
        assert_eq!(days, 19);
        assert_eq!(total, Decimal::from(19_000));
    }

    #[test]
    fn zero_minimum_is_treated_as_one() {
        let (days, total) = quote(&asset(500, 0), date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(days, 1);
        assert_eq!(total, Decimal::from(500));
    }
}
