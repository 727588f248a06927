use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use crate::infra::repositories::rows::BookingRow;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn upsert(&self, booking: &Booking) -> Result<Booking, AppError> {
        let row = sqlx::query_as::<_, BookingRow>(
            "INSERT INTO bookings (id, event_id, user_id, event_title, event_category, event_date, event_price, user_name, user_email, payment_method, payment_status, payment_reference, transaction_id, recorded_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (event_id, user_id) DO UPDATE SET
                event_title = excluded.event_title,
                event_category = excluded.event_category,
                event_date = excluded.event_date,
                event_price = excluded.event_price,
                user_name = excluded.user_name,
                user_email = excluded.user_email,
                payment_method = excluded.payment_method,
                payment_status = excluded.payment_status,
                payment_reference = excluded.payment_reference,
                transaction_id = excluded.transaction_id,
                recorded_at = excluded.recorded_at,
                updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.event).bind(&booking.user)
            .bind(&booking.event_snapshot.title).bind(booking.event_snapshot.category.as_str())
            .bind(booking.event_snapshot.date).bind(booking.event_snapshot.price)
            .bind(&booking.user_snapshot.name).bind(&booking.user_snapshot.email)
            .bind(booking.payment_method.as_str()).bind(booking.payment_status.as_str())
            .bind(&booking.payment_reference).bind(&booking.transaction_id)
            .bind(booking.recorded_at).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Booking::try_from(row)
    }

    async fn find_by_event_and_user(&self, event_id: &str, user_id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE event_id = ? AND user_id = ?")
            .bind(event_id).bind(user_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .map(Booking::try_from)
            .transpose()
    }
}
