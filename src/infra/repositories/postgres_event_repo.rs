use crate::domain::{
    models::event::{Attendee, Event, EventFilter},
    ports::EventRepository,
};
use crate::error::AppError;
use crate::infra::repositories::rows::{assemble_events, like_pattern, tags_json, AttendeeRow, EventRow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

const ATTENDEE_COLUMNS: &str = "SELECT event_id, user_id, registered_at, status, payment_method, payment_reference, payment_status FROM event_attendees";

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_attendees(&self, event_ids: &[String]) -> Result<Vec<AttendeeRow>, AppError> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb = QueryBuilder::<Postgres>::new(ATTENDEE_COLUMNS);
        qb.push(" WHERE event_id IN (");
        let mut ids = qb.separated(", ");
        for id in event_ids {
            ids.push_bind(id.clone());
        }
        ids.push_unseparated(") ORDER BY id ASC");
        qb.build_query_as::<AttendeeRow>().fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn hydrate(&self, rows: Vec<EventRow>) -> Result<Vec<Event>, AppError> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let attendees = self.fetch_attendees(&ids).await?;
        assemble_events(rows, attendees)
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query(
            "INSERT INTO events (id, title, description, category, date, start_time, end_time, venue, address, city, state, zip_code, organizer_id, capacity, price, image, status, tags_json, is_public, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)"
        )
            .bind(&event.id).bind(&event.title).bind(&event.description).bind(event.category.as_str())
            .bind(event.date).bind(&event.start_time).bind(&event.end_time)
            .bind(&event.location.venue).bind(&event.location.address).bind(&event.location.city)
            .bind(&event.location.state).bind(&event.location.zip_code).bind(&event.organizer)
            .bind(event.capacity).bind(event.price).bind(&event.image).bind(event.status.as_str())
            .bind(tags_json(event)?).bind(event.is_public).bind(event.created_at).bind(event.updated_at)
            .execute(&self.pool).await.map_err(AppError::Database)?;

        self.find_by_id(&event.id).await?.ok_or(AppError::Internal)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_public(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM events WHERE is_public = ");
        qb.push_bind(true);
        if let Some(category) = filter.category {
            qb.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = like_pattern(search);
            qb.push(" AND (title ILIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'")
                .push(" OR description ILIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'")
                .push(" OR EXISTS (SELECT 1 FROM json_array_elements_text(events.tags_json::json) AS tag WHERE tag ILIKE ")
                .push_bind(pattern).push(" ESCAPE '\\'))");
        }
        qb.push(" ORDER BY date ASC");

        let rows = qb.build_query_as::<EventRow>().fetch_all(&self.pool).await.map_err(AppError::Database)?;
        self.hydrate(rows).await
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE organizer_id = $1 ORDER BY date DESC")
            .bind(organizer_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        self.hydrate(rows).await
    }

    async fn list_registered(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT e.* FROM user_registered_events r JOIN events e ON e.id = r.event_id WHERE r.user_id = $1 ORDER BY r.id ASC"
        )
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        self.hydrate(rows).await
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        let result = sqlx::query(
            "UPDATE events SET title=$1, description=$2, category=$3, date=$4, start_time=$5, end_time=$6, venue=$7, address=$8, city=$9, state=$10, zip_code=$11, capacity=$12, price=$13, image=$14, status=$15, tags_json=$16, is_public=$17, updated_at=$18
             WHERE id=$19"
        )
            .bind(&event.title).bind(&event.description).bind(event.category.as_str()).bind(event.date)
            .bind(&event.start_time).bind(&event.end_time).bind(&event.location.venue).bind(&event.location.address)
            .bind(&event.location.city).bind(&event.location.state).bind(&event.location.zip_code)
            .bind(event.capacity).bind(event.price).bind(&event.image).bind(event.status.as_str())
            .bind(tags_json(event)?).bind(event.is_public).bind(Utc::now())
            .bind(&event.id)
            .execute(&self.pool).await.map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        self.find_by_id(&event.id).await?.ok_or(AppError::NotFound("Event not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM event_attendees WHERE event_id = $1").bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        let result = sqlx::query("DELETE FROM events WHERE id = $1").bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn add_attendee(&self, event_id: &str, attendee: &Attendee) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query(
            "INSERT INTO event_attendees (event_id, user_id, registered_at, status, payment_method, payment_reference, payment_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)"
        )
            .bind(event_id).bind(&attendee.user).bind(attendee.registered_at).bind(attendee.status.as_str())
            .bind(attendee.payment_method.as_str()).bind(&attendee.payment_reference).bind(attendee.payment_status.as_str())
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("UPDATE events SET updated_at = $1 WHERE id = $2").bind(Utc::now()).bind(event_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn remove_attendee(&self, event_id: &str, user_id: &str) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query("DELETE FROM event_attendees WHERE event_id = $1 AND user_id = $2")
            .bind(event_id).bind(user_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("UPDATE events SET updated_at = $1 WHERE id = $2").bind(Utc::now()).bind(event_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
