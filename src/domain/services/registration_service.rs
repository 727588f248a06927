use std::sync::Arc;
use crate::domain::{
    models::{
        booking::Booking,
        event::{Attendee, Event, EventStatus},
        payment::{PaymentDetails, PaymentInput},
        user::User,
    },
    ports::{BookingRepository, EventRepository, UserRepository},
    services::notification_service::NotificationService,
};
use crate::error::AppError;
use tracing::{info, warn};

/// Rejects the caller when the event no longer takes registrations, they
/// already hold a seat, or the event is full, in that order.
pub fn check_admission(event: &Event, user_id: &str) -> Result<(), AppError> {
    if event.status != EventStatus::Upcoming {
        return Err(AppError::Validation("Event is not open for registration".into()));
    }
    if event.is_registered(user_id) {
        return Err(AppError::Validation("Already registered for this event".into()));
    }
    if event.is_full() {
        return Err(AppError::Validation("Event is full".into()));
    }
    Ok(())
}

pub struct Registration {
    pub event: Event,
    pub booking: Booking,
}

pub struct RegistrationService {
    event_repo: Arc<dyn EventRepository>,
    user_repo: Arc<dyn UserRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    notifications: Arc<NotificationService>,
}

impl RegistrationService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        user_repo: Arc<dyn UserRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self { event_repo, user_repo, booking_repo, notifications }
    }

    /// The check and the attendee insert are separate statements, so two
    /// concurrent registrations for the last seat can both succeed.
    pub async fn register(&self, event_id: &str, user: &User, payment: Option<PaymentInput>) -> Result<Registration, AppError> {
        let mut event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        check_admission(&event, &user.id)?;

        let payment = PaymentDetails::resolve(payment, event.price)?;
        let attendee = Attendee::new(&user.id, &payment);

        self.event_repo.add_attendee(&event.id, &attendee).await?;
        event.attendees.push(attendee.clone());

        self.user_repo.push_registered_event(&user.id, &event.id).await?;

        let booking = self.booking_repo.upsert(&Booking::snapshot(&event, user, &payment)).await?;
        info!(
            event_id = %event.id,
            user_id = %user.id,
            booking_id = %booking.id,
            payment_method = %payment.method,
            payment_status = %payment.status,
            "Registration recorded"
        );

        if let Err(e) = self.notifications.send_registration_confirmation(&event, user, &attendee).await {
            warn!("Confirmation email for booking {} failed: {}", booking.id, e);
        }

        Ok(Registration { event, booking })
    }

    /// Drops the caller's attendee entries. The booking is kept as the record
    /// of the last registration.
    pub async fn cancel(&self, event_id: &str, user: &User) -> Result<Event, AppError> {
        let event = self.event_repo.find_by_id(event_id).await?
            .ok_or(AppError::NotFound("Event not found".into()))?;

        let removed = self.event_repo.remove_attendee(&event.id, &user.id).await?;
        self.user_repo.pull_registered_event(&user.id, &event.id).await?;

        info!("Registration cancelled for user {} on event {} ({} entries removed)", user.id, event.id, removed);

        self.event_repo.find_by_id(&event.id).await?
            .ok_or(AppError::NotFound("Event not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event::{EventCategory, Location, NewEventParams};
    use crate::domain::models::payment::{PaymentMethod, PaymentStatus};
    use chrono::Utc;

    fn event(capacity: i32) -> Event {
        Event::new(NewEventParams {
            title: "Rust Meetup".into(),
            description: "Talks".into(),
            category: EventCategory::Meetup,
            date: Utc::now(),
            start_time: "18:00".into(),
            end_time: "20:00".into(),
            location: Location {
                venue: "Hall".into(),
                address: "Main St".into(),
                city: None,
                state: None,
                zip_code: None,
            },
            organizer: "org".into(),
            capacity,
            price: 0.0,
            image: String::new(),
            status: EventStatus::Upcoming,
            tags: vec![],
            is_public: true,
        })
    }

    fn free_attendee(user_id: &str) -> Attendee {
        Attendee::new(user_id, &PaymentDetails {
            method: PaymentMethod::Free,
            status: PaymentStatus::Paid,
            reference: String::new(),
            transaction_id: String::new(),
        })
    }

    #[test]
    fn admits_when_seats_remain() {
        let mut ev = event(2);
        ev.attendees.push(free_attendee("a"));
        assert!(check_admission(&ev, "b").is_ok());
    }

    #[test]
    fn rejects_duplicate_user() {
        let mut ev = event(5);
        ev.attendees.push(free_attendee("a"));
        let err = check_admission(&ev, "a").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Already registered for this event"));
    }

    #[test]
    fn rejects_when_full() {
        let mut ev = event(1);
        ev.attendees.push(free_attendee("a"));
        let err = check_admission(&ev, "b").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Event is full"));
    }

    #[test]
    fn duplicate_is_reported_before_capacity() {
        let mut ev = event(1);
        ev.attendees.push(free_attendee("a"));
        let err = check_admission(&ev, "a").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Already registered for this event"));
    }

    #[test]
    fn rejects_events_that_are_not_upcoming() {
        for status in [EventStatus::Ongoing, EventStatus::Completed, EventStatus::Cancelled] {
            let mut ev = event(3);
            ev.status = status;
            let err = check_admission(&ev, "a").unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Event is not open for registration"), "status {}", status);
        }
    }
}
