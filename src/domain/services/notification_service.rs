use std::sync::Arc;
use crate::domain::{
    models::{event::{Attendee, Event}, user::User},
    ports::EmailService,
};
use crate::error::AppError;
use tera::{Context, Tera};
use tracing::info;

pub const CONFIRMATION_TEMPLATE: &str = "confirmation.html";

pub struct NotificationService {
    email_service: Arc<dyn EmailService>,
    templates: Arc<Tera>,
}

impl NotificationService {
    pub fn new(email_service: Arc<dyn EmailService>, templates: Arc<Tera>) -> Self {
        Self { email_service, templates }
    }

    pub fn render_confirmation(&self, event: &Event, user: &User, attendee: &Attendee) -> Result<String, AppError> {
        let mut ctx = Context::new();
        ctx.insert("user_name", &user.name);
        ctx.insert("event_title", &event.title);
        ctx.insert("event_date", &event.date.format("%A, %B %e, %Y").to_string());
        ctx.insert("start_time", &event.start_time);
        ctx.insert("end_time", &event.end_time);
        ctx.insert("venue", &event.location.venue);
        ctx.insert("address", &event.location.address);
        ctx.insert("payment_method", attendee.payment_method.as_str());
        ctx.insert("payment_status", attendee.payment_status.as_str());
        ctx.insert("payment_reference", &attendee.payment_reference);

        self.templates
            .render(CONFIRMATION_TEMPLATE, &ctx)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {}", e)))
    }

    pub async fn send_registration_confirmation(&self, event: &Event, user: &User, attendee: &Attendee) -> Result<(), AppError> {
        let html = self.render_confirmation(event, user, attendee)?;
        let subject = format!("Registration confirmed: {}", event.title);
        self.email_service.send(&user.email, &subject, &html).await?;
        info!("Confirmation email sent to {} for event {}", user.email, event.id);
        Ok(())
    }
}
