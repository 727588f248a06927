use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, EmailService, EsewaGateway, EventRepository, KhaltiGateway, UserRepository,
};
use crate::domain::services::{
    auth_service::AuthService, notification_service::NotificationService,
    registration_service::RegistrationService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub khalti: Arc<dyn KhaltiGateway>,
    pub esewa: Arc<dyn EsewaGateway>,
    pub auth_service: Arc<AuthService>,
    pub registration_service: Arc<RegistrationService>,
}

impl AppState {
    /// Wires the services that sit on top of the repositories and adapters.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        event_repo: Arc<dyn EventRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        email_service: Arc<dyn EmailService>,
        khalti: Arc<dyn KhaltiGateway>,
        esewa: Arc<dyn EsewaGateway>,
        templates: Arc<tera::Tera>,
    ) -> Self {
        let notifications = Arc::new(NotificationService::new(email_service, templates));
        let registration_service = Arc::new(RegistrationService::new(
            event_repo.clone(),
            user_repo.clone(),
            booking_repo.clone(),
            notifications,
        ));

        Self {
            auth_service: Arc::new(AuthService::new(&config.jwt_secret)),
            config,
            user_repo,
            event_repo,
            booking_repo,
            khalti,
            esewa,
            registration_service,
        }
    }
}
