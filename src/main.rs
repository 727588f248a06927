#[tokio::main]
async fn main() {
    event_registration_backend::run().await;
}
