#[tokio::main]
async fn main() {
    checkin::start_subscriber().await;
}
