#[tokio::main]
async fn main() {
    checkin::start_interface().await;
}
