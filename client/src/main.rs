#[tokio::main]
async fn main() {
    gymadmin::app::run().await;
}
