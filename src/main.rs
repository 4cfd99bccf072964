#[tokio::main]
async fn main() {
    if let Err(e) = subscription_dashboard::run().await {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
