#[tokio::main]
async fn main() {
    coffee_shop::start_server().await;
}
