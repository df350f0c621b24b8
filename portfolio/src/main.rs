#[tokio::main]
async fn main() {
    if let Err(e) = portfolio_lib::run().await {
        eprintln!("portfolio: {e}");
        std::process::exit(1);
    }
}
