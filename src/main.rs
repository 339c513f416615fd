#[tokio::main]
async fn main() {
    if let Err(err) = bankgate::mcp::server::run_stdio().await {
        eprintln!("bankgate: {}", err);
        std::process::exit(1);
    }
}
