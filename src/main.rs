#[tokio::main]
async fn main() {
  if let Err(e) = rehab_log_lib::run().await {
    eprintln!("Failed to start rehab log: {}", e);
    std::process::exit(1);
  }
}
