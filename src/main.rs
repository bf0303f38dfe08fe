#[tokio::main]
async fn main() {
    if let Err(e) = supplier_orders_lib::run().await {
        eprintln!("supplier-orders: {e}");
        std::process::exit(1);
    }
}
