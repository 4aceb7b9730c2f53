#[tokio::main]
async fn main() {
    tokenops_engine::run().await;
}
