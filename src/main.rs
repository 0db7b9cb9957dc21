#[tokio::main]
async fn main() -> std::io::Result<()> {
    clipnote::run().await
}
