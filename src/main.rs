use gemini_relay::BoxError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), BoxError> {
    gemini_relay::run().await
}
