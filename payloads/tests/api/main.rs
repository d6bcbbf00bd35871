mod favorites;
mod geo;
mod movies;
mod resource_lifecycle;

use test_helpers::spawn_mock_backend;

#[tokio::test]
async fn health_check() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    app.client.health_check().await?;

    Ok(())
}
