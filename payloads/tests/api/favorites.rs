use payloads::{APIClient, MovieId, requests};
use reqwest::StatusCode;
use resource::{FALLBACK_MESSAGE, display_message};

use test_helpers::{assert_status_code, spawn_mock_backend};

#[tokio::test]
async fn login_refused() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let body = requests::LoginCredentials {
        email: "random@example.com".into(),
        password: "random".into(),
    };
    let err = app.client.login(&body).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(display_message(&err), "Credenciales inválidas");

    Ok(())
}

#[tokio::test]
async fn favorites_require_session() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let result = app.client.list_favorites().await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn favorites_are_normalized() -> anyhow::Result<()> {
    let mut app = spawn_mock_backend().await;
    let user = app.login_alice().await?;
    assert_eq!(user.username, "alice");

    // seeded favorite has a populated movie
    assert_eq!(app.client.list_favorites().await?, vec![MovieId::from("m1")]);

    // new favorites are stored with a bare `movieId`
    app.client.add_favorite(&MovieId::from("m3")).await?;
    assert_eq!(
        app.client.list_favorites().await?,
        vec![MovieId::from("m1"), MovieId::from("m3")]
    );

    app.client.remove_favorite(&MovieId::from("m1")).await?;
    assert_eq!(app.client.list_favorites().await?, vec![MovieId::from("m3")]);

    Ok(())
}

#[tokio::test]
async fn duplicate_and_missing_favorites() -> anyhow::Result<()> {
    let mut app = spawn_mock_backend().await;
    app.login_alice().await?;

    let result = app.client.add_favorite(&MovieId::from("m1")).await;
    assert_status_code(result, StatusCode::BAD_REQUEST);

    let result = app.client.add_favorite(&MovieId::from("nope")).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    let result = app.client.remove_favorite(&MovieId::from("m2")).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_uses_fallback_message() -> anyhow::Result<()> {
    // nothing listens on the discard port
    let client = APIClient::new("http://127.0.0.1:9");

    let err = client.list_movies().await.unwrap_err();

    assert!(matches!(err, payloads::ClientError::Network(_)));
    assert_eq!(display_message(&err), FALLBACK_MESSAGE);

    Ok(())
}
