use payloads::{CinemaId, ClientError, MovieId, requests, stats};
use reqwest::StatusCode;
use resource::display_message;

use test_helpers::{assert_status_code, spawn_mock_backend};

#[tokio::test]
async fn list_movies_reads_mongo_ids() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let movies = app.client.list_movies().await?;

    assert_eq!(movies.len(), 4);
    assert_eq!(movies[0].id, MovieId::from("m1"));
    assert_eq!(movies[0].title, "Tesis");
    assert_eq!(movies[0].duration_minutes, Some(125));
    assert_eq!(movies[3].rating, None);

    let stats = stats::movie_stats(&movies);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.by_genre.get("Drama"), Some(&3));

    Ok(())
}

#[tokio::test]
async fn search_is_case_insensitive() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let found = app.client.search_movies("LABERINTO").await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, MovieId::from("m3"));

    let none = app.client.search_movies("zzz").await?;
    assert!(none.is_empty());

    Ok(())
}

#[tokio::test]
async fn missing_movie_reports_backend_message() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let result = app.client.get_movie(&MovieId::from("nope")).await;

    match &result {
        Err(err @ ClientError::APIError { message, .. }) => {
            assert_eq!(message.as_deref(), Some("Película no encontrada"));
            assert_eq!(display_message(err), "Película no encontrada");
        }
        _ => panic!("Expected APIError"),
    }
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn failure_without_envelope_uses_status_message() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let err = app
        .client
        .get_movie(&MovieId::from("boom"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(display_message(&err), "Request failed with status code 500");

    Ok(())
}

#[tokio::test]
async fn compare_fetches_both_movies() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let (left, right) = app
        .client
        .compare_movies(&MovieId::from("m1"), &MovieId::from("m2"))
        .await?;
    assert_eq!(left.title, "Tesis");
    assert_eq!(right.title, "Abre los ojos");

    let result = app
        .client
        .compare_movies(&MovieId::from("m1"), &MovieId::from("nope"))
        .await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn reviews_round_trip() -> anyhow::Result<()> {
    let mut app = spawn_mock_backend().await;
    let movie_id = MovieId::from("m2");

    assert!(app.client.list_reviews(&movie_id).await?.is_empty());

    let details = requests::CreateReview {
        movie_id: movie_id.clone(),
        rating: 4,
        comment: "  Muy recomendable  ".into(),
    };
    // reviews need a session
    let result = app.client.create_review(&details).await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    app.login_alice().await?;
    let review = app.client.create_review(&details).await?;
    assert_eq!(review.movie_id, movie_id);
    assert_eq!(review.comment, "Muy recomendable");
    assert_eq!(review.author.as_deref(), Some("alice"));

    let reviews = app.client.list_reviews(&movie_id).await?;
    assert_eq!(reviews, vec![review]);

    Ok(())
}

#[tokio::test]
async fn invalid_review_is_rejected() -> anyhow::Result<()> {
    let mut app = spawn_mock_backend().await;
    app.login_alice().await?;

    let details = requests::CreateReview {
        movie_id: MovieId::from("m1"),
        rating: 9,
        comment: "Demasiado".into(),
    };
    let err = app.client.create_review(&details).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(
        display_message(&err),
        "La puntuación debe estar entre 1 y 5"
    );

    Ok(())
}

#[tokio::test]
async fn cinemas() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let cinemas = app.client.list_cinemas().await?;
    assert_eq!(cinemas.len(), 2);
    assert!(cinemas[0].location.is_some());
    assert!(cinemas[1].location.is_none());

    let dore = app.client.get_cinema(&CinemaId::from("c2")).await?;
    assert_eq!(dore.full_address(), test_helpers::mock::DORE_ADDRESS);

    let result = app.client.get_cinema(&CinemaId::from("c9")).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}
