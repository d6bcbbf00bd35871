//! AsyncResource driven by the real client against the mock backend.

use payloads::{ClientError, Movie, MovieId};
use resource::{AsyncResource, Phase};

use test_helpers::spawn_mock_backend;

#[tokio::test]
async fn movie_resource_follows_dependency() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;
    let client = app.client.clone();
    let selected = std::rc::Rc::new(std::cell::RefCell::new(MovieId::from("m1")));

    let current = selected.clone();
    let resource: AsyncResource<Movie, ClientError, MovieId> =
        AsyncResource::new(
            move || {
                let client = client.clone();
                let movie_id = current.borrow().clone();
                async move { client.get_movie(&movie_id).await }
            },
            true,
        );

    let first = resource
        .sync_dependencies(MovieId::from("m1"))
        .expect("first activation runs");
    assert_eq!(first.await?.title, "Tesis");

    assert!(resource.sync_dependencies(MovieId::from("m1")).is_none());

    *selected.borrow_mut() = MovieId::from("nope");
    let missing = resource
        .sync_dependencies(MovieId::from("nope"))
        .expect("changed dependency runs");
    assert!(missing.await.is_err());

    // failed lookup keeps the previous movie and shows the backend message
    assert_eq!(resource.phase(), Phase::Error);
    assert_eq!(resource.error().as_deref(), Some("Película no encontrada"));
    assert_eq!(resource.data().map(|m| m.title), Some("Tesis".to_string()));

    *selected.borrow_mut() = MovieId::from("m2");
    resource.refetch().await?;
    assert_eq!(resource.error(), None);
    assert_eq!(
        resource.data().map(|m| m.title),
        Some("Abre los ojos".to_string())
    );

    Ok(())
}
