use payloads::geo::{Coordinates, GeoError, Geocoder};
use payloads::CinemaId;
use test_helpers::mock::{DORE_ADDRESS, GOLEM_ADDRESS};

use test_helpers::spawn_mock_backend;

#[tokio::test]
async fn geocode_known_address() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let coordinates = app.geocoder.geocode(DORE_ADDRESS).await?;

    assert_eq!(
        coordinates,
        Coordinates {
            lat: 40.4119,
            lon: -3.6989
        }
    );

    Ok(())
}

#[tokio::test]
async fn geocode_unknown_address() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;

    let err = app.geocoder.geocode("Calle Falsa 123").await.unwrap_err();

    assert!(matches!(err, GeoError::NotFound(ref a) if a == "Calle Falsa 123"));

    Ok(())
}

#[tokio::test]
async fn route_between_cinemas() -> anyhow::Result<()> {
    let app = spawn_mock_backend().await;
    let golem = app.client.get_cinema(&CinemaId::from("c1")).await?;
    let dore = app.client.get_cinema(&CinemaId::from("c2")).await?;

    // Golem ships coordinates, Doré must be geocoded
    let origin = golem.location.expect("seeded location");
    let destination = app.geocoder.geocode(&dore.full_address()).await?;
    let route = app.geocoder.route(origin, destination).await?;

    // roughly 1.9km apart as the crow flies
    assert!(route.distance_km() > 1.5 && route.distance_km() < 2.5);
    assert!(route.duration_minutes() > 0);

    let golem_geocoded = app.geocoder.geocode(GOLEM_ADDRESS).await?;
    let err = app
        .geocoder
        .route(origin, golem_geocoded)
        .await
        .unwrap_err();
    assert!(matches!(err, GeoError::NoRoute));

    Ok(())
}
