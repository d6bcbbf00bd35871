use payloads::geo::{Coordinates, GeoError, RouteResult};
use payloads::Cinema;
use yew::prelude::*;

use super::{ApiHookReturn, use_api};
use crate::{use_api_client, use_geocoder};

#[hook]
pub fn use_cinemas() -> ApiHookReturn<Vec<Cinema>> {
    let api_client = use_api_client();
    use_api((), move || {
        let api_client = api_client.clone();
        async move { api_client.list_cinemas().await }
    })
}

/// Where a cinema is. Stored coordinates win; otherwise the address is
/// geocoded.
#[hook]
pub fn use_cinema_location(cinema: Cinema) -> ApiHookReturn<Coordinates> {
    let geocoder = use_geocoder();
    use_api(cinema.clone(), move || {
        let geocoder = geocoder.clone();
        let cinema = cinema.clone();
        async move {
            match cinema.location {
                Some(location) => Ok::<_, GeoError>(location),
                None => {
                    let address = cinema.full_address();
                    geocoder.0.geocode(&address).await
                }
            }
        }
    })
}

/// Driving route from `origin` to `destination`. Nothing is requested until
/// both ends are known.
#[hook]
pub fn use_route(
    origin: Option<Coordinates>,
    destination: Option<Coordinates>,
) -> ApiHookReturn<Option<RouteResult>> {
    let geocoder = use_geocoder();
    use_api((origin, destination), move || {
        let geocoder = geocoder.clone();
        async move {
            match (origin, destination) {
                (Some(origin), Some(destination)) => {
                    geocoder.0.route(origin, destination).await.map(Some)
                }
                _ => Ok(None),
            }
        }
    })
}
