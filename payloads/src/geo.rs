//! Geocoding and routing capability.
//!
//! Views depend on the [`Geocoder`] trait only; [`OsmGeocoder`] talks to a
//! Nominatim-compatible search endpoint and an OSRM-compatible router.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use reqwest::StatusCode;
use resource::FailureMessage;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_ROUTER_URL: &str = "https://router.project-osrm.org";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteResult {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteResult {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Travel time rounded up to whole minutes.
    pub fn duration_minutes(&self) -> u32 {
        (self.duration_seconds / 60.0).ceil() as u32
    }
}

/// Resolves addresses to coordinates and plans routes between them.
///
/// Futures are boxed and not `Send` so the trait can be held as
/// `Rc<dyn Geocoder>` in browser code.
pub trait Geocoder {
    fn geocode<'a>(
        &'a self,
        address: &'a str,
    ) -> LocalBoxFuture<'a, Result<Coordinates, GeoError>>;

    fn route<'a>(
        &'a self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> LocalBoxFuture<'a, Result<RouteResult, GeoError>>;
}

#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("No se encontró la dirección \"{0}\"")]
    NotFound(String),
    #[error("No hay ruta entre los puntos indicados")]
    NoRoute,
    #[error("Location provider responded with status {0}")]
    Status(StatusCode),
    #[error("Malformed location provider response: {0}")]
    Malformed(String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl FailureMessage for GeoError {
    fn message(&self) -> Option<String> {
        match self {
            Self::NotFound(_) | Self::NoRoute => Some(self.to_string()),
            // provider details are for the logs only
            Self::Status(_) | Self::Malformed(_) | Self::Network(_) => None,
        }
    }
}

/// OpenStreetMap-backed [`Geocoder`].
#[derive(Clone)]
pub struct OsmGeocoder {
    pub geocoder_url: String,
    pub router_url: String,
    pub inner_client: reqwest::Client,
}

impl Default for OsmGeocoder {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            router_url: DEFAULT_ROUTER_URL.to_string(),
            inner_client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

#[derive(Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    distance: f64,
    duration: f64,
}

impl OsmGeocoder {
    async fn search(&self, address: &str) -> Result<Coordinates, GeoError> {
        let response = self
            .inner_client
            .get(format!("{}/search", self.geocoder_url))
            .query(&[("format", "json"), ("limit", "1"), ("q", address)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GeoError::Status(response.status()));
        }

        let places: Vec<Place> = response.json().await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::NotFound(address.to_string()))?;
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| GeoError::Malformed(format!("coordinate {value:?}")))
        };
        Ok(Coordinates {
            lat: parse(&place.lat)?,
            lon: parse(&place.lon)?,
        })
    }

    async fn plan(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<RouteResult, GeoError> {
        // OSRM takes lon,lat pairs
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.router_url,
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        );
        let response = self
            .inner_client
            .get(url)
            .query(&[("overview", "false")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GeoError::Status(response.status()));
        }

        let body: RouteResponse = response.json().await?;
        if body.code != "Ok" {
            return Err(GeoError::NoRoute);
        }
        let route = body.routes.into_iter().next().ok_or(GeoError::NoRoute)?;
        Ok(RouteResult {
            distance_meters: route.distance,
            duration_seconds: route.duration,
        })
    }
}

impl Geocoder for OsmGeocoder {
    fn geocode<'a>(
        &'a self,
        address: &'a str,
    ) -> LocalBoxFuture<'a, Result<Coordinates, GeoError>> {
        tracing::debug!(address, "geocoding");
        self.search(address).boxed_local()
    }

    fn route<'a>(
        &'a self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> LocalBoxFuture<'a, Result<RouteResult, GeoError>> {
        self.plan(origin, destination).boxed_local()
    }
}
