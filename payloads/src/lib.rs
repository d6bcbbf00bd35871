pub mod api_client;
pub mod geo;
pub mod normalize;
pub mod requests;
pub mod responses;
pub mod stats;

pub use api_client::{APIClient, ClientError};
pub use responses::{Cinema, Envelope, Movie, Review, User};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Id type wrappers help ensure we don't mix up ids for different
/// collections. The backend issues opaque string ids.
#[derive(
    Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(pub String);

#[derive(
    Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CinemaId(pub String);

#[derive(
    Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ReviewId(pub String);

#[derive(
    Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for CinemaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
