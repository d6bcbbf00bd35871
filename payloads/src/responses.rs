use crate::{CinemaId, MovieId, ReviewId, UserId, geo::Coordinates};
use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// The `{ success, data }` wrapper every backend response uses.
///
/// Failures arrive as `{ success: false, message }` with no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(alias = "_id")]
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Average audience rating on a 0-10 scale.
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub release_date: Option<Date>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cinema {
    #[serde(alias = "_id")]
    pub id: CinemaId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub screens: Option<u32>,
    /// Present when the backend has already geocoded the address.
    #[serde(default)]
    pub location: Option<Coordinates>,
}

impl Cinema {
    /// Address line suitable for a geocoding query.
    pub fn full_address(&self) -> String {
        match &self.city {
            Some(city) => format!("{}, {}", self.address, city),
            None => self.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(alias = "_id")]
    pub id: ReviewId,
    #[serde(alias = "movie")]
    pub movie_id: MovieId,
    /// Display name of the author, if the backend populated it.
    #[serde(default)]
    pub author: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn movie_accepts_mongo_id() {
        let movie: Movie = serde_json::from_value(json!({
            "_id": "m1",
            "title": "Amanece, que no es poco",
            "genres": ["Comedia"],
            "durationMinutes": 110,
            "releaseDate": "1989-01-20",
        }))
        .unwrap();

        assert_eq!(movie.id, MovieId::from("m1"));
        assert_eq!(movie.duration_minutes, Some(110));
        assert_eq!(movie.release_date, Some(jiff::civil::date(1989, 1, 20)));
        assert_eq!(movie.rating, None);
    }

    #[test]
    fn failure_envelope_has_no_data() {
        let envelope: Envelope<Movie> = serde_json::from_value(json!({
            "success": false,
            "message": "Película no encontrada",
        }))
        .unwrap();

        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Película no encontrada"));
    }

    #[test]
    fn cinema_address_includes_city() {
        let cinema = Cinema {
            id: CinemaId::from("c1"),
            name: "Cines Golem".into(),
            address: "Calle de Martín de los Heros 14".into(),
            city: Some("Madrid".into()),
            screens: Some(4),
            location: None,
        };
        assert_eq!(
            cinema.full_address(),
            "Calle de Martín de los Heros 14, Madrid"
        );
    }
}
