use actix_web::http::StatusCode;
use actix_web::{
    HttpRequest, HttpResponse, ResponseError, delete, dev::HttpServiceFactory,
    get, post, web,
};
use payloads::{Envelope, MovieId, User, normalize, requests, responses};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Mutex;

use crate::mock::{self, Store};

type SharedStore = web::Data<Mutex<Store>>;

pub fn api_services() -> impl HttpServiceFactory {
    web::scope("/api")
        .service(health_check)
        .service(login)
        .service(list_movies)
        // registered before the `{id}` route so it is matched first
        .service(search_movies)
        .service(get_movie)
        .service(list_reviews)
        .service(create_review)
        .service(list_cinemas)
        .service(get_cinema)
        .service(list_favorites)
        .service(add_favorite)
        .service(remove_favorite)
}

pub fn geo_services() -> impl HttpServiceFactory {
    (geocode, route)
}

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("No autorizado")]
    Unauthorized,
    #[error("Credenciales inválidas")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(&'static str),
}

impl ResponseError for MockError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(Envelope::<()>::failure(self.to_string()))
    }
}

fn ok(data: impl serde::Serialize) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::ok(data))
}

fn done() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true }))
}

fn authenticated(req: &HttpRequest, store: &Store) -> Result<User, MockError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(MockError::Unauthorized)?;
    store
        .account_by_token(token)
        .map(|account| account.user.clone())
        .ok_or(MockError::Unauthorized)
}

fn lock(store: &SharedStore) -> std::sync::MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[get("/health_check")]
async fn health_check() -> HttpResponse {
    done()
}

#[post("/auth/login")]
async fn login(
    credentials: web::Json<requests::LoginCredentials>,
    store: SharedStore,
) -> Result<HttpResponse, MockError> {
    let store = lock(&store);
    let account = store
        .accounts
        .iter()
        .find(|a| {
            a.user.email == credentials.email
                && a.password == credentials.password
        })
        .ok_or(MockError::InvalidCredentials)?;
    Ok(ok(responses::LoginResponse {
        token: account.token.clone(),
        user: account.user.clone(),
    }))
}

#[get("/movies")]
async fn list_movies(store: SharedStore) -> HttpResponse {
    ok(&lock(&store).movies)
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

#[get("/movies/search")]
async fn search_movies(
    query: web::Query<SearchQuery>,
    store: SharedStore,
) -> HttpResponse {
    let needle = query.q.to_lowercase();
    let store = lock(&store);
    let found: Vec<&Value> = store
        .movies
        .iter()
        .filter(|m| {
            normalize::movie_title(m)
                .is_some_and(|t| t.to_lowercase().contains(&needle))
        })
        .collect();
    ok(found)
}

#[get("/movies/{id}")]
async fn get_movie(
    id: web::Path<String>,
    store: SharedStore,
) -> Result<HttpResponse, MockError> {
    // a failure without an error envelope
    if id.as_str() == "boom" {
        return Ok(HttpResponse::InternalServerError().body("upstream exploded"));
    }
    let store = lock(&store);
    let movie = store
        .movie(&id)
        .ok_or(MockError::NotFound("Película no encontrada"))?;
    Ok(ok(movie))
}

#[get("/movies/{id}/reviews")]
async fn list_reviews(
    id: web::Path<String>,
    store: SharedStore,
) -> Result<HttpResponse, MockError> {
    let store = lock(&store);
    store
        .movie(&id)
        .ok_or(MockError::NotFound("Película no encontrada"))?;
    let reviews: Vec<&Value> = store
        .reviews
        .iter()
        .filter(|r| r.get("movie").and_then(Value::as_str) == Some(id.as_str()))
        .collect();
    Ok(ok(reviews))
}

#[post("/reviews")]
async fn create_review(
    req: HttpRequest,
    details: web::Json<requests::CreateReview>,
    store: SharedStore,
) -> Result<HttpResponse, MockError> {
    let mut store = lock(&store);
    let user = authenticated(&req, &store)?;
    if let Some(message) = requests::validate_review(&details).error_message()
    {
        return Err(MockError::BadRequest(message));
    }
    store
        .movie(&details.movie_id.0)
        .ok_or(MockError::NotFound("Película no encontrada"))?;

    let review = json!({
        "_id": store.next_id("r"),
        "movie": details.movie_id,
        "author": user.username,
        "rating": details.rating,
        "comment": details.comment.trim(),
        "createdAt": jiff::Timestamp::now(),
    });
    store.reviews.push(review.clone());
    Ok(ok(review))
}

#[get("/cinemas")]
async fn list_cinemas(store: SharedStore) -> HttpResponse {
    ok(&lock(&store).cinemas)
}

#[get("/cinemas/{id}")]
async fn get_cinema(
    id: web::Path<String>,
    store: SharedStore,
) -> Result<HttpResponse, MockError> {
    let store = lock(&store);
    let cinema = store
        .cinema(&id)
        .ok_or(MockError::NotFound("Cine no encontrado"))?;
    Ok(ok(cinema))
}

#[get("/favorites")]
async fn list_favorites(
    req: HttpRequest,
    store: SharedStore,
) -> Result<HttpResponse, MockError> {
    let store = lock(&store);
    let user = authenticated(&req, &store)?;
    Ok(ok(store.favorites_of(&user.id)))
}

#[post("/favorites")]
async fn add_favorite(
    req: HttpRequest,
    details: web::Json<requests::AddFavorite>,
    store: SharedStore,
) -> Result<HttpResponse, MockError> {
    let mut store = lock(&store);
    let user = authenticated(&req, &store)?;
    store
        .movie(&details.movie_id.0)
        .ok_or(MockError::NotFound("Película no encontrada"))?;
    let already = store
        .favorites_of(&user.id)
        .iter()
        .any(|f| normalize::favorite_movie_id(f).as_ref() == Some(&details.movie_id));
    if already {
        return Err(MockError::BadRequest("La película ya está en favoritos"));
    }

    let favorite = json!({
        "_id": store.next_id("fav"),
        "user": user.id,
        "movieId": details.movie_id,
    });
    store.favorites.push(favorite);
    Ok(done())
}

#[delete("/favorites/{movie_id}")]
async fn remove_favorite(
    req: HttpRequest,
    movie_id: web::Path<String>,
    store: SharedStore,
) -> Result<HttpResponse, MockError> {
    let mut store = lock(&store);
    let user = authenticated(&req, &store)?;
    let movie_id = MovieId(movie_id.into_inner());
    let before = store.favorites.len();
    store.favorites.retain(|f| {
        f.get("user").and_then(Value::as_str) != Some(user.id.0.as_str())
            || normalize::favorite_movie_id(f).as_ref() != Some(&movie_id)
    });
    if store.favorites.len() == before {
        return Err(MockError::NotFound("La película no está en favoritos"));
    }
    Ok(done())
}

#[derive(Deserialize)]
struct PlaceQuery {
    q: String,
}

/// Nominatim-style search: coordinates are strings.
#[get("/search")]
async fn geocode(query: web::Query<PlaceQuery>) -> HttpResponse {
    let places: Vec<Value> = mock::known_address(&query.q)
        .map(|(lat, lon)| json!({ "lat": lat.to_string(), "lon": lon.to_string() }))
        .into_iter()
        .collect();
    HttpResponse::Ok().json(places)
}

/// OSRM-style routing over `lon,lat;lon,lat`.
#[get("/route/v1/driving/{coordinates}")]
async fn route(coordinates: web::Path<String>) -> HttpResponse {
    let points: Option<Vec<(f64, f64)>> = coordinates
        .split(';')
        .map(|pair| {
            let (lon, lat) = pair.split_once(',')?;
            Some((lat.parse().ok()?, lon.parse().ok()?))
        })
        .collect();

    match points.as_deref() {
        Some([origin, destination]) if origin != destination => {
            let distance = haversine_meters(*origin, *destination);
            HttpResponse::Ok().json(json!({
                "code": "Ok",
                "routes": [{ "distance": distance, "duration": distance / 8.0 }],
            }))
        }
        Some([_, _]) => HttpResponse::Ok()
            .json(json!({ "code": "NoRoute", "routes": [] })),
        _ => HttpResponse::BadRequest()
            .json(json!({ "code": "InvalidQuery", "routes": [] })),
    }
}

fn haversine_meters(a: (f64, f64), b: (f64, f64)) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
