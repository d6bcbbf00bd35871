//! Seed data for the mock backend.
//!
//! Records are stored as raw JSON in the shapes the real backend emits
//! (`_id` keys, populated and bare favorite references) so client-side
//! normalization gets exercised.

use payloads::{User, UserId, normalize};
use serde_json::{Value, json};

pub const ALICE_EMAIL: &str = "alice@example.com";
pub const ALICE_PASSWORD: &str = "password123";
pub const ALICE_TOKEN: &str = "token-alice";

pub const GOLEM_ADDRESS: &str = "Calle de Martín de los Heros 14, Madrid";
pub const DORE_ADDRESS: &str = "Calle de Santa Isabel 3, Madrid";

pub struct Account {
    pub user: User,
    pub password: String,
    pub token: String,
}

pub struct Store {
    pub movies: Vec<Value>,
    pub cinemas: Vec<Value>,
    pub reviews: Vec<Value>,
    pub favorites: Vec<Value>,
    pub accounts: Vec<Account>,
    next_id: u32,
}

impl Store {
    pub fn seeded() -> Self {
        let movies = vec![
            json!({
                "_id": "m1",
                "title": "Tesis",
                "genres": ["Thriller", "Drama"],
                "director": "Alejandro Amenábar",
                "durationMinutes": 125,
                "rating": 7.4,
                "releaseDate": "1996-04-12",
            }),
            json!({
                "_id": "m2",
                "title": "Abre los ojos",
                "genres": ["Ciencia ficción", "Drama"],
                "director": "Alejandro Amenábar",
                "durationMinutes": 119,
                "rating": 7.7,
                "releaseDate": "1997-12-19",
            }),
            json!({
                "_id": "m3",
                "title": "El laberinto del fauno",
                "genres": ["Fantasía"],
                "director": "Guillermo del Toro",
                "durationMinutes": 118,
                "rating": 8.2,
            }),
            json!({
                "_id": "m4",
                "title": "Mar adentro",
                "genres": ["Drama"],
                "durationMinutes": 125,
            }),
        ];

        let cinemas = vec![
            json!({
                "_id": "c1",
                "name": "Cines Golem",
                "address": "Calle de Martín de los Heros 14",
                "city": "Madrid",
                "screens": 5,
                "location": {"lat": 40.4244, "lon": -3.7138},
            }),
            json!({
                "_id": "c2",
                "name": "Cine Doré",
                "address": "Calle de Santa Isabel 3",
                "city": "Madrid",
                "screens": 2,
            }),
        ];

        let reviews = vec![json!({
            "_id": "r1",
            "movie": "m1",
            "author": "alice",
            "rating": 5,
            "comment": "Inquietante de principio a fin",
            "createdAt": "2024-03-01T18:30:00Z",
        })];

        let favorites = vec![json!({
            "_id": "fav1",
            "user": "u1",
            "movie": {"_id": "m1", "title": "Tesis"},
        })];

        let accounts = vec![Account {
            user: User {
                id: UserId("u1".into()),
                username: "alice".into(),
                email: ALICE_EMAIL.into(),
                role: Some("user".into()),
            },
            password: ALICE_PASSWORD.into(),
            token: ALICE_TOKEN.into(),
        }];

        Self {
            movies,
            cinemas,
            reviews,
            favorites,
            accounts,
            next_id: 100,
        }
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    pub fn movie(&self, id: &str) -> Option<&Value> {
        find_by_id(&self.movies, id)
    }

    pub fn cinema(&self, id: &str) -> Option<&Value> {
        find_by_id(&self.cinemas, id)
    }

    pub fn account_by_token(&self, token: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.token == token)
    }

    pub fn favorites_of(&self, user_id: &UserId) -> Vec<Value> {
        self.favorites
            .iter()
            .filter(|f| f.get("user").and_then(Value::as_str) == Some(user_id.0.as_str()))
            .cloned()
            .collect()
    }
}

fn find_by_id<'a>(records: &'a [Value], id: &str) -> Option<&'a Value> {
    records
        .iter()
        .find(|r| normalize::entity_id(r).as_deref() == Some(id))
}

/// Coordinates the mock location provider knows about.
pub fn known_address(address: &str) -> Option<(f64, f64)> {
    match address {
        GOLEM_ADDRESS => Some((40.4244, -3.7138)),
        DORE_ADDRESS => Some((40.4119, -3.6989)),
        _ => None,
    }
}
