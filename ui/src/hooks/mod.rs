pub mod use_api;
pub mod use_cinemas;
pub mod use_favorites;
pub mod use_login;
pub mod use_logout;
pub mod use_movies;

pub use use_api::{ApiHookReturn, use_action, use_api, use_resource};
pub use use_cinemas::{use_cinema_location, use_cinemas, use_route};
pub use use_favorites::{FavoriteToggle, use_favorite_toggle, use_favorites};
pub use use_login::{LoginHookReturn, use_login};
pub use use_logout::use_logout;
pub use use_movies::{use_movie, use_movies, use_reviews};
