use payloads::{Movie, MovieId, Review};
use yew::prelude::*;

use super::{ApiHookReturn, use_api};
use crate::use_api_client;

#[hook]
pub fn use_movies() -> ApiHookReturn<Vec<Movie>> {
    let api_client = use_api_client();
    use_api((), move || {
        let api_client = api_client.clone();
        async move { api_client.list_movies().await }
    })
}

#[hook]
pub fn use_movie(movie_id: MovieId) -> ApiHookReturn<Movie> {
    let api_client = use_api_client();
    use_api(movie_id.clone(), move || {
        let api_client = api_client.clone();
        let movie_id = movie_id.clone();
        async move { api_client.get_movie(&movie_id).await }
    })
}

#[hook]
pub fn use_reviews(movie_id: MovieId) -> ApiHookReturn<Vec<Review>> {
    let api_client = use_api_client();
    use_api(movie_id.clone(), move || {
        let api_client = api_client.clone();
        let movie_id = movie_id.clone();
        async move { api_client.list_reviews(&movie_id).await }
    })
}
