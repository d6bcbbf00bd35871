use futures::FutureExt;
use futures::future::LocalBoxFuture;
use payloads::{APIClient, ClientError, MovieId};
use resource::{AsyncResource, display_message};
use std::collections::BTreeSet;
use yew::prelude::*;
use yewdux::prelude::*;

use super::{ApiHookReturn, use_action, use_api};
use crate::session::use_session;
use crate::{State, use_api_client};

/// Favorites of the client's user. Logged out, the set is empty and nothing
/// is requested.
async fn load_favorites(
    api_client: APIClient,
) -> Result<BTreeSet<MovieId>, ClientError> {
    match api_client.token {
        Some(_) => Ok(api_client.list_favorites().await?.into_iter().collect()),
        None => Ok(BTreeSet::new()),
    }
}

/// Copy a set the resource has applied into the global store.
fn mirror_favorites(
    dispatch: &Dispatch<State>,
    favorites: Option<&BTreeSet<MovieId>>,
) {
    if let Some(favorites) = favorites {
        dispatch.reduce_mut(|state| state.set_favorites(favorites.clone()));
    }
}

/// Load the current user's favorites into the global store.
///
/// Reloads whenever the session token changes.
#[hook]
pub fn use_favorites() -> ApiHookReturn<BTreeSet<MovieId>> {
    let session = use_session();
    let api_client = use_api_client();
    let (_, dispatch) = use_store::<State>();

    let favorites =
        use_api(session.token(), move || load_favorites(api_client.clone()));

    // Only results the resource applied reach the store.
    use_effect_with(favorites.data.clone(), move |data| {
        mirror_favorites(&dispatch, data.as_ref());
    });

    favorites
}

pub struct FavoriteToggle {
    pub is_favorite: bool,
    pub pending: bool,
    pub error: Option<String>,
    pub toggle: Callback<()>,
}

/// Persist the membership the store already holds.
async fn save_favorite(
    api_client: APIClient,
    movie_id: MovieId,
    favorite: bool,
) -> Result<bool, ClientError> {
    if favorite {
        api_client.add_favorite(&movie_id).await?;
    } else {
        api_client.remove_favorite(&movie_id).await?;
    }
    Ok(favorite)
}

/// Flip `movie_id` in the store and start `action` to persist it.
///
/// Returns `None`, leaving the store alone, while a previous toggle is
/// pending. The returned task puts the membership back if the request
/// fails.
fn start_toggle(
    dispatch: &Dispatch<State>,
    action: &AsyncResource<bool, ClientError>,
    movie_id: &MovieId,
) -> Option<LocalBoxFuture<'static, ()>> {
    if action.loading() {
        return None;
    }
    let target =
        dispatch.reduce_mut(|state| state.toggle_favorite(movie_id.clone()));
    let invocation = action.execute();

    let dispatch = dispatch.clone();
    let movie_id = movie_id.clone();
    Some(
        async move {
            if let Err(e) = invocation.await {
                tracing::warn!(%movie_id, "favorite not saved: {}", display_message(&e));
                dispatch.reduce_mut(|state| state.revert_favorite(movie_id, target));
            }
        }
        .boxed_local(),
    )
}

/// Add or remove one movie from the favorites.
///
/// The store is flipped before the request goes out and flipped back if it
/// fails, so the heart icon responds immediately. A click while a request
/// is pending is ignored.
#[hook]
pub fn use_favorite_toggle(movie_id: MovieId) -> FavoriteToggle {
    let (state, dispatch) = use_store::<State>();
    let api_client = use_api_client();

    let action = {
        let movie_id = movie_id.clone();
        let dispatch = dispatch.clone();
        use_action(move || {
            let favorite = dispatch.get().is_favorite(&movie_id);
            save_favorite(api_client.clone(), movie_id.clone(), favorite)
        })
    };

    let toggle = {
        let action = action.clone();
        let movie_id = movie_id.clone();
        Callback::from(move |_| {
            if let Some(task) = start_toggle(&dispatch, &action, &movie_id) {
                yew::platform::spawn_local(task);
            }
        })
    };

    FavoriteToggle {
        is_favorite: state.is_favorite(&movie_id),
        pending: action.loading(),
        error: action.error(),
        toggle,
    }
}
