use payloads::APIClient;
use payloads::geo::{DEFAULT_GEOCODER_URL, DEFAULT_ROUTER_URL, Geocoder, OsmGeocoder};
use std::rc::Rc;
use yew::prelude::*;
use yewdux::prelude::*;

pub mod hooks;
mod logs;
pub mod session;
mod state;

pub use state::{FetchState, State};

use hooks::{use_favorites, use_movies};
use session::{SessionProvider, use_session};

// Global API client - configurable via environment or same-origin fallback
pub fn get_api_client() -> APIClient {
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .or_else(|| web_sys::window()?.location().origin().ok())
        .unwrap_or_default();

    APIClient::new(address)
}

/// API client carrying the current session's token.
#[hook]
pub fn use_api_client() -> APIClient {
    let session = use_session();
    get_api_client().with_token(session.token())
}

pub fn get_geocoder() -> OsmGeocoder {
    OsmGeocoder {
        geocoder_url: option_env!("GEOCODER_URL")
            .unwrap_or(DEFAULT_GEOCODER_URL)
            .to_string(),
        router_url: option_env!("ROUTER_URL")
            .unwrap_or(DEFAULT_ROUTER_URL)
            .to_string(),
        ..OsmGeocoder::default()
    }
}

/// Location capability handed to the view tree.
#[derive(Clone)]
pub struct GeocoderContext(pub Rc<dyn Geocoder>);

impl PartialEq for GeocoderContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[hook]
pub fn use_geocoder() -> GeocoderContext {
    use_context::<GeocoderContext>()
        .unwrap_or_else(|| GeocoderContext(Rc::new(get_geocoder())))
}

#[function_component]
pub fn App() -> Html {
    use_memo((), |_| logs::init_logging());
    let geocoder = use_memo((), |_| GeocoderContext(Rc::new(get_geocoder())));

    html! {
        <SessionProvider>
            <ContextProvider<GeocoderContext> context={(*geocoder).clone()}>
                <div class="min-h-screen bg-white dark:bg-gray-900 text-gray-900 dark:text-gray-100 transition-colors">
                    <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                        <h1 class="text-2xl font-bold mb-4">{"LA PREMIERE"}</h1>
                        <MovieList />
                    </main>
                </div>
            </ContextProvider<GeocoderContext>>
        </SessionProvider>
    }
}

#[function_component]
fn MovieList() -> Html {
    let movies = use_movies();
    // loads the session's favorites into the store
    let favorites = use_favorites();
    let (state, _) = use_store::<State>();

    movies.render("películas", |movies, loading, error| html! {
        <>
            if loading {
                <p class="text-sm text-neutral-500">{"Actualizando..."}</p>
            }
            if let Some(error) = error.or(favorites.error.as_ref()) {
                <p class="text-sm text-red-700 dark:text-red-400">{error}</p>
            }
            <ul class="space-y-2">
                {for movies.iter().map(|movie| html! {
                    <li key={movie.id.to_string()}>
                        {&movie.title}
                        if state.is_favorite(&movie.id) {
                            {" ♥"}
                        }
                    </li>
                })}
            </ul>
        </>
    })
}
