use payloads::MovieId;
use std::collections::BTreeSet;
use yewdux::prelude::*;

/// Distinguishes "not fetched yet" from "fetched but empty".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    NotFetched,
    Fetched(T),
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Fetched(value) => Some(value),
            Self::NotFetched => None,
        }
    }
}

#[derive(Default, Clone, PartialEq, Store)]
pub struct State {
    // === Favorites (managed by use_favorites + use_favorite_toggle) ===
    pub favorites: FetchState<BTreeSet<MovieId>>,
}

impl State {
    pub fn is_favorite(&self, movie_id: &MovieId) -> bool {
        self.favorites
            .as_ref()
            .is_some_and(|favorites| favorites.contains(movie_id))
    }

    pub fn set_favorites(&mut self, favorites: BTreeSet<MovieId>) {
        self.favorites = FetchState::Fetched(favorites);
    }

    /// Mark a single movie. An unfetched set starts out empty.
    pub fn set_favorite(&mut self, movie_id: MovieId, favorite: bool) {
        if let FetchState::NotFetched = self.favorites {
            self.favorites = FetchState::Fetched(BTreeSet::new());
        }
        if let FetchState::Fetched(favorites) = &mut self.favorites {
            if favorite {
                favorites.insert(movie_id);
            } else {
                favorites.remove(&movie_id);
            }
        }
    }

    /// Flip one movie's membership and return the new value.
    pub fn toggle_favorite(&mut self, movie_id: MovieId) -> bool {
        let target = !self.is_favorite(&movie_id);
        self.set_favorite(movie_id, target);
        target
    }

    /// Undo a [`toggle_favorite`](Self::toggle_favorite) that returned
    /// `target`.
    pub fn revert_favorite(&mut self, movie_id: MovieId, target: bool) {
        self.set_favorite(movie_id, !target);
    }

    pub fn logout(&mut self) {
        self.favorites = FetchState::NotFetched;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorites_start_unfetched() {
        let state = State::default();
        assert!(!state.favorites.is_fetched());
        assert!(!state.is_favorite(&MovieId::from("m1")));
    }

    #[test]
    fn toggling_a_single_favorite() {
        let mut state = State::default();

        state.set_favorite(MovieId::from("m1"), true);
        assert!(state.favorites.is_fetched());
        assert!(state.is_favorite(&MovieId::from("m1")));

        state.set_favorite(MovieId::from("m1"), false);
        assert!(!state.is_favorite(&MovieId::from("m1")));
        assert_eq!(state.favorites, FetchState::Fetched(BTreeSet::new()));
    }

    #[test]
    fn toggle_flips_and_revert_restores() {
        let mut state = State::default();
        state.set_favorites([MovieId::from("m1")].into_iter().collect());

        let target = state.toggle_favorite(MovieId::from("m1"));
        assert!(!target);
        assert!(!state.is_favorite(&MovieId::from("m1")));

        state.revert_favorite(MovieId::from("m1"), target);
        assert!(state.is_favorite(&MovieId::from("m1")));

        let target = state.toggle_favorite(MovieId::from("m2"));
        assert!(target);
        state.revert_favorite(MovieId::from("m2"), target);
        assert!(!state.is_favorite(&MovieId::from("m2")));
        assert!(state.is_favorite(&MovieId::from("m1")));
    }

    #[test]
    fn logout_forgets_favorites() {
        let mut state = State::default();
        state.set_favorites([MovieId::from("m2")].into_iter().collect());

        state.logout();

        assert_eq!(state.favorites, FetchState::NotFetched);
    }
}
