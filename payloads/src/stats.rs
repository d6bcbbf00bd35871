use crate::Movie;
use std::collections::BTreeMap;

/// Aggregate figures for the statistics dashboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieStats {
    pub total: usize,
    /// Mean of the movies that have a rating.
    pub average_rating: Option<f32>,
    /// Movie count per genre. A movie counts once for each of its genres.
    pub by_genre: BTreeMap<String, usize>,
    pub longest: Option<(String, u32)>,
}

pub fn movie_stats(movies: &[Movie]) -> MovieStats {
    let ratings: Vec<f32> = movies.iter().filter_map(|m| m.rating).collect();
    let average_rating = (!ratings.is_empty())
        .then(|| ratings.iter().sum::<f32>() / ratings.len() as f32);

    let mut by_genre = BTreeMap::new();
    for genre in movies.iter().flat_map(|m| &m.genres) {
        *by_genre.entry(genre.clone()).or_insert(0) += 1;
    }

    let longest = movies
        .iter()
        .filter_map(|m| m.duration_minutes.map(|d| (m.title.clone(), d)))
        .max_by_key(|(_, d)| *d);

    MovieStats {
        total: movies.len(),
        average_rating,
        by_genre,
        longest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MovieId;

    fn movie(id: &str, genres: &[&str], rating: Option<f32>, minutes: Option<u32>) -> Movie {
        Movie {
            id: MovieId::from(id),
            title: format!("Película {id}"),
            synopsis: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            director: None,
            duration_minutes: minutes,
            rating,
            release_date: None,
            poster_url: None,
        }
    }

    #[test]
    fn empty_catalog() {
        assert_eq!(movie_stats(&[]), MovieStats::default());
    }

    #[test]
    fn aggregates() {
        let movies = [
            movie("a", &["Drama", "Comedia"], Some(8.0), Some(120)),
            movie("b", &["Drama"], None, Some(95)),
            movie("c", &["Terror"], Some(6.0), None),
        ];
        let stats = movie_stats(&movies);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.average_rating, Some(7.0));
        assert_eq!(stats.by_genre.get("Drama"), Some(&2));
        assert_eq!(stats.by_genre.get("Comedia"), Some(&1));
        assert_eq!(stats.by_genre.get("Terror"), Some(&1));
        assert_eq!(stats.longest, Some(("Película a".to_string(), 120)));
    }
}
