use serde::{Deserialize, Serialize};
use crate::{ChannelId, Movie, MovieId};

/// Id of the synthetic category holding the movies a user asked to watch later.
pub const WATCHLIST_CATEGORY_ID: &str = "3";

/// A group of movies published as one channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub movies: Vec<Movie>,
    /// Assigned by the provider once the category has been published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            movies: Vec::new(),
            channel_id: None,
        }
    }

    pub fn with_movies(mut self, movies: Vec<Movie>) -> Self {
        self.movies = movies;
        self
    }

    /// The empty watchlist category
    pub fn watchlist() -> Self {
        Self::new(WATCHLIST_CATEGORY_ID, "Watchlist", "Movies that you wish to watch.")
    }

    pub fn is_watchlist(&self) -> bool {
        self.id == WATCHLIST_CATEGORY_ID
    }

    pub fn contains_movie(&self, movie_id: MovieId) -> bool {
        self.movies.iter().any(|m| m.movie_id == movie_id)
    }

    pub fn find_movie(&self, movie_id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.movie_id == movie_id)
    }

    /// Remove a movie by id, returning whether anything was removed
    pub fn remove_movie(&mut self, movie_id: MovieId) -> bool {
        let before = self.movies.len();
        self.movies.retain(|m| m.movie_id != movie_id);
        self.movies.len() != before
    }
}
