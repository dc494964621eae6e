use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use crate::MovieId;

/// Aspect ratios understood by the provider for poster art and video.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Ratio16x9,
    Ratio3x2,
    Ratio4x3,
    Ratio1x1,
    Ratio2x3,
    MoviePoster,
}

/// How the review rating string of a movie should be interpreted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RatingStyle {
    #[default]
    Stars,
    ThumbsUpDown,
    Percentage,
}

/// A movie with everything needed to publish it as a program.
///
/// Two movies are equal when their `movie_id` matches; the remaining fields are
/// descriptive and may drift between catalog versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    pub description: String,
    /// Duration in milliseconds
    pub duration: u64,
    pub preview_video_url: String,
    pub video_url: String,
    pub poster_art_aspect_ratio: AspectRatio,
    pub aspect_ratio: AspectRatio,
    pub thumbnail_url: String,
    pub card_image_url: String,
    /// Flattened content rating, e.g. `com.android.tv/US_TV/US_TV_PG`
    pub content_rating: String,
    pub genre: String,
    pub is_live: bool,
    pub release_date: String,
    pub rating: String,
    pub rating_style: RatingStyle,
    pub starting_price: String,
    pub offer_price: String,
    pub width: u32,
    pub height: u32,
    pub weight: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_movie_id_in_series: Option<MovieId>,
}

impl Movie {
    /// Create a movie with the given id and title and empty metadata
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            description: String::new(),
            duration: 0,
            preview_video_url: String::new(),
            video_url: String::new(),
            poster_art_aspect_ratio: AspectRatio::default(),
            aspect_ratio: AspectRatio::default(),
            thumbnail_url: String::new(),
            card_image_url: String::new(),
            content_rating: String::new(),
            genre: String::new(),
            is_live: false,
            release_date: String::new(),
            rating: String::new(),
            rating_style: RatingStyle::default(),
            starting_price: String::new(),
            offer_price: String::new(),
            width: 0,
            height: 0,
            weight: 0,
            next_movie_id_in_series: None,
        }
    }

    pub fn with_next_in_series(mut self, next: MovieId) -> Self {
        self.next_movie_id_in_series = Some(next);
        self
    }

    /// The movie id as stored in a provider row's internal provider id column
    pub fn internal_provider_id(&self) -> String {
        self.movie_id.to_string()
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.movie_id == other.movie_id
    }
}

impl Eq for Movie {}

impl Hash for Movie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.movie_id.hash(state);
    }
}
