use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use watchnext_models::{AspectRatio, ChannelId, Movie, ProgramId, RatingStyle, WatchNextType};
use crate::links::AppLinks;

/// A stored row together with the id the provider assigned to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row<T> {
    pub id: u64,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChannelType {
    Preview,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProgramType {
    Movie,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelRow {
    pub display_name: String,
    pub description: String,
    pub channel_type: ChannelType,
    pub input_id: String,
    pub app_link_intent_uri: String,
    /// Category id of the channel
    pub internal_provider_id: Option<String>,
    #[serde(default)]
    pub browsable: bool,
}

/// Columns shared by preview programs and watch next programs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramContent {
    pub title: String,
    pub description: String,
    pub duration_millis: u64,
    pub program_type: ProgramType,
    pub intent_uri: String,
    /// Movie id of the program
    pub internal_provider_id: Option<String>,
    pub content_id: String,
    pub preview_video_uri: String,
    pub poster_art_uri: String,
    pub poster_art_aspect_ratio: AspectRatio,
    pub content_ratings: Vec<String>,
    pub genre: String,
    pub live: bool,
    pub release_date: String,
    pub review_rating: String,
    pub review_rating_style: RatingStyle,
    pub starting_price: String,
    pub offer_price: String,
    pub video_width: u32,
    pub video_height: u32,
}

impl ProgramContent {
    /// Fill every program column from a movie
    pub fn from_movie(movie: &Movie, links: &AppLinks) -> Self {
        let movie_id = movie.internal_provider_id();
        Self {
            title: movie.title.clone(),
            description: movie.description.clone(),
            duration_millis: movie.duration,
            program_type: ProgramType::Movie,
            intent_uri: links.play_video_uri(movie.movie_id),
            internal_provider_id: Some(movie_id.clone()),
            content_id: movie_id,
            preview_video_uri: movie.preview_video_url.clone(),
            poster_art_uri: movie.thumbnail_url.clone(),
            poster_art_aspect_ratio: movie.poster_art_aspect_ratio,
            content_ratings: if movie.content_rating.is_empty() {
                Vec::new()
            } else {
                vec![movie.content_rating.clone()]
            },
            genre: movie.genre.clone(),
            live: movie.is_live,
            release_date: movie.release_date.clone(),
            review_rating: movie.rating.clone(),
            review_rating_style: movie.rating_style,
            starting_price: movie.starting_price.clone(),
            offer_price: movie.offer_price.clone(),
            video_width: movie.width,
            video_height: movie.height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewProgramRow {
    pub channel_id: ChannelId,
    /// Higher weights are shown first within a channel
    pub weight: i32,
    #[serde(flatten)]
    pub content: ProgramContent,
    #[serde(default = "default_browsable")]
    pub browsable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchNextProgramRow {
    #[serde(flatten)]
    pub content: ProgramContent,
    pub watch_next_type: WatchNextType,
    pub last_engagement_time_utc_millis: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_playback_position_millis: Option<u64>,
    #[serde(default = "default_browsable")]
    pub browsable: bool,
}

impl WatchNextProgramRow {
    /// Watch next copy of a channel program, as the home screen makes it
    pub fn from_preview(program: &PreviewProgramRow, watch_next_type: WatchNextType) -> Self {
        Self {
            content: program.content.clone(),
            watch_next_type,
            last_engagement_time_utc_millis: Utc::now().timestamp_millis(),
            last_playback_position_millis: None,
            browsable: true,
        }
    }
}

fn default_browsable() -> bool {
    true
}

/// What the reconciliation needs to know about a published program: the movie
/// id it was published for, the id assigned by the provider and its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramMetadata {
    pub id: String,
    pub program_id: ProgramId,
    pub title: String,
}

impl ProgramMetadata {
    /// The movie id, when the internal id is numeric
    pub fn movie_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

/// Two-way lookup between published channel ids and category ids
#[derive(Debug, Clone, Default)]
pub struct ChannelCategoryIds {
    by_channel: BTreeMap<ChannelId, String>,
    by_category: HashMap<String, ChannelId>,
}

impl ChannelCategoryIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, channel_id: ChannelId, category_id: String) {
        if let Some(previous) = self.by_category.insert(category_id.clone(), channel_id) {
            if previous != channel_id {
                self.by_channel.remove(&previous);
            }
        }
        if let Some(previous) = self.by_channel.insert(channel_id, category_id.clone()) {
            if previous != category_id {
                self.by_category.remove(&previous);
            }
        }
    }

    pub fn remove_channel(&mut self, channel_id: ChannelId) -> Option<String> {
        let category_id = self.by_channel.remove(&channel_id)?;
        self.by_category.remove(&category_id);
        Some(category_id)
    }

    pub fn category_for_channel(&self, channel_id: ChannelId) -> Option<&str> {
        self.by_channel.get(&channel_id).map(String::as_str)
    }

    pub fn channel_for_category(&self, category_id: &str) -> Option<ChannelId> {
        self.by_category.get(category_id).copied()
    }

    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.by_channel.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChannelId, &str)> {
        self.by_channel.iter().map(|(id, category)| (*id, category.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_channel.is_empty()
    }
}
