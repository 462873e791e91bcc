//! Identified-movie records and the history entries that wrap them.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the footage behind an identification came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Camera,
    Screen,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Camera => "camera",
            Source::Screen => "screen",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub id: String,
    pub title: String,
    pub poster_url: String,
    pub year: u16,
    pub director: String,
    pub genre: String,
    pub description: String,
    pub trailer_url: String,
    pub imdb_rating: f32,
    pub duration: String,
    pub identified_at: DateTime<Utc>,
    pub source: Source,
}

impl VideoResult {
    pub fn directors(&self) -> Vec<&str> {
        split_list(&self.director)
    }

    pub fn genres(&self) -> Vec<&str> {
        split_list(&self.genre)
    }

    /// Encodes the result for a route parameter.
    pub fn to_route_param(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to encode video result")
    }

    /// Decodes a route parameter produced by [`VideoResult::to_route_param`].
    /// Any missing or mistyped field is an error.
    pub fn from_route_param(param: &str) -> Result<Self> {
        serde_json::from_str(param).context("malformed video result route parameter")
    }
}

fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub video_result: VideoResult,
    pub timestamp: DateTime<Utc>,
}

/// A catalog movie before it has been matched against any footage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub poster_url: &'static str,
    pub year: u16,
    pub director: &'static str,
    pub genre: &'static str,
    pub description: &'static str,
    pub trailer_url: &'static str,
    pub imdb_rating: f32,
    pub duration: &'static str,
}

impl CatalogEntry {
    pub fn stamp(&self, source: Source, identified_at: DateTime<Utc>) -> VideoResult {
        VideoResult {
            id: self.id.to_string(),
            title: self.title.to_string(),
            poster_url: self.poster_url.to_string(),
            year: self.year,
            director: self.director.to_string(),
            genre: self.genre.to_string(),
            description: self.description.to_string(),
            trailer_url: self.trailer_url.to_string(),
            imdb_rating: self.imdb_rating,
            duration: self.duration.to_string(),
            identified_at,
            source,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_result(id: &str, title: &str) -> VideoResult {
    VideoResult {
        id: id.to_string(),
        title: title.to_string(),
        poster_url: format!("https://image.example/{id}.jpg"),
        year: 1999,
        director: "Lana Wachowski, Lilly Wachowski".to_string(),
        genre: "Sci-Fi, Action".to_string(),
        description: "A test movie.".to_string(),
        trailer_url: format!("https://video.example/{id}"),
        imdb_rating: 8.7,
        duration: "2h 16m".to_string(),
        identified_at: Utc::now(),
        source: Source::Camera,
    }
}
