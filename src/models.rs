use serde::{Deserialize, Serialize};

// Artist used for every padding entry
pub const PLACEHOLDER_ARTIST: &str = "Unknown Artist";

// Incoming request body
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct GenreRequest {
    pub genre: String,
}

/// One parsed song suggestion.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SongEntry {
    pub title: String,
    pub artist: String,
}

impl SongEntry {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Synthetic entry used to pad a short playlist up to the requested size.
    /// `index` is 1-based.
    pub fn placeholder(genre: &str, index: usize) -> Self {
        let genre = genre.trim();
        let title = if genre.is_empty() {
            format!("Unknown Song #{}", index)
        } else {
            format!("Unknown {} Song #{}", genre, index)
        };
        Self::new(title, PLACEHOLDER_ARTIST)
    }

    pub fn is_placeholder(&self) -> bool {
        self.artist.eq_ignore_ascii_case(PLACEHOLDER_ARTIST)
    }
}

// Outgoing response body
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct PlaylistResponse {
    pub genre: String,
    pub playlist: Vec<SongEntry>,
}
