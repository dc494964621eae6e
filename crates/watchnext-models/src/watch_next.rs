use serde::{Deserialize, Serialize};

/// Why a program sits in the watch next row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WatchNextType {
    /// Partially watched, resumable from a playback position
    Continue,
    /// Next episode or movie in a series
    Next,
    /// New content the user has not started yet
    New,
    /// Explicitly added by the user
    Watchlist,
}

impl std::fmt::Display for WatchNextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WatchNextType::Continue => "continue",
            WatchNextType::Next => "next",
            WatchNextType::New => "new",
            WatchNextType::Watchlist => "watchlist",
        };
        write!(f, "{}", name)
    }
}
