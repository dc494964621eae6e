pub mod category;
pub mod movie;
pub mod movie_program_id;
pub mod watch_next;

pub use category::{Category, WATCHLIST_CATEGORY_ID};
pub use movie::{AspectRatio, Movie, RatingStyle};
pub use movie_program_id::{MovieProgramId, WatchNextUpdate};
pub use watch_next::WatchNextType;

/// Identifier assigned by the provider to a channel row.
pub type ChannelId = u64;
/// Identifier assigned by the provider to a preview or watch-next program row.
pub type ProgramId = u64;
/// Local identifier of a movie.
pub type MovieId = u64;
