pub mod actions;
pub mod catalog;
pub mod database;
pub mod diff;
pub mod store;
pub mod sync;
pub mod watchlist;

pub use actions::{ProviderEvent, WatchNextActions};
pub use database::CatalogDatabase;
pub use store::LocalStore;
pub use sync::{ChannelSynchronizer, SyncResult};
pub use watchlist::WatchlistManager;
