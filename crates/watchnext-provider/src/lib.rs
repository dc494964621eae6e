pub mod traits;
pub mod error;
pub mod rows;
pub mod links;
pub mod tables;
pub mod memory;
pub mod file;
pub mod channels;
pub mod watch_next;

pub use traits::{ChannelProvider, WatchNextProvider};
pub use error::ProviderError;
pub use rows::{ChannelCategoryIds, ChannelRow, ChannelType, PreviewProgramRow, ProgramContent, ProgramMetadata, ProgramType, Row, WatchNextProgramRow};
pub use links::AppLinks;
pub use memory::MemoryProvider;
pub use file::FileProvider;
pub use channels::ChannelFacade;
pub use watch_next::WatchNextFacade;
