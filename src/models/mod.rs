pub mod entry;
pub mod settings;
pub mod storage;
pub mod video;

pub use entry::*;
pub use settings::*;
pub use storage::*;
pub use video::*;
