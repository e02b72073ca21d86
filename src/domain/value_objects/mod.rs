pub mod ticker;
pub mod volume;

pub use ticker::Ticker;
pub use volume::Volume;
