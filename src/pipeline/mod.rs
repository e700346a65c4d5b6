//! The file-driven pipeline: filename ordering, the priming/streaming
//! driver, and the bview access-time sweep.

pub mod access_time;
pub mod driver;
pub mod filenames;

pub use driver::Driver;
pub use filenames::sort_ris_filenames;
