// Building blocks shared by the FAT16 decoder

pub mod constants;
pub mod directory;

pub use constants::*;
pub use directory::{attributes, pad_short_name, sanitize_name, FatAttributes};
