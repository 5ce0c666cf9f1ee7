pub mod device;
pub mod error;

pub use device::ImageReader;
pub use error::FatlensError;
