// Read-only FAT16 image inspection

pub mod fat16;
pub mod fat_common;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use fat16::{
    find_file, list_tree, read_volume_label, BootSectorGeometry, DirectoryEntry, DirectoryWalker,
    Fat16Session, FatTable, FsLayout, VolumeLabel, WalkItem,
};
pub use fat_common::sanitize_name;
