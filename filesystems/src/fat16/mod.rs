// FAT16 read-only decoder: boot sector, FAT, cluster chains, directories

pub mod boot_sector;
pub mod cluster_chain;
pub mod dir_entry;
pub mod fat_table;
pub mod label;
pub mod reader;
pub mod walker;


pub use boot_sector::{BootSectorGeometry, FsLayout};
pub use cluster_chain::{ChainCursor, ClusterChain};
pub use dir_entry::DirectoryEntry;
pub use fat_table::{FatLink, FatTable};
pub use label::{read_volume_label, VolumeLabel};
pub use reader::Fat16Session;
pub use walker::{find_file, list_tree, DirectoryWalker, WalkItem};
