// FAT16 on-disk constants

// Boot sector offsets
pub const BOOT_SECTOR_SIZE: usize = 512;
pub const BPB_BYTES_PER_SEC: usize = 0x0B;
pub const BPB_SEC_PER_CLUS: usize = 0x0D;
pub const BPB_RSVD_SEC_CNT: usize = 0x0E;
pub const BPB_NUM_FATS: usize = 0x10;
pub const BPB_ROOT_ENT_CNT: usize = 0x11;
pub const BPB_TOT_SEC16: usize = 0x13;
pub const BPB_FAT_SZ16: usize = 0x16;
pub const BPB_TOT_SEC32: usize = 0x20;
pub const BS16_VOL_LAB: usize = 0x2B;
pub const BS16_FIL_SYS_TYPE: usize = 0x36;

pub const VOLUME_LABEL_LEN: usize = 11;

// Directory entry layout
pub const DIR_ENTRY_SIZE: usize = 32;
pub const DIR_NAME: usize = 0x00;
pub const DIR_NAME_LEN: usize = 11;
pub const DIR_ATTR: usize = 0x0B;
pub const DIR_FST_CLUS_LO: usize = 0x1A;
pub const DIR_FILE_SIZE: usize = 0x1C;

// First name byte markers
pub const DIR_ENTRY_END: u8 = 0x00;
pub const DIR_ENTRY_DELETED: u8 = 0xE5;

// Pseudo-entries, padded to the full name field
pub const DOT_NAME: [u8; 11] = *b".          ";
pub const DOTDOT_NAME: [u8; 11] = *b"..         ";

// FAT entry values
pub const FAT16_FREE: u16 = 0x0000;
pub const FAT16_FIRST_DATA_CLUSTER: u16 = 2;
pub const FAT16_BAD: u16 = 0xFFF7;
pub const FAT16_EOC_MIN: u16 = 0xFFF8;
pub const FAT16_EOC: u16 = 0xFFFF;
