// FAT16 boot sector decoding and region layout

use byteorder::{ByteOrder, LittleEndian};
use fatlens_core::FatlensError;
use serde::Serialize;

use crate::fat_common::*;

/// Geometry fields of the boot sector, decoded field by field from the raw
/// bytes. Nothing is validated: zero or non-power-of-two values pass through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootSectorGeometry {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub sectors_per_fat: u16,
    pub root_entries: u16,
    pub total_sectors: u32,
    pub volume_label: String,
    pub fs_type: String,
}

/// Absolute byte positions derived from a [`BootSectorGeometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FsLayout {
    pub cluster_size: u64,
    pub fat_offset: u64,
    pub fat_size: u64,
    pub root_dir_offset: u64,
    pub root_entries: u16,
    pub data_region_offset: u64,
}

impl BootSectorGeometry {
    /// Decode the first 512 bytes of an image.
    pub fn decode(boot: &[u8]) -> Result<Self, FatlensError> {
        if boot.len() < BOOT_SECTOR_SIZE {
            return Err(FatlensError::ShortRead {
                offset: 0,
                expected: BOOT_SECTOR_SIZE,
            });
        }

        let total_16 = LittleEndian::read_u16(&boot[BPB_TOT_SEC16..]);
        let total_sectors = if total_16 != 0 {
            total_16 as u32
        } else {
            LittleEndian::read_u32(&boot[BPB_TOT_SEC32..])
        };

        Ok(Self {
            bytes_per_sector: LittleEndian::read_u16(&boot[BPB_BYTES_PER_SEC..]),
            sectors_per_cluster: boot[BPB_SEC_PER_CLUS],
            reserved_sectors: LittleEndian::read_u16(&boot[BPB_RSVD_SEC_CNT..]),
            num_fats: boot[BPB_NUM_FATS],
            sectors_per_fat: LittleEndian::read_u16(&boot[BPB_FAT_SZ16..]),
            root_entries: LittleEndian::read_u16(&boot[BPB_ROOT_ENT_CNT..]),
            total_sectors,
            volume_label: String::from_utf8_lossy(&boot[BS16_VOL_LAB..BS16_VOL_LAB + VOLUME_LABEL_LEN])
                .into_owned(),
            fs_type: String::from_utf8_lossy(&boot[BS16_FIL_SYS_TYPE..BS16_FIL_SYS_TYPE + 8])
                .into_owned(),
        })
    }

    pub fn cluster_size(&self) -> u64 {
        self.sectors_per_cluster as u64 * self.bytes_per_sector as u64
    }

    /// Byte offset of the first FAT copy.
    pub fn fat_offset(&self) -> u64 {
        self.reserved_sectors as u64 * self.bytes_per_sector as u64
    }

    /// Byte length of one FAT copy.
    pub fn fat_size(&self) -> u64 {
        self.sectors_per_fat as u64 * self.bytes_per_sector as u64
    }

    /// Derive region offsets. Pure; recomputed for every session.
    pub fn layout(&self) -> FsLayout {
        let root_dir_offset = self.fat_offset() + self.fat_size() * self.num_fats as u64;
        let data_region_offset = root_dir_offset + self.root_entries as u64 * DIR_ENTRY_SIZE as u64;

        FsLayout {
            cluster_size: self.cluster_size(),
            fat_offset: self.fat_offset(),
            fat_size: self.fat_size(),
            root_dir_offset,
            root_entries: self.root_entries,
            data_region_offset,
        }
    }
}

impl FsLayout {
    /// Absolute offset of a data cluster. Cluster 2 is the first one.
    pub fn cluster_offset(&self, cluster: u16) -> u64 {
        self.data_region_offset
            + (cluster as u64).saturating_sub(FAT16_FIRST_DATA_CLUSTER as u64) * self.cluster_size
    }

    /// Absolute offset of the `index`th root directory slot.
    pub fn root_entry_offset(&self, index: u16) -> u64 {
        self.root_dir_offset + index as u64 * DIR_ENTRY_SIZE as u64
    }
}
