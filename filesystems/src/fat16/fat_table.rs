// In-memory copy of the first FAT

use byteorder::{ByteOrder, LittleEndian};
use fatlens_core::{FatlensError, ImageReader};
use log::debug;
use std::io::{Read, Seek};

use super::boot_sector::BootSectorGeometry;
use crate::fat_common::{FAT16_BAD, FAT16_EOC_MIN, FAT16_FIRST_DATA_CLUSTER, FAT16_FREE};

/// What a FAT link says about the cluster that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatLink {
    Next(u16),
    EndOfChain,
    Free,
    Reserved,
    Bad,
}

impl FatLink {
    pub fn classify(value: u16) -> Self {
        match value {
            FAT16_FREE => FatLink::Free,
            v if v < FAT16_FIRST_DATA_CLUSTER => FatLink::Reserved,
            FAT16_BAD => FatLink::Bad,
            v if v >= FAT16_EOC_MIN => FatLink::EndOfChain,
            v => FatLink::Next(v),
        }
    }
}

/// The first FAT copy, one 16-bit link per cluster. Entries 0 and 1 are
/// reserved and never followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatTable {
    entries: Vec<u16>,
}

impl FatTable {
    /// Read `sectors_per_fat * bytes_per_sector` bytes starting after the
    /// reserved sectors.
    pub fn load<R: Read + Seek>(
        reader: &mut ImageReader<R>,
        geometry: &BootSectorGeometry,
    ) -> Result<Self, FatlensError> {
        let offset = geometry.fat_offset();
        let size = geometry.fat_size() as usize;
        debug!("Loading FAT: {} bytes at offset {:#x}", size, offset);

        let raw = reader.read_at(offset, size)?;
        Ok(Self::from_bytes(&raw))
    }

    /// Reinterpret raw FAT bytes as little-endian links. A trailing odd byte
    /// is ignored.
    pub fn from_bytes(raw: &[u8]) -> Self {
        let mut entries = vec![0u16; raw.len() / 2];
        LittleEndian::read_u16_into(&raw[..entries.len() * 2], &mut entries);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw link stored for `cluster`, if the table is that long.
    pub fn get(&self, cluster: u16) -> Option<u16> {
        self.entries.get(cluster as usize).copied()
    }

    /// True when `cluster` can be dereferenced as a data cluster.
    pub fn is_data_cluster(&self, cluster: u16) -> bool {
        cluster >= FAT16_FIRST_DATA_CLUSTER && (cluster as usize) < self.entries.len()
    }

    /// Classified link for `cluster`, or an error if it lies outside the table.
    pub fn link(&self, cluster: u16) -> Result<FatLink, FatlensError> {
        self.get(cluster).map(FatLink::classify).ok_or_else(|| {
            FatlensError::CorruptFilesystem(format!(
                "cluster {} is outside the FAT ({} entries)",
                cluster,
                self.entries.len()
            ))
        })
    }
}
