// FAT16 filesystem session: one open image, its geometry and its FAT

use fatlens_core::{FatlensError, ImageReader};
use log::{debug, info};
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use super::boot_sector::{BootSectorGeometry, FsLayout};
use super::cluster_chain::{ChainCursor, ClusterChain};
use super::dir_entry::DirectoryEntry;
use super::fat_table::FatTable;
use crate::fat_common::{BOOT_SECTOR_SIZE, DIR_ENTRY_SIZE};

/// Everything a traversal needs, acquired together and released together
/// when the session is dropped.
pub struct Fat16Session<R> {
    reader: ImageReader<R>,
    geometry: BootSectorGeometry,
    layout: FsLayout,
    fat: FatTable,
}

impl Fat16Session<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FatlensError> {
        Self::new(ImageReader::open(path)?)
    }
}

impl<R: Read + Seek> Fat16Session<R> {
    /// Decode the boot sector, derive the layout and load the first FAT.
    pub fn new(mut reader: ImageReader<R>) -> Result<Self, FatlensError> {
        let boot = reader.read_at(0, BOOT_SECTOR_SIZE)?;
        let geometry = BootSectorGeometry::decode(&boot)?;
        let layout = geometry.layout();

        info!("Opening FAT16 filesystem on {}", reader.source().display());
        info!("  Bytes per sector: {}", geometry.bytes_per_sector);
        info!("  Sectors per cluster: {}", geometry.sectors_per_cluster);
        info!("  Reserved sectors: {}", geometry.reserved_sectors);
        info!("  FATs: {} x {} sectors", geometry.num_fats, geometry.sectors_per_fat);
        info!("  Root entries: {}", geometry.root_entries);
        debug!(
            "Root directory at {:#x}, data region at {:#x}",
            layout.root_dir_offset, layout.data_region_offset
        );

        let fat = FatTable::load(&mut reader, &geometry)?;

        Ok(Self {
            reader,
            geometry,
            layout,
            fat,
        })
    }

    pub fn geometry(&self) -> &BootSectorGeometry {
        &self.geometry
    }

    pub fn layout(&self) -> &FsLayout {
        &self.layout
    }

    pub fn fat(&self) -> &FatTable {
        &self.fat
    }

    /// The `index`th slot of the fixed root directory region.
    pub fn root_entry(&mut self, index: u16) -> Result<DirectoryEntry, FatlensError> {
        let raw = self.reader.read_at(self.layout.root_entry_offset(index), DIR_ENTRY_SIZE)?;
        DirectoryEntry::parse(&raw)
    }

    /// Advance a parked chain cursor by one cluster.
    pub fn next_chunk(&mut self, cursor: &mut ChainCursor) -> Result<Option<Vec<u8>>, FatlensError> {
        cursor.next_chunk(&mut self.reader, &self.fat, &self.layout)
    }

    /// Lazy chunks of a file's content, cut at its declared size.
    pub fn file_chunks(&mut self, entry: &DirectoryEntry) -> ClusterChain<'_, R> {
        ClusterChain::new(
            &mut self.reader,
            &self.fat,
            &self.layout,
            ChainCursor::file(entry.start_cluster, entry.size),
        )
    }

    /// Stream a file's content to `out` without buffering the whole file.
    pub fn copy_file_to<W: Write>(&mut self, entry: &DirectoryEntry, out: &mut W) -> Result<u64, FatlensError> {
        let mut written = 0u64;
        for chunk in self.file_chunks(entry) {
            let chunk = chunk?;
            out.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        Ok(written)
    }

    /// Whole content of a file in memory.
    pub fn read_file(&mut self, entry: &DirectoryEntry) -> Result<Vec<u8>, FatlensError> {
        let mut data = Vec::with_capacity(entry.size as usize);
        self.copy_file_to(entry, &mut data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ImageBuilder;

    #[test]
    fn test_session_decodes_geometry_and_fat() {
        let mut builder = ImageBuilder::new();
        builder.root_file(0, "HELLO.TXT", &[2], b"abcde");

        let mut session = Fat16Session::new(builder.reader()).unwrap();
        assert_eq!(session.geometry().bytes_per_sector, 512);
        assert_eq!(session.layout().root_dir_offset, 1024);
        assert_eq!(session.layout().data_region_offset, 1024 + 16 * 32);
        assert_eq!(session.fat().len(), 256);

        let entry = session.root_entry(0).unwrap();
        assert_eq!(entry.display_name(), "HELLO.TXT");
        assert_eq!(session.read_file(&entry).unwrap(), b"abcde");
    }

    #[test]
    fn test_truncated_image_fails() {
        let builder = ImageBuilder::new();
        let mut image = builder.build();
        image.truncate(700);
        let reader = ImageReader::new(std::io::Cursor::new(image));
        assert!(Fat16Session::new(reader).err().unwrap().is_io());
    }

    #[test]
    fn test_image_smaller_than_boot_sector_fails() {
        let reader = ImageReader::new(std::io::Cursor::new(vec![0u8; 200]));
        assert!(matches!(
            Fat16Session::new(reader),
            Err(FatlensError::ShortRead { offset: 0, expected: 512 })
        ));
    }

    #[test]
    fn test_copy_file_streams_every_byte() {
        let content: Vec<u8> = (0..2000u32).map(|i| b'a' + (i % 26) as u8).collect();
        let mut builder = ImageBuilder::new();
        builder.root_file(0, "ALPHA.TXT", &[5, 6, 2, 8], &content);

        let mut session = Fat16Session::new(builder.reader()).unwrap();
        let entry = session.root_entry(0).unwrap();
        let mut out = Vec::new();
        assert_eq!(session.copy_file_to(&entry, &mut out).unwrap(), 2000);
        assert_eq!(out, content);
    }
}
