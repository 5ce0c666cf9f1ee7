// Following FAT16 cluster chains

use fatlens_core::{FatlensError, ImageReader};
use log::{debug, warn};
use std::collections::HashSet;
use std::io::{Read, Seek};

use super::boot_sector::FsLayout;
use super::fat_table::{FatLink, FatTable};

/// Position within a cluster chain. Holds no borrow of the image, so a
/// traversal can park it while other reads go through the same handle.
#[derive(Debug, Clone)]
pub struct ChainCursor {
    next: Option<u16>,
    /// Bytes still owed to the caller. `None` in directory mode, where only
    /// the end-of-chain marker stops the walk.
    remaining: Option<u64>,
    visited: HashSet<u16>,
}

impl ChainCursor {
    /// Chain of a file: stops at end-of-chain or after `size` bytes,
    /// whichever comes first. An empty file reads nothing.
    pub fn file(start: u16, size: u32) -> Self {
        Self {
            next: if size == 0 { None } else { Some(start) },
            remaining: Some(size as u64),
            visited: HashSet::new(),
        }
    }

    /// Chain of a subdirectory: stops at end-of-chain only.
    pub fn directory(start: u16) -> Self {
        Self {
            next: Some(start),
            remaining: None,
            visited: HashSet::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.next.is_none()
    }

    /// Read the next cluster of the chain. The last chunk of a file is cut
    /// at the declared size.
    pub fn next_chunk<R: Read + Seek>(
        &mut self,
        reader: &mut ImageReader<R>,
        fat: &FatTable,
        layout: &FsLayout,
    ) -> Result<Option<Vec<u8>>, FatlensError> {
        let cluster = match self.next {
            Some(cluster) => cluster,
            None => return Ok(None),
        };

        if !fat.is_data_cluster(cluster) {
            self.next = None;
            return Err(FatlensError::CorruptFilesystem(format!(
                "cluster {} is not a data cluster (FAT has {} entries)",
                cluster,
                fat.len()
            )));
        }
        if !self.visited.insert(cluster) {
            self.next = None;
            return Err(FatlensError::CorruptFilesystem(format!(
                "circular cluster chain detected at cluster {}",
                cluster
            )));
        }

        let offset = layout.cluster_offset(cluster);
        debug!("Reading cluster {} at offset {:#x}", cluster, offset);
        let mut chunk = reader.read_at(offset, layout.cluster_size as usize)?;

        if let Some(remaining) = self.remaining.as_mut() {
            let take = (*remaining).min(chunk.len() as u64);
            chunk.truncate(take as usize);
            *remaining -= take;
            if *remaining == 0 {
                self.next = None;
                return Ok(Some(chunk));
            }
        }

        self.next = match fat.link(cluster)? {
            FatLink::Next(next) => Some(next),
            FatLink::EndOfChain => {
                if let Some(remaining) = self.remaining.filter(|&r| r > 0) {
                    warn!("Chain ended at cluster {} with {} bytes unread", cluster, remaining);
                }
                None
            }
            other => {
                self.next = None;
                return Err(FatlensError::CorruptFilesystem(format!(
                    "cluster {} links to {:?} inside a chain",
                    cluster, other
                )));
            }
        };

        Ok(Some(chunk))
    }
}

/// Lazy, forward-only iterator over the chunks of one chain.
pub struct ClusterChain<'a, R> {
    reader: &'a mut ImageReader<R>,
    fat: &'a FatTable,
    layout: &'a FsLayout,
    cursor: ChainCursor,
}

impl<'a, R: Read + Seek> ClusterChain<'a, R> {
    pub fn new(
        reader: &'a mut ImageReader<R>,
        fat: &'a FatTable,
        layout: &'a FsLayout,
        cursor: ChainCursor,
    ) -> Self {
        Self { reader, fat, layout, cursor }
    }
}

impl<R: Read + Seek> Iterator for ClusterChain<'_, R> {
    type Item = Result<Vec<u8>, FatlensError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor
            .next_chunk(self.reader, self.fat, self.layout)
            .transpose()
    }
}
