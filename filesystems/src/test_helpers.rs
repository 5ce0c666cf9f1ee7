// Synthetic FAT16 images for tests

use fatlens_core::ImageReader;
use std::io::Cursor;

use crate::fat16::boot_sector::BootSectorGeometry;
use crate::fat_common::*;

/// Builds a small FAT16 image in memory, byte by byte.
pub struct ImageBuilder {
    geometry: BootSectorGeometry,
    image: Vec<u8>,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBuilder {
    /// 512-byte sectors, one sector per cluster, one reserved sector,
    /// one FAT of one sector, 16 root entries, 32 data clusters.
    pub fn new() -> Self {
        Self::with_geometry(512, 1, 1, 1, 16, 1, 32)
    }

    pub fn with_geometry(
        bytes_per_sector: u16,
        sectors_per_cluster: u8,
        reserved_sectors: u16,
        num_fats: u8,
        root_entries: u16,
        sectors_per_fat: u16,
        data_clusters: u16,
    ) -> Self {
        let mut boot = vec![0u8; BOOT_SECTOR_SIZE];
        boot[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        boot[3..11].copy_from_slice(b"FATLENS ");
        boot[BPB_BYTES_PER_SEC..BPB_BYTES_PER_SEC + 2].copy_from_slice(&bytes_per_sector.to_le_bytes());
        boot[BPB_SEC_PER_CLUS] = sectors_per_cluster;
        boot[BPB_RSVD_SEC_CNT..BPB_RSVD_SEC_CNT + 2].copy_from_slice(&reserved_sectors.to_le_bytes());
        boot[BPB_NUM_FATS] = num_fats;
        boot[BPB_ROOT_ENT_CNT..BPB_ROOT_ENT_CNT + 2].copy_from_slice(&root_entries.to_le_bytes());
        boot[BPB_FAT_SZ16..BPB_FAT_SZ16 + 2].copy_from_slice(&sectors_per_fat.to_le_bytes());
        boot[BS16_VOL_LAB..BS16_VOL_LAB + VOLUME_LABEL_LEN].copy_from_slice(b"NO NAME    ");
        boot[BS16_FIL_SYS_TYPE..BS16_FIL_SYS_TYPE + 8].copy_from_slice(b"FAT16   ");
        boot[510] = 0x55;
        boot[511] = 0xAA;

        let mut geometry = BootSectorGeometry::decode(&boot).expect("boot sector is 512 bytes");
        let layout = geometry.layout();
        let size = layout.data_region_offset + data_clusters as u64 * layout.cluster_size;
        let total_sectors = (size / bytes_per_sector as u64) as u32;
        boot[BPB_TOT_SEC32..BPB_TOT_SEC32 + 4].copy_from_slice(&total_sectors.to_le_bytes());
        geometry.total_sectors = total_sectors;

        let mut image = vec![0u8; size.max(BOOT_SECTOR_SIZE as u64) as usize];
        image[..BOOT_SECTOR_SIZE].copy_from_slice(&boot);

        let mut builder = Self { geometry, image };
        builder.set_fat(0, 0xFFF8);
        builder.set_fat(1, FAT16_EOC);
        builder
    }

    pub fn geometry(&self) -> BootSectorGeometry {
        self.geometry.clone()
    }

    pub fn set_label(&mut self, label: &[u8; 11]) -> &mut Self {
        self.image[BS16_VOL_LAB..BS16_VOL_LAB + VOLUME_LABEL_LEN].copy_from_slice(label);
        self.geometry.volume_label = String::from_utf8_lossy(label).into_owned();
        self
    }

    /// Write a link into every FAT copy.
    pub fn set_fat(&mut self, cluster: u16, value: u16) -> &mut Self {
        let layout = self.geometry.layout();
        for copy in 0..self.geometry.num_fats as u64 {
            let offset = (layout.fat_offset + copy * layout.fat_size + cluster as u64 * 2) as usize;
            self.image[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        }
        self
    }

    /// Link `clusters` in order and terminate the chain.
    pub fn chain(&mut self, clusters: &[u16]) -> &mut Self {
        for pair in clusters.windows(2) {
            self.set_fat(pair[0], pair[1]);
        }
        if let Some(&last) = clusters.last() {
            self.set_fat(last, FAT16_EOC);
        }
        self
    }

    /// Spread `data` across `clusters`, zero-padding the last one.
    pub fn write_clusters(&mut self, clusters: &[u16], data: &[u8]) -> &mut Self {
        let layout = self.geometry.layout();
        let cluster_size = layout.cluster_size as usize;
        for (cluster, chunk) in clusters.iter().zip(data.chunks(cluster_size)) {
            let offset = layout.cluster_offset(*cluster) as usize;
            self.image[offset..offset + chunk.len()].copy_from_slice(chunk);
        }
        self
    }

    /// Fill a whole cluster with one byte.
    pub fn fill_cluster(&mut self, cluster: u16, byte: u8) -> &mut Self {
        let layout = self.geometry.layout();
        let offset = layout.cluster_offset(cluster) as usize;
        self.image[offset..offset + layout.cluster_size as usize].fill(byte);
        self
    }

    pub fn root_entry(&mut self, index: u16, name: &str, attr: u8, start: u16, size: u32) -> &mut Self {
        let offset = self.geometry.layout().root_entry_offset(index) as usize;
        self.put_entry(offset, &short_name(name), attr, start, size)
    }

    pub fn root_entry_raw(&mut self, index: u16, name: &[u8; 11], attr: u8, start: u16, size: u32) -> &mut Self {
        let offset = self.geometry.layout().root_entry_offset(index) as usize;
        self.put_entry(offset, name, attr, start, size)
    }

    /// Write the `index`th 32-byte slot of a directory cluster.
    pub fn dir_entry(&mut self, cluster: u16, index: u16, name: &str, attr: u8, start: u16, size: u32) -> &mut Self {
        let offset = self.geometry.layout().cluster_offset(cluster) + index as u64 * DIR_ENTRY_SIZE as u64;
        self.put_entry(offset as usize, &short_name(name), attr, start, size)
    }

    /// Root-level file whose content occupies `clusters`.
    pub fn root_file(&mut self, index: u16, name: &str, clusters: &[u16], content: &[u8]) -> &mut Self {
        let start = clusters.first().copied().unwrap_or(0);
        self.root_entry(index, name, attributes::ATTR_ARCHIVE, start, content.len() as u32);
        self.chain(clusters);
        self.write_clusters(clusters, content)
    }

    /// Directory-level file whose content occupies `clusters`.
    pub fn dir_file(&mut self, dir_cluster: u16, index: u16, name: &str, clusters: &[u16], content: &[u8]) -> &mut Self {
        let start = clusters.first().copied().unwrap_or(0);
        self.dir_entry(dir_cluster, index, name, attributes::ATTR_ARCHIVE, start, content.len() as u32);
        self.chain(clusters);
        self.write_clusters(clusters, content)
    }

    /// Single-cluster subdirectory with its `.` and `..` entries.
    pub fn subdir(&mut self, cluster: u16, parent: u16) -> &mut Self {
        self.set_fat(cluster, FAT16_EOC);
        self.dir_entry(cluster, 0, ".", attributes::ATTR_DIRECTORY, cluster, 0);
        self.dir_entry(cluster, 1, "..", attributes::ATTR_DIRECTORY, parent, 0)
    }

    fn put_entry(&mut self, offset: usize, name: &[u8; 11], attr: u8, start: u16, size: u32) -> &mut Self {
        let slot = &mut self.image[offset..offset + DIR_ENTRY_SIZE];
        slot.fill(0);
        slot[DIR_NAME..DIR_NAME + DIR_NAME_LEN].copy_from_slice(name);
        slot[DIR_ATTR] = attr;
        slot[DIR_FST_CLUS_LO..DIR_FST_CLUS_LO + 2].copy_from_slice(&start.to_le_bytes());
        slot[DIR_FILE_SIZE..DIR_FILE_SIZE + 4].copy_from_slice(&size.to_le_bytes());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.image.clone()
    }

    pub fn reader(&self) -> ImageReader<Cursor<Vec<u8>>> {
        ImageReader::new(Cursor::new(self.build()))
    }
}

fn short_name(name: &str) -> [u8; 11] {
    pad_short_name(name).unwrap_or_else(|| panic!("not an 8.3 name: {}", name))
}
