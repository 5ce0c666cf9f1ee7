// 32-byte directory entry, decoded through explicit field accessors

use byteorder::{ByteOrder, LittleEndian};
use fatlens_core::FatlensError;

use crate::fat_common::*;

/// One on-disk directory record. Copied out of the image per traversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: [u8; 11],
    pub attributes: FatAttributes,
    pub start_cluster: u16,
    /// Authoritative for files only.
    pub size: u32,
}

impl DirectoryEntry {
    pub fn parse(raw: &[u8]) -> Result<Self, FatlensError> {
        if raw.len() < DIR_ENTRY_SIZE {
            return Err(FatlensError::InvalidInput(format!(
                "directory entry needs {} bytes, got {}",
                DIR_ENTRY_SIZE,
                raw.len()
            )));
        }

        let mut name = [0u8; DIR_NAME_LEN];
        name.copy_from_slice(&raw[DIR_NAME..DIR_NAME + DIR_NAME_LEN]);

        Ok(Self {
            name,
            attributes: FatAttributes(raw[DIR_ATTR]),
            start_cluster: LittleEndian::read_u16(&raw[DIR_FST_CLUS_LO..]),
            size: LittleEndian::read_u32(&raw[DIR_FILE_SIZE..]),
        })
    }

    /// First name byte is zero: this slot and every later one are unused.
    pub fn is_end(&self) -> bool {
        self.name[0] == DIR_ENTRY_END
    }

    pub fn is_deleted(&self) -> bool {
        self.name[0] == DIR_ENTRY_DELETED
    }

    /// Volume label slots, and VFAT name slots which carry the same bit.
    pub fn is_volume_label(&self) -> bool {
        self.attributes.is_volume_id()
    }

    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    /// `.` or `..`
    pub fn is_dot_entry(&self) -> bool {
        self.name == DOT_NAME || self.name == DOTDOT_NAME
    }

    pub fn display_name(&self) -> String {
        sanitize_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_entry(name: &[u8; 11], attr: u8, start: u16, size: u32) -> [u8; 32] {
        let mut raw = [0u8; 32];
        raw[..11].copy_from_slice(name);
        raw[DIR_ATTR] = attr;
        raw[DIR_FST_CLUS_LO..DIR_FST_CLUS_LO + 2].copy_from_slice(&start.to_le_bytes());
        raw[DIR_FILE_SIZE..DIR_FILE_SIZE + 4].copy_from_slice(&size.to_le_bytes());
        raw
    }

    #[test]
    fn test_parse_file_entry() {
        let raw = raw_entry(b"HELLO   TXT", attributes::ATTR_ARCHIVE, 0x0102, 0x0A0B0C0D);
        let entry = DirectoryEntry::parse(&raw).unwrap();

        assert_eq!(entry.display_name(), "HELLO.TXT");
        assert_eq!(entry.start_cluster, 0x0102);
        assert_eq!(entry.size, 0x0A0B0C0D);
        assert!(!entry.is_directory());
        assert!(!entry.is_dot_entry());
    }

    #[test]
    fn test_parse_from_unaligned_slice() {
        let mut buf = vec![0xAAu8; 33];
        buf[1..].copy_from_slice(&raw_entry(b"SUBDIR     ", attributes::ATTR_DIRECTORY, 7, 0));
        let entry = DirectoryEntry::parse(&buf[1..]).unwrap();
        assert!(entry.is_directory());
        assert_eq!(entry.start_cluster, 7);
    }

    #[test]
    fn test_markers() {
        assert!(DirectoryEntry::parse(&[0u8; 32]).unwrap().is_end());

        let mut deleted = raw_entry(b"OLD     TXT", 0, 2, 1);
        deleted[0] = DIR_ENTRY_DELETED;
        assert!(DirectoryEntry::parse(&deleted).unwrap().is_deleted());

        let label = raw_entry(b"MYDISK     ", attributes::ATTR_VOLUME_ID, 0, 0);
        assert!(DirectoryEntry::parse(&label).unwrap().is_volume_label());

        let dot = raw_entry(&DOT_NAME, attributes::ATTR_DIRECTORY, 5, 0);
        let dotdot = raw_entry(&DOTDOT_NAME, attributes::ATTR_DIRECTORY, 0, 0);
        assert!(DirectoryEntry::parse(&dot).unwrap().is_dot_entry());
        assert!(DirectoryEntry::parse(&dotdot).unwrap().is_dot_entry());
    }

    #[test]
    fn test_parse_rejects_short_slice() {
        assert!(DirectoryEntry::parse(&[0u8; 31]).is_err());
    }
}
