// Volume label from the boot sector

use fatlens_core::{FatlensError, ImageReader};
use std::fmt;
use std::io::{Read, Seek};

use crate::fat_common::{BS16_VOL_LAB, VOLUME_LABEL_LEN};

/// The raw 11-byte label field, blank padding included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeLabel([u8; VOLUME_LABEL_LEN]);

impl VolumeLabel {
    pub fn new(raw: [u8; VOLUME_LABEL_LEN]) -> Self {
        Self(raw)
    }

    /// Label bytes up to the first NUL, padding kept.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(VOLUME_LABEL_LEN);
        &self.0[..end]
    }

    pub fn trimmed(&self) -> String {
        self.to_string().trim_end().to_string()
    }
}

impl fmt::Display for VolumeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

/// Read the label straight from its fixed boot sector offset (0x2B). Does
/// not need the FAT, so it works on images whose geometry is unusable.
pub fn read_volume_label<R: Read + Seek>(reader: &mut ImageReader<R>) -> Result<VolumeLabel, FatlensError> {
    let mut raw = [0u8; VOLUME_LABEL_LEN];
    reader.read_exact_at(BS16_VOL_LAB as u64, &mut raw)?;
    Ok(VolumeLabel(raw))
}
