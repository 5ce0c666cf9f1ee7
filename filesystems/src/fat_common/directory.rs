// 8.3 short names and directory entry attributes

/// Directory entry attribute bits
pub mod attributes {
    pub const ATTR_READ_ONLY: u8 = 0x01;
    pub const ATTR_HIDDEN: u8 = 0x02;
    pub const ATTR_SYSTEM: u8 = 0x04;
    pub const ATTR_VOLUME_ID: u8 = 0x08;
    pub const ATTR_DIRECTORY: u8 = 0x10;
    pub const ATTR_ARCHIVE: u8 = 0x20;
    pub const ATTR_LONG_NAME: u8 = 0x0F;  // VFAT slot, never decoded here
}

/// Attribute byte of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatAttributes(pub u8);

impl FatAttributes {
    fn has(&self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn is_read_only(&self) -> bool { self.has(attributes::ATTR_READ_ONLY) }
    pub fn is_hidden(&self) -> bool { self.has(attributes::ATTR_HIDDEN) }
    pub fn is_system(&self) -> bool { self.has(attributes::ATTR_SYSTEM) }
    pub fn is_volume_id(&self) -> bool { self.has(attributes::ATTR_VOLUME_ID) }
    pub fn is_directory(&self) -> bool { self.has(attributes::ATTR_DIRECTORY) }
    pub fn is_archive(&self) -> bool { self.has(attributes::ATTR_ARCHIVE) }
    pub fn is_long_name(&self) -> bool { self.0 & 0x3F == attributes::ATTR_LONG_NAME }
}

/// Render an on-disk 11-byte name field as a display name.
///
/// The 8-byte base keeps everything up to its last non-space byte. A dot and
/// the extension follow only when the first extension byte is not a space;
/// spaces inside the extension are dropped. Bytes map 1:1 onto chars.
pub fn sanitize_name(name: &[u8; 11]) -> String {
    let base = &name[..8];
    let base_len = base.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);

    let mut result = String::with_capacity(12);
    result.extend(base[..base_len].iter().map(|&b| b as char));

    if name[8] != b' ' {
        result.push('.');
        result.extend(name[8..].iter().filter(|&&b| b != b' ').map(|&b| b as char));
    }

    result
}

/// Pad a display name back into the 11-byte on-disk field.
///
/// Returns `None` when the base exceeds 8 bytes, the extension exceeds 3,
/// or the name is empty.
pub fn pad_short_name(display: &str) -> Option<[u8; 11]> {
    let mut field = [b' '; 11];

    let (base, ext) = match display {
        "." | ".." => (display, ""),
        _ => display.split_once('.').unwrap_or((display, "")),
    };

    if base.is_empty() || base.len() > 8 || ext.len() > 3 {
        return None;
    }

    field[..base.len()].copy_from_slice(base.as_bytes());
    field[8..8 + ext.len()].copy_from_slice(ext.as_bytes());
    Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_with_extension() {
        assert_eq!(sanitize_name(b"HELLO   TXT"), "HELLO.TXT");
        assert_eq!(sanitize_name(b"README  MD "), "README.MD");
        assert_eq!(sanitize_name(b"ABCDEFGHIJK"), "ABCDEFGH.IJK");
    }

    #[test]
    fn test_sanitize_without_extension() {
        assert_eq!(sanitize_name(b"SUBDIR     "), "SUBDIR");
        assert_eq!(sanitize_name(b"KERNEL8    "), "KERNEL8");
    }

    #[test]
    fn test_sanitize_pseudo_entries() {
        assert_eq!(sanitize_name(b".          "), ".");
        assert_eq!(sanitize_name(b"..         "), "..");
    }

    #[test]
    fn test_sanitize_returns_fresh_strings() {
        let first = sanitize_name(b"A       TXT");
        let second = sanitize_name(b"B       BIN");
        assert_eq!(first, "A.TXT");
        assert_eq!(second, "B.BIN");
    }

    #[test]
    fn test_sanitize_inverts_padding() {
        for name in ["HELLO.TXT", "A.TXT", "SUBDIR", "X", "ABCDEFGH.IJK", "NOTES.C"] {
            let field = pad_short_name(name).unwrap();
            assert_eq!(sanitize_name(&field), name);
        }
    }

    #[test]
    fn test_pad_rejects_oversized_names() {
        assert!(pad_short_name("TOOLONGNAME.TXT").is_none());
        assert!(pad_short_name("FILE.TEXT").is_none());
        assert!(pad_short_name("").is_none());
    }

    #[test]
    fn test_attributes() {
        let dir = FatAttributes(attributes::ATTR_DIRECTORY | attributes::ATTR_ARCHIVE);
        assert!(dir.is_directory());
        assert!(dir.is_archive());
        assert!(!dir.is_volume_id());

        let lfn = FatAttributes(attributes::ATTR_LONG_NAME);
        assert!(lfn.is_long_name());
        assert!(lfn.is_volume_id());
        assert!(!lfn.is_directory());
    }
}
