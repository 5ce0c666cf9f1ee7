// Depth-first directory traversal with an explicit work stack

use fatlens_core::FatlensError;
use log::{debug, trace};
use std::collections::HashSet;
use std::io::{Read, Seek, Write};

use super::cluster_chain::ChainCursor;
use super::dir_entry::DirectoryEntry;
use super::reader::Fat16Session;
use crate::fat_common::DIR_ENTRY_SIZE;

/// An entry surfaced by the walk, with its depth below the root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkItem {
    pub depth: usize,
    pub entry: DirectoryEntry,
}

enum Region {
    /// Fixed array of slots between the FATs and the data region.
    Root { next_index: u16 },
    /// Subdirectory stored in a cluster chain.
    Chain {
        cursor: ChainCursor,
        chunk: Vec<u8>,
        pos: usize,
    },
}

struct Frame {
    region: Region,
    depth: usize,
}

impl Frame {
    fn next_raw<R: Read + Seek>(
        &mut self,
        session: &mut Fat16Session<R>,
    ) -> Result<Option<DirectoryEntry>, FatlensError> {
        match &mut self.region {
            Region::Root { next_index } => {
                if *next_index >= session.geometry().root_entries {
                    return Ok(None);
                }
                let entry = session.root_entry(*next_index)?;
                *next_index += 1;
                Ok(Some(entry))
            }
            Region::Chain { cursor, chunk, pos } => {
                while *pos + DIR_ENTRY_SIZE > chunk.len() {
                    match session.next_chunk(cursor)? {
                        Some(next) => {
                            *chunk = next;
                            *pos = 0;
                        }
                        None => return Ok(None),
                    }
                }
                let entry = DirectoryEntry::parse(&chunk[*pos..*pos + DIR_ENTRY_SIZE])?;
                *pos += DIR_ENTRY_SIZE;
                Ok(Some(entry))
            }
        }
    }
}

/// Walks the root directory and every subdirectory below it, yielding
/// entries in on-disk order. A directory's children come right after it.
///
/// Skipped: volume label and long-name slots, deleted slots, `.` and `..`.
/// A zero first name byte ends the current directory.
pub struct DirectoryWalker {
    stack: Vec<Frame>,
    visited_dirs: HashSet<u16>,
}

impl Default for DirectoryWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryWalker {
    pub fn new() -> Self {
        Self {
            stack: vec![Frame {
                region: Region::Root { next_index: 0 },
                depth: 0,
            }],
            visited_dirs: HashSet::new(),
        }
    }

    /// Number of directories currently open, root included.
    pub fn open_directories(&self) -> usize {
        self.stack.len()
    }

    pub fn next_entry<R: Read + Seek>(
        &mut self,
        session: &mut Fat16Session<R>,
    ) -> Result<Option<WalkItem>, FatlensError> {
        loop {
            let (depth, raw) = match self.stack.last_mut() {
                Some(frame) => (frame.depth, frame.next_raw(session)?),
                None => return Ok(None),
            };

            let entry = match raw {
                Some(entry) if !entry.is_end() => entry,
                _ => {
                    self.stack.pop();
                    continue;
                }
            };

            if entry.is_deleted() || entry.is_volume_label() {
                trace!("Skipping slot {:?}", entry.name);
                continue;
            }

            if entry.is_directory() {
                if entry.is_dot_entry() {
                    continue;
                }
                if !self.visited_dirs.insert(entry.start_cluster) {
                    return Err(FatlensError::CorruptFilesystem(format!(
                        "directory {} at cluster {} was already visited",
                        entry.display_name(),
                        entry.start_cluster
                    )));
                }
                debug!(
                    "Descending into {} (cluster {}, depth {})",
                    entry.display_name(),
                    entry.start_cluster,
                    depth + 1
                );
                self.stack.push(Frame {
                    region: Region::Chain {
                        cursor: ChainCursor::directory(entry.start_cluster),
                        chunk: Vec::new(),
                        pos: 0,
                    },
                    depth: depth + 1,
                });
            }

            return Ok(Some(WalkItem { depth, entry }));
        }
    }
}

/// Print the whole tree: one line per entry, indented by one tab per level.
pub fn list_tree<R: Read + Seek, W: Write>(
    session: &mut Fat16Session<R>,
    out: &mut W,
) -> Result<(), FatlensError> {
    let mut walker = DirectoryWalker::new();
    while let Some(item) = walker.next_entry(session)? {
        for _ in 0..item.depth {
            out.write_all(b"\t")?;
        }
        let kind = if item.entry.is_directory() { "Dir " } else { "File" };
        writeln!(out, "{}: {}", kind, item.entry.display_name())?;
    }
    Ok(())
}

/// Search the whole tree for files whose display name equals `name` and
/// print each match as a `File: NAME` line followed by its raw content.
/// Returns the number of matches; no match prints nothing.
pub fn find_file<R: Read + Seek, W: Write>(
    session: &mut Fat16Session<R>,
    name: &str,
    out: &mut W,
) -> Result<usize, FatlensError> {
    let mut walker = DirectoryWalker::new();
    let mut matches = 0;
    while let Some(item) = walker.next_entry(session)? {
        if item.entry.is_directory() || item.entry.display_name() != name {
            continue;
        }
        debug!("Found {} at depth {} ({} bytes)", name, item.depth, item.entry.size);
        writeln!(out, "File: {}", name)?;
        session.copy_file_to(&item.entry, out)?;
        matches += 1;
    }
    Ok(matches)
}
