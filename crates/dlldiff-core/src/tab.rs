//! DLLS.tab parsing
//!
//! DLLS.tab carries per-DLL metadata that can't be recovered from the DLL
//! file itself, most importantly the `.bss` size.

use tracing::debug;

use crate::dll::layout::{be_u32, tab};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DllTabEntry {
    /// Offset of the DLL inside the packed DLLS.bin archive
    pub start_offset: u32,
    pub bss_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DllTab {
    entries: Vec<DllTabEntry>,
}

impl DllTab {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() % tab::RECORD_SIZE != 0 {
            return Err(Error::MalformedTable {
                len: data.len(),
                record_size: tab::RECORD_SIZE,
            });
        }

        let entries: Vec<DllTabEntry> = data
            .chunks_exact(tab::RECORD_SIZE)
            .map(|record| DllTabEntry {
                start_offset: be_u32(record, tab::START_OFFSET).unwrap_or_default(),
                bss_size: be_u32(record, tab::BSS_SIZE).unwrap_or_default(),
            })
            .collect();
        debug!("Parsed DLLS.tab with {} entries", entries.len());

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[DllTabEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a DLL by its number. DLL numbers start at 1, so DLL N is
    /// stored at index N - 1.
    pub fn entry(&self, id: &str) -> Result<&DllTabEntry> {
        let number = parse_dll_number(id)?;
        self.entries
            .get(number - 1)
            .ok_or_else(|| Error::DllNotInTable {
                id: id.to_string(),
                count: self.entries.len(),
            })
    }

    pub fn bss_size(&self, id: &str) -> Result<u32> {
        self.entry(id).map(|entry| entry.bss_size)
    }
}

/// Parse a 1-based decimal DLL number
pub fn parse_dll_number(id: &str) -> Result<usize> {
    match id.trim().parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(Error::InvalidDllId(id.to_string())),
    }
}
