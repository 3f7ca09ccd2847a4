//! DLL file parsing
//!
//! A DLL file is laid out as:
//!
//! ```text
//! header | .text | relocation table | .rodata | .data
//!        ^size   ^rodata_offset               ^data_offset
//! ```
//!
//! `.bss` is not stored in the file; its size comes from DLLS.tab.

mod header;
pub mod layout;
mod reloc;

#[cfg(test)]
pub mod builder;

pub use header::DllHeader;
pub use reloc::DllRelocTable;

#[cfg(test)]
pub use builder::DllBuilder;

use tracing::debug;

use crate::error::{Error, Result};

/// Parsed view over the bytes of one DLL file
#[derive(Debug, Clone)]
pub struct Dll<'a> {
    id: String,
    pub header: DllHeader,
    pub reloc_table: DllRelocTable,
    data: &'a [u8],
}

impl<'a> Dll<'a> {
    /// Parse a DLL file. `id` only labels errors and logs.
    pub fn parse(data: &'a [u8], id: &str) -> Result<Self> {
        let header = DllHeader::parse(data, id)?;
        let reloc_table = DllRelocTable::parse(data, header.rodata_offset, id)?;
        // `.text` already ends inside the file since the relocation table was
        // found at its end, and `.data` runs to the end of the file.
        if header.data_offset as usize > data.len() {
            return Err(Error::malformed(
                id,
                format!(
                    ".data offset {:#x} is past the end of the file ({:#x})",
                    header.data_offset,
                    data.len()
                ),
            ));
        }

        let dll = Self {
            id: id.to_string(),
            header,
            reloc_table,
            data,
        };
        debug!(
            "Parsed DLL {}: .text {:#x}+{:#x}, .rodata {:#x}+{:#x}, .data {:#x}+{:#x}, {} exports",
            dll.id,
            dll.header.size,
            dll.text_size(),
            dll.rodata_start(),
            dll.rodata_size(),
            dll.header.data_offset,
            dll.data_size(),
            dll.header.export_count
        );

        Ok(dll)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw file contents
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn ctor(&self) -> Option<u32> {
        self.header.ctor()
    }

    pub fn dtor(&self) -> Option<u32> {
        self.header.dtor()
    }

    /// Offset of the first real `.rodata` byte, past the relocation table
    pub fn rodata_start(&self) -> i64 {
        self.header.rodata_offset as i64 + self.reloc_table.size() as i64
    }

    pub fn text_size(&self) -> i64 {
        self.header.rodata_offset as i64 - self.header.size as i64
    }

    pub fn rodata_size(&self) -> i64 {
        self.header.data_offset as i64 - self.rodata_start()
    }

    pub fn data_size(&self) -> i64 {
        self.data.len() as i64 - self.header.data_offset as i64
    }

    /// Size of the module once loaded, which is also where `.bss` begins.
    ///
    /// Counts every stored region: the header and relocation table as well as
    /// `.text`, `.rodata` and `.data`. For a consistent header this is the
    /// file length.
    pub fn ram_size(&self) -> i64 {
        self.header.size as i64
            + self.text_size()
            + self.reloc_table.size() as i64
            + self.rodata_size()
            + self.data_size()
    }
}
