use super::layout::{NO_OFFSET, be_u32, header::WORD, reloc};
use crate::error::{Error, Result};

/// Relocation table stored at the declared `.rodata` offset.
///
/// Three runs of words, each closed by its own terminator. Only the total
/// size matters for diffing, but the runs are kept for inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DllRelocTable {
    pub global_offset_table: Vec<u32>,
    pub gp_relocations: Vec<u32>,
    pub data_relocations: Vec<u32>,
}

impl DllRelocTable {
    /// Parse the table at the declared `.rodata` offset. Every DLL carries
    /// one, so an absent `.rodata` offset is malformed.
    pub fn parse(data: &[u8], offset: u32, id: &str) -> Result<Self> {
        if offset == NO_OFFSET {
            return Err(Error::malformed(
                id,
                ".rodata offset is absent, so there is no relocation table",
            ));
        }

        let mut cursor = offset as usize;
        let global_offset_table =
            read_run(data, &mut cursor, reloc::GOT_END, "global offset table", id)?;
        let gp_relocations = read_run(data, &mut cursor, reloc::GP_END, "$gp relocations", id)?;
        let data_relocations =
            read_run(data, &mut cursor, reloc::DATA_END, ".data relocations", id)?;

        Ok(Self {
            global_offset_table,
            gp_relocations,
            data_relocations,
        })
    }

    /// Encoded size in bytes, terminators included
    pub fn size(&self) -> u32 {
        let words = self.global_offset_table.len()
            + self.gp_relocations.len()
            + self.data_relocations.len()
            + 3;
        (words * WORD) as u32
    }
}

fn read_run(
    data: &[u8],
    cursor: &mut usize,
    terminator: u32,
    name: &str,
    id: &str,
) -> Result<Vec<u32>> {
    let mut entries = Vec::new();
    loop {
        let Some(word) = be_u32(data, *cursor) else {
            return Err(Error::malformed(
                id,
                format!("{} is not terminated before the end of the file", name),
            ));
        };
        *cursor += WORD;

        if word == terminator {
            return Ok(entries);
        }
        entries.push(word);
    }
}
