use tracing::trace;

use super::layout::{NO_OFFSET, be_u16, be_u32, header};
use crate::error::{Error, Result};

/// Fixed header at the start of every DLL file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DllHeader {
    /// Header size; `.text` begins right after the header
    pub size: u32,
    pub data_offset: u32,
    /// Declared `.rodata` offset. The relocation table sits here, so the
    /// real `.rodata` bytes start after it.
    pub rodata_offset: u32,
    pub export_count: u16,
    pub ctor_offset: u32,
    pub dtor_offset: u32,
    pub export_offsets: Vec<u32>,
}

impl DllHeader {
    pub fn parse(data: &[u8], id: &str) -> Result<Self> {
        if data.len() < header::MIN_SIZE {
            return Err(Error::malformed(
                id,
                format!(
                    "{:#x} bytes is too short for the {:#x}-byte header",
                    data.len(),
                    header::MIN_SIZE
                ),
            ));
        }

        // Length was checked above, so the fixed fields are always present.
        let word = |offset: usize| be_u32(data, offset).unwrap_or(NO_OFFSET);

        let export_count = be_u16(data, header::EXPORT_COUNT).unwrap_or(0);
        let exports_end = header::EXPORTS + export_count as usize * header::WORD;
        if exports_end > data.len() {
            return Err(Error::malformed(
                id,
                format!(
                    "export table of {} entries ends at {:#x}, past the end of the file ({:#x})",
                    export_count,
                    exports_end,
                    data.len()
                ),
            ));
        }

        let export_offsets = (header::EXPORTS..exports_end)
            .step_by(header::WORD)
            .map(word)
            .collect();

        let parsed = Self {
            size: word(header::SIZE),
            data_offset: word(header::DATA_OFFSET),
            rodata_offset: word(header::RODATA_OFFSET),
            export_count,
            ctor_offset: word(header::CTOR_OFFSET),
            dtor_offset: word(header::DTOR_OFFSET),
            export_offsets,
        };
        trace!("DLL {} header: {:?}", id, parsed);

        Ok(parsed)
    }

    pub fn ctor(&self) -> Option<u32> {
        (self.ctor_offset != NO_OFFSET).then_some(self.ctor_offset)
    }

    pub fn dtor(&self) -> Option<u32> {
        (self.dtor_offset != NO_OFFSET).then_some(self.dtor_offset)
    }
}
