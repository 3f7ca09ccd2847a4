//! Binary layout constants for DLL files and DLLS.tab
//!
//! All multi-byte fields are big-endian.

/// Sentinel stored in an offset field when the section or entry point is absent.
pub const NO_OFFSET: u32 = 0xFFFF_FFFF;

/// DLL header fields, relative to the start of the file
pub mod header {
    /// Word size (4 bytes / 32-bit integer)
    pub const WORD: usize = 4;

    /// Header size, which is also the start of `.text`
    pub const SIZE: usize = 0x00;
    pub const DATA_OFFSET: usize = 0x04;
    pub const RODATA_OFFSET: usize = 0x08;
    /// u16, followed by two bytes of padding
    pub const EXPORT_COUNT: usize = 0x0C;
    pub const CTOR_OFFSET: usize = 0x10;
    pub const DTOR_OFFSET: usize = 0x14;
    /// First entry of the export offset table (one word per export)
    pub const EXPORTS: usize = 0x18;

    /// Smallest buffer that can hold the fixed header fields
    pub const MIN_SIZE: usize = EXPORTS;
}

/// Relocation table run terminators
pub mod reloc {
    pub const GOT_END: u32 = 0xFFFF_FFFE;
    pub const GP_END: u32 = 0xFFFF_FFFD;
    pub const DATA_END: u32 = 0xFFFF_FFFF;
}

/// DLLS.tab record fields
pub mod tab {
    pub const START_OFFSET: usize = 0x00;
    pub const BSS_SIZE: usize = 0x04;
    pub const RECORD_SIZE: usize = 0x08;
}

pub(crate) fn be_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn be_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_be_reads() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A];
        assert_eq!(be_u32(&data, 0), Some(0x1234_5678));
        assert_eq!(be_u32(&data, 1), Some(0x3456_789A));
        assert_eq!(be_u16(&data, 3), Some(0x789A));
    }

    #[test]
    fn test_be_reads_out_of_bounds() {
        let data = [0u8; 4];
        assert_eq!(be_u32(&data, 1), None);
        assert_eq!(be_u16(&data, 3), None);
        assert_eq!(be_u32(&data, usize::MAX), None);
    }
}
