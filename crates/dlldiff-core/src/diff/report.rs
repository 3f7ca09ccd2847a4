use std::fmt;

use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[strum(serialize = ".text")]
    Text,
    #[strum(serialize = ".rodata")]
    Rodata,
    #[strum(serialize = ".data")]
    Data,
    #[strum(serialize = ".bss")]
    Bss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Ctor,
    Dtor,
}

/// One discrepancy between a reference DLL and a candidate DLL.
///
/// `expected` is always the reference side and `found` the candidate side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiffReport {
    SectionOffset {
        section: Section,
        expected: i64,
        found: i64,
    },
    EntryPointOffset {
        entry_point: EntryPoint,
        expected: i64,
        found: i64,
    },
    ExportCount {
        expected: i64,
        found: i64,
    },
    /// First export slot whose offset differs
    Export {
        index: usize,
        expected: i64,
        found: i64,
    },
    SectionSize {
        section: Section,
        expected: i64,
        found: i64,
    },
    /// First differing byte, `offset` relative to the start of the section
    SectionContent {
        section: Section,
        offset: usize,
        expected: u8,
        found: u8,
    },
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionOffset {
                section,
                expected,
                found,
            } => write!(
                f,
                "{} offset mismatch: expected {}, found {}",
                section,
                Hex(*expected),
                Hex(*found)
            ),
            Self::EntryPointOffset {
                entry_point,
                expected,
                found,
            } => write!(
                f,
                "{} offset mismatch: expected {}, found {}",
                entry_point,
                Hex(*expected),
                Hex(*found)
            ),
            Self::ExportCount { expected, found } => write!(
                f,
                "Export count mismatch: expected {}, found {}",
                Hex(*expected),
                Hex(*found)
            ),
            Self::Export {
                index,
                expected,
                found,
            } => write!(
                f,
                "First export mismatch at idx {}: expected {}, found {}",
                index,
                Hex(*expected),
                Hex(*found)
            ),
            Self::SectionSize {
                section,
                expected,
                found,
            } => write!(
                f,
                "{} size mismatch: expected {}, found {}",
                section,
                Hex(*expected),
                Hex(*found)
            ),
            Self::SectionContent {
                section,
                offset,
                expected,
                found,
            } => write!(
                f,
                "First {} mismatch at {}+{:#x}: expected {:#x}, found {:#x}",
                section, section, offset, expected, found
            ),
        }
    }
}

/// Signed hex with a `0x` prefix; negative values print as `-0x..`
#[derive(Debug, Clone, Copy)]
pub struct Hex(pub i64);

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{:#x}", self.0.unsigned_abs())
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}
