//! Structural comparison of two DLLs
//!
//! Checks run in a fixed order: header offsets first, then export table,
//! then section sizes and contents. A section's bytes are only walked when
//! both sides agree on its size, and only the first mismatch is reported.

mod report;
mod verdict;

pub use report::{DiffReport, EntryPoint, Hex, Section};
pub use verdict::{Verdict, md5_digest, verdict};

use strum::{EnumIter, IntoEnumIterator};
use tracing::debug;

use crate::dll::Dll;

/// One side of a comparison: the parsed DLL plus its `.bss` size from DLLS.tab
#[derive(Debug, Clone, Copy)]
struct Side<'a> {
    dll: &'a Dll<'a>,
    bss_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
enum Check {
    TextOffset,
    RodataOffset,
    DataOffset,
    BssOffset,
    CtorOffset,
    DtorOffset,
    Exports,
    TextContent,
    RodataContent,
    DataContent,
    BssSize,
}

/// Compare a reference DLL against a candidate DLL.
///
/// The returned iterator runs each check as it is advanced; collecting it
/// yields every discrepancy in check order.
pub fn compare<'a>(
    reference: &'a Dll<'a>,
    reference_bss_size: u32,
    candidate: &'a Dll<'a>,
    candidate_bss_size: u32,
) -> Diffs<'a> {
    debug!(
        "Comparing DLL {} against DLL {}",
        reference.id(),
        candidate.id()
    );
    Diffs {
        reference: Side {
            dll: reference,
            bss_size: reference_bss_size,
        },
        candidate: Side {
            dll: candidate,
            bss_size: candidate_bss_size,
        },
        checks: Check::iter(),
    }
}

/// Ordered iterator over the discrepancies between two DLLs
pub struct Diffs<'a> {
    reference: Side<'a>,
    candidate: Side<'a>,
    checks: CheckIter,
}

impl Iterator for Diffs<'_> {
    type Item = DiffReport;

    fn next(&mut self) -> Option<DiffReport> {
        let (reference, candidate) = (self.reference, self.candidate);
        self.checks.find_map(|check| run_check(check, reference, candidate))
    }
}

fn run_check(check: Check, reference: Side, candidate: Side) -> Option<DiffReport> {
    let (r, c) = (reference.dll, candidate.dll);

    match check {
        Check::TextOffset => {
            section_offset(Section::Text, r.header.size.into(), c.header.size.into())
        }
        Check::RodataOffset => section_offset(
            Section::Rodata,
            r.header.rodata_offset.into(),
            c.header.rodata_offset.into(),
        ),
        Check::DataOffset => section_offset(
            Section::Data,
            r.header.data_offset.into(),
            c.header.data_offset.into(),
        ),
        Check::BssOffset => section_offset(Section::Bss, r.ram_size(), c.ram_size()),
        Check::CtorOffset => {
            entry_point_offset(EntryPoint::Ctor, r.header.ctor_offset, c.header.ctor_offset)
        }
        Check::DtorOffset => {
            entry_point_offset(EntryPoint::Dtor, r.header.dtor_offset, c.header.dtor_offset)
        }
        Check::Exports => compare_exports(r, c),
        Check::TextContent => compare_section(
            Section::Text,
            (r.data(), r.header.size.into(), r.text_size()),
            (c.data(), c.header.size.into(), c.text_size()),
        ),
        Check::RodataContent => compare_section(
            Section::Rodata,
            (r.data(), r.rodata_start(), r.rodata_size()),
            (c.data(), c.rodata_start(), c.rodata_size()),
        ),
        Check::DataContent => compare_section(
            Section::Data,
            (r.data(), r.header.data_offset.into(), r.data_size()),
            (c.data(), c.header.data_offset.into(), c.data_size()),
        ),
        Check::BssSize => (reference.bss_size != candidate.bss_size).then(|| {
            DiffReport::SectionSize {
                section: Section::Bss,
                expected: reference.bss_size.into(),
                found: candidate.bss_size.into(),
            }
        }),
    }
}

fn section_offset(section: Section, expected: i64, found: i64) -> Option<DiffReport> {
    (expected != found).then_some(DiffReport::SectionOffset {
        section,
        expected,
        found,
    })
}

fn entry_point_offset(entry_point: EntryPoint, expected: u32, found: u32) -> Option<DiffReport> {
    (expected != found).then_some(DiffReport::EntryPointOffset {
        entry_point,
        expected: expected.into(),
        found: found.into(),
    })
}

fn compare_exports(reference: &Dll, candidate: &Dll) -> Option<DiffReport> {
    let (expected, found) = (reference.header.export_count, candidate.header.export_count);
    if expected != found {
        return Some(DiffReport::ExportCount {
            expected: expected.into(),
            found: found.into(),
        });
    }

    reference
        .header
        .export_offsets
        .iter()
        .zip(&candidate.header.export_offsets)
        .position(|(r, c)| r != c)
        .map(|index| DiffReport::Export {
            index,
            expected: reference.header.export_offsets[index].into(),
            found: candidate.header.export_offsets[index].into(),
        })
}

/// `(file bytes, section start, section size)`
type SectionSpan<'a> = (&'a [u8], i64, i64);

fn compare_section(
    section: Section,
    (r_data, r_start, r_size): SectionSpan,
    (c_data, c_start, c_size): SectionSpan,
) -> Option<DiffReport> {
    if r_size != c_size {
        return Some(DiffReport::SectionSize {
            section,
            expected: r_size,
            found: c_size,
        });
    }

    let expected = section_bytes(r_data, r_start, r_size);
    let found = section_bytes(c_data, c_start, c_size);
    expected
        .iter()
        .zip(found)
        .position(|(r, c)| r != c)
        .map(|offset| DiffReport::SectionContent {
            section,
            offset,
            expected: expected[offset],
            found: found[offset],
        })
}

/// Bytes of a section. `Dll::parse` rejects sections that run past the end
/// of the file, so only inverted sections (negative size) come out empty.
fn section_bytes(data: &[u8], start: i64, size: i64) -> &[u8] {
    if start < 0 || size <= 0 {
        return &[];
    }
    let start = start as usize;
    data.get(start..start.saturating_add(size as usize))
        .unwrap_or_default()
}
