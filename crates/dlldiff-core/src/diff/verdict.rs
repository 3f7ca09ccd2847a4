use serde::Serialize;
use tracing::debug;

use super::{DiffReport, compare};
use crate::dll::Dll;

/// Overall result of checking one DLL pair.
///
/// The structural pass runs first. Only when it finds nothing are the whole
/// files hashed, which catches bytes outside every checked section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    Match,
    Mismatch { diffs: Vec<DiffReport> },
    HashMismatch { expected: String, found: String },
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }

    /// Report lines, one per discrepancy
    pub fn lines(&self) -> Vec<String> {
        match self {
            Verdict::Match => Vec::new(),
            Verdict::Mismatch { diffs } => diffs.iter().map(ToString::to_string).collect(),
            Verdict::HashMismatch { expected, found } => {
                vec![format!("MD5 mismatch: expected {}, found {}", expected, found)]
            }
        }
    }
}

pub fn verdict(
    reference: &Dll,
    reference_bss_size: u32,
    candidate: &Dll,
    candidate_bss_size: u32,
) -> Verdict {
    let diffs: Vec<DiffReport> =
        compare(reference, reference_bss_size, candidate, candidate_bss_size).collect();
    if !diffs.is_empty() {
        debug!("DLL {}: {} structural differences", candidate.id(), diffs.len());
        return Verdict::Mismatch { diffs };
    }

    let expected = md5_digest(reference.data());
    let found = md5_digest(candidate.data());
    if expected == found {
        Verdict::Match
    } else {
        Verdict::HashMismatch { expected, found }
    }
}

/// Lowercase hex MD5 digest
pub fn md5_digest(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Section;
    use crate::dll::DllBuilder;

    #[test]
    fn test_md5_digest() {
        assert_eq!(md5_digest(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_digest(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_verdict_match() {
        let data = DllBuilder::new().text(&[1, 2, 3, 4]).build();
        let dll = Dll::parse(&data, "5").unwrap();

        let result = verdict(&dll, 0x10, &dll, 0x10);
        assert!(result.is_match());
        assert!(result.lines().is_empty());
    }

    #[test]
    fn test_verdict_mismatch() {
        let reference = DllBuilder::new().text(&[1, 2, 3, 4]).build();
        let candidate = DllBuilder::new().text(&[1, 2, 3, 5]).build();
        let r = Dll::parse(&reference, "5").unwrap();
        let c = Dll::parse(&candidate, "5").unwrap();

        let result = verdict(&r, 0, &c, 0);
        assert_eq!(
            result,
            Verdict::Mismatch {
                diffs: vec![DiffReport::SectionContent {
                    section: Section::Text,
                    offset: 3,
                    expected: 4,
                    found: 5,
                }]
            }
        );
    }

    #[test]
    fn test_verdict_hash_mismatch_outside_sections() {
        let reference = DllBuilder::new().text(&[1, 2, 3, 4]).build();
        let mut candidate = reference.clone();
        // Header padding after the export count isn't covered by any check
        candidate[0x0E] = 0xFF;
        let r = Dll::parse(&reference, "5").unwrap();
        let c = Dll::parse(&candidate, "5").unwrap();

        let result = verdict(&r, 0, &c, 0);
        let Verdict::HashMismatch { expected, found } = &result else {
            panic!("expected hash mismatch, got {:?}", result);
        };
        assert_ne!(expected, found);
        assert_eq!(
            result.lines(),
            vec![format!("MD5 mismatch: expected {}, found {}", expected, found)]
        );
    }
}
