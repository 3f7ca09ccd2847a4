//! Result rendering for the diff command.

use std::io::IsTerminal;

use anyhow::Result;
use clap::ValueEnum;
use dlldiff_core::{Error, Verdict};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per discrepancy
    Text,
    /// JSON array with one object per DLL
    Json,
}

#[derive(Debug)]
pub struct DllResult {
    pub dll: String,
    pub outcome: std::result::Result<Verdict, Error>,
}

impl DllResult {
    pub fn is_match(&self) -> bool {
        matches!(&self.outcome, Ok(verdict) if verdict.is_match())
    }

    pub fn status(&self) -> &'static str {
        match &self.outcome {
            Ok(Verdict::Match) => "ok",
            Ok(Verdict::Mismatch { .. }) => "mismatch",
            Ok(Verdict::HashMismatch { .. }) => "hash_mismatch",
            Err(_) => "error",
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match &self.outcome {
            Ok(verdict) => verdict.lines(),
            Err(e) => vec![format!("ERR: {}", e)],
        }
    }
}

/// JSON form of one result. A checked DLL carries its structured `verdict`;
/// a DLL that could not be checked carries the `error` message instead.
#[derive(Debug, Serialize)]
pub struct DllResultJson<'a> {
    pub dll: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<&'a Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a DllResult> for DllResultJson<'a> {
    fn from(result: &'a DllResult) -> Self {
        let (verdict, error) = match &result.outcome {
            Ok(verdict) => (Some(verdict), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            dll: &result.dll,
            status: result.status(),
            verdict,
            error,
        }
    }
}

/// Text lines for one DLL. Empty when it matched and `quiet_match` is set.
pub fn format_text(result: &DllResult, quiet_match: bool, color: bool) -> Vec<String> {
    if result.is_match() {
        if quiet_match {
            return Vec::new();
        }
        let ok = if color {
            "OK.".green().to_string()
        } else {
            "OK.".to_string()
        };
        return vec![format!("DLL {}: {}", result.dll, ok)];
    }

    let mut lines = vec![format!("DLL {}:", result.dll)];
    for line in result.lines() {
        if color && result.outcome.is_err() {
            lines.push(line.red().to_string());
        } else {
            lines.push(line);
        }
    }
    lines
}

pub fn print_text(result: &DllResult, quiet_match: bool) {
    let color = std::io::stdout().is_terminal();
    for line in format_text(result, quiet_match, color) {
        println!("{}", line);
    }
}

pub fn print_json(results: &[DllResult]) -> Result<()> {
    let json: Vec<DllResultJson> = results.iter().map(DllResultJson::from).collect();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlldiff_core::{DiffReport, Section};
    use std::path::PathBuf;

    fn mismatch() -> DllResult {
        DllResult {
            dll: "7".to_string(),
            outcome: Ok(Verdict::Mismatch {
                diffs: vec![
                    DiffReport::SectionOffset {
                        section: Section::Data,
                        expected: 0x200,
                        found: 0x204,
                    },
                    DiffReport::SectionSize {
                        section: Section::Bss,
                        expected: 0x10,
                        found: 0x0,
                    },
                ],
            }),
        }
    }

    #[test]
    fn test_format_match() {
        let result = DllResult {
            dll: "3".to_string(),
            outcome: Ok(Verdict::Match),
        };

        assert_eq!(format_text(&result, false, false), vec!["DLL 3: OK."]);
        assert!(format_text(&result, true, false).is_empty());
    }

    #[test]
    fn test_format_mismatch() {
        assert_eq!(
            format_text(&mismatch(), true, false),
            vec![
                "DLL 7:",
                ".data offset mismatch: expected 0x200, found 0x204",
                ".bss size mismatch: expected 0x10, found 0x0",
            ]
        );
    }

    #[test]
    fn test_format_error() {
        let result = DllResult {
            dll: "9".to_string(),
            outcome: Err(Error::MissingFile {
                path: PathBuf::from("/p/bin/assets/dlls/9.dll"),
            }),
        };

        assert_eq!(result.status(), "error");
        assert_eq!(
            format_text(&result, false, false),
            vec!["DLL 9:", "ERR: File not found @ /p/bin/assets/dlls/9.dll"]
        );
    }

    #[test]
    fn test_json() {
        let result = mismatch();
        let json = serde_json::to_value(DllResultJson::from(&result)).unwrap();

        assert_eq!(json["dll"], "7");
        assert_eq!(json["status"], "mismatch");
        assert!(json.get("error").is_none());

        let diffs = json["verdict"]["diffs"].as_array().unwrap();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0]["kind"], "section_offset");
        assert_eq!(diffs[0]["section"], "data");
        assert_eq!(diffs[0]["expected"], 0x200);
        assert_eq!(diffs[0]["found"], 0x204);
        assert_eq!(diffs[1]["kind"], "section_size");
        assert_eq!(diffs[1]["section"], "bss");
    }

    #[test]
    fn test_json_hash_mismatch() {
        let result = DllResult {
            dll: "4".to_string(),
            outcome: Ok(Verdict::HashMismatch {
                expected: "aa".to_string(),
                found: "bb".to_string(),
            }),
        };
        let json = serde_json::to_value(DllResultJson::from(&result)).unwrap();

        assert_eq!(json["status"], "hash_mismatch");
        assert_eq!(json["verdict"]["expected"], "aa");
        assert_eq!(json["verdict"]["found"], "bb");
    }

    #[test]
    fn test_json_error() {
        let result = DllResult {
            dll: "9".to_string(),
            outcome: Err(Error::InvalidDllId("x".to_string())),
        };
        let json = serde_json::to_value(DllResultJson::from(&result)).unwrap();

        assert_eq!(json["status"], "error");
        assert!(json.get("verdict").is_none());
        assert_eq!(json["error"], "Invalid DLL number: \"x\"");
    }
}
