//! # dlldiff-core
//!
//! Core library for comparing a rebuilt DLL against the original.
//!
//! This crate provides:
//! - DLL file parsing (header, export table, relocation table, section layout)
//! - DLLS.tab parsing for the per-DLL `.bss` sizes
//! - An ordered structural diff between two DLLs
//! - A whole-file MD5 check layered on top of the structural diff
//!
//! Nothing here touches the filesystem; callers hand in byte buffers.

pub mod diff;
pub mod dll;
pub mod error;
pub mod tab;

pub use diff::{
    DiffReport, Diffs, EntryPoint, Hex, Section, Verdict, compare, md5_digest, verdict,
};
pub use dll::{Dll, DllHeader, DllRelocTable};
pub use error::{Error, Result};
pub use tab::{DllTab, DllTabEntry, parse_dll_number};
