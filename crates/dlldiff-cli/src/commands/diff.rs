//! Diff command implementation.

use anyhow::{Context, Result};
use dlldiff_core::{Dll, DllTab, Verdict, verdict};
use tracing::{debug, info, warn};

use crate::output::{DllResult, OutputFormat, print_json, print_text};
use crate::paths::{ProjectLayout, Source, read_required};

/// Both DLLS.tab files, loaded once per run
pub struct Tables {
    pub reference: DllTab,
    pub rebuilt: DllTab,
}

impl Tables {
    /// Load both tables. Any failure here aborts the whole run since no
    /// `.bss` size could be trusted.
    pub fn load(layout: &ProjectLayout) -> Result<Self> {
        let load = |source| -> Result<DllTab> {
            let path = layout.tab_path(source);
            let data = read_required(&path)?;
            DllTab::parse(&data).with_context(|| format!("Failed to parse {}", path.display()))
        };

        Ok(Self {
            reference: load(Source::Reference)?,
            rebuilt: load(Source::Rebuilt)?,
        })
    }
}

/// Run the diff command. Returns `true` when every DLL matched.
pub fn run(layout: &ProjectLayout, dlls: Vec<String>, format: OutputFormat) -> Result<bool> {
    // Matches are only worth printing when the DLLs were asked for by name
    let quiet_match = dlls.is_empty();
    let dlls = if quiet_match {
        layout.discover_dlls()?
    } else {
        dlls
    };

    if dlls.is_empty() {
        warn!("No DLLs to diff");
    }

    let tables = Tables::load(layout)?;
    info!(
        "Loaded DLLS.tab ({} original entries, {} rebuilt entries)",
        tables.reference.len(),
        tables.rebuilt.len()
    );

    let mut results = Vec::with_capacity(dlls.len());
    for id in dlls {
        let result = DllResult {
            outcome: check_dll(layout, &tables, &id),
            dll: id,
        };
        if let Err(e) = &result.outcome {
            warn!("DLL {} could not be checked: {}", result.dll, e);
        }
        if format == OutputFormat::Text {
            print_text(&result, quiet_match);
        }
        results.push(result);
    }

    if format == OutputFormat::Json {
        print_json(&results)?;
    }

    let all_ok = results.iter().all(DllResult::is_match);
    debug!("Checked {} DLLs, all matched: {}", results.len(), all_ok);
    Ok(all_ok)
}

/// Diff one DLL. Errors are scoped to this DLL; the caller moves on to the next.
pub fn check_dll(
    layout: &ProjectLayout,
    tables: &Tables,
    id: &str,
) -> dlldiff_core::Result<Verdict> {
    let reference_data = read_required(&layout.dll_path(Source::Reference, id))?;
    let rebuilt_data = read_required(&layout.dll_path(Source::Rebuilt, id))?;

    let reference_bss_size = tables.reference.bss_size(id)?;
    let rebuilt_bss_size = tables.rebuilt.bss_size(id)?;

    let reference = Dll::parse(&reference_data, id)?;
    let rebuilt = Dll::parse(&rebuilt_data, id)?;

    Ok(verdict(&reference, reference_bss_size, &rebuilt, rebuilt_bss_size))
}
