use anyhow::{Context as _, Result};
use log::{debug, error};

use crate::filter::{display_items, DisplayItem};
use crate::process::{collect_processes, ProcessSource};

pub const PLACEHOLDER: &str = "Pick the process to attach to";

/// Shown when listing or presenting fails. The placeholder is never filled in;
/// the actual error goes to the log.
pub const FAILURE_MESSAGE: &str = "Process picker failed ({0})";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOptions {
    pub placeholder: String,
    /// Let the filter text match the description, not just the label
    pub match_on_description: bool,
    /// Let the filter text match the detail line
    pub match_on_detail: bool,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            placeholder: PLACEHOLDER.to_string(),
            match_on_description: true,
            match_on_detail: true,
        }
    }
}

/// Blocking single-choice list.
pub trait Selector {
    /// Returns the index into `items` of the chosen entry, `None` if the user cancelled.
    fn select(&mut self, items: &[DisplayItem], options: &PickOptions) -> Result<Option<usize>>;
}

pub trait Notifier {
    /// Show `message` to the user and return once it has been dismissed.
    fn show_error(&mut self, message: &str, modal: bool);
}

/// Enumerate once and keep the cells processes, ordered by pid.
pub fn list_processes<S: ProcessSource + ?Sized>(source: &S) -> Result<Vec<DisplayItem>> {
    let records = collect_processes(source)?;
    let items = display_items(&records);
    debug!("{} of {} processes can be attached to", items.len(), records.len());
    Ok(items)
}

fn present<U: Selector + ?Sized>(items: &[DisplayItem], ui: &mut U) -> Result<Option<String>> {
    let chosen = ui
        .select(items, &PickOptions::default())
        .context("Selection prompt failed")?;

    match chosen {
        Some(idx) => items
            .get(idx)
            .map(|item| Some(item.payload.clone()))
            .with_context(|| format!("Selected index {idx} out of range")),
        None => Ok(None),
    }
}

/// The picker command.
///
/// Resolves to the chosen process id as a decimal string, or `None` when the
/// launch should be aborted silently: the user cancelled, or something failed
/// and the user has already been told. Never returns an error.
pub fn pick_process<S, U>(source: &S, ui: &mut U) -> Option<String>
where
    S: ProcessSource + ?Sized,
    U: Selector + Notifier + ?Sized,
{
    let result = list_processes(source).and_then(|items| present(&items, &mut *ui));

    match result {
        Ok(Some(payload)) => {
            debug!("picked process {payload}");
            Some(payload)
        }
        Ok(None) => {
            debug!("process selection cancelled");
            None
        }
        Err(err) => {
            error!("Process picker failed: {err:#}");
            ui.show_error(FAILURE_MESSAGE, true);
            None
        }
    }
}
