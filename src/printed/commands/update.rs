use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::state::State;
use tracing::info;

/// Editable fields of a print, as submitted by the edit form.
#[derive(Debug, Clone, Default)]
pub struct PrintUpdate {
    pub reference_cost: f64,
    pub duration: String,
    /// `(url, title)` pairs replacing the current source links.
    pub source_links: Vec<(String, String)>,
}

pub fn run(state: &mut State, name: &str, update: PrintUpdate) -> Result<CmdResult> {
    let print = state.prints.require_mut(name)?;
    print.update(update.reference_cost, &update.duration, update.source_links)?;
    print.write()?;

    info!(print = %name, "updated print");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Updated '{}'", print.title)));
    Ok(result.with_affected_print(print.clone()))
}
