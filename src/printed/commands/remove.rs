use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::state::State;
use tracing::info;

/// Marks a print as removed. Its directory and settings stay on disk.
pub fn run(state: &mut State, name: &str) -> Result<CmdResult> {
    let print = state.prints.require(name)?;
    print.delete();
    print.write()?;

    info!(print = %name, "remove requested");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::warning(format!(
        "Print '{}' was left in place; delete {} to remove it.",
        print.name,
        print.path.display()
    )));
    Ok(result.with_affected_print(print.clone()))
}
