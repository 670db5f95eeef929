use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::state::State;

/// Adds an empty source link for the edit form to fill in.
pub fn append(state: &mut State, name: &str) -> Result<CmdResult> {
    let print = state.prints.require_mut(name)?;
    print.append_source_link();
    print.write()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Added a source link to '{}'",
        print.title
    )));
    Ok(result.with_affected_print(print.clone()))
}

pub fn delete(state: &mut State, name: &str, number: usize) -> Result<CmdResult> {
    let print = state.prints.require_mut(name)?;
    let link = print.delete_source_link(number)?;
    print.write()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Removed source link {} from '{}'",
        if link.url.is_empty() { "(empty)" } else { &link.url },
        print.title
    )));
    Ok(result.with_affected_print(print.clone()))
}
