use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::state::State;

pub fn append(state: &mut State, name: &str) -> Result<CmdResult> {
    let print = state.prints.require_mut(name)?;
    print.append_history();
    print.write()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Recorded a print of '{}'",
        print.title
    )));
    Ok(result.with_affected_print(print.clone()))
}

/// Deletes the `number`th (1-based) entry, most recent first.
pub fn delete(state: &mut State, name: &str, number: usize) -> Result<CmdResult> {
    let print = state.prints.require_mut(name)?;
    print.delete_history(number)?;
    print.write()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted history entry #{} of '{}'",
        number, print.title
    )));
    Ok(result.with_affected_print(print.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, NewPrint};
    use crate::error::PrintedError;
    use tempfile::TempDir;

    #[test]
    fn append_then_delete() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add::run(&mut state, NewPrint::titled("Cube")).unwrap();

        append(&mut state, "cube").unwrap();
        append(&mut state, "cube").unwrap();
        let result = delete(&mut state, "cube", 2).unwrap();
        assert_eq!(result.affected_prints[0].count(), 1);

        let reloaded = State::collect_all(dir.path()).unwrap();
        assert_eq!(reloaded.prints.require("cube").unwrap().count(), 1);
    }

    #[test]
    fn out_of_range_delete_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add::run(&mut state, NewPrint::titled("Cube")).unwrap();
        append(&mut state, "cube").unwrap();

        let err = delete(&mut state, "cube", 3).unwrap_err();
        assert!(matches!(err, PrintedError::IndexOutOfRange { .. }));
        assert_eq!(state.prints.require("cube").unwrap().count(), 1);
    }
}
