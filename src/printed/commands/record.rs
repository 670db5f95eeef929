use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::format::{now, slugify};
use crate::model::{PrintHistory, PrintStatus};
use crate::state::State;
use tracing::info;

/// Records one print attempt now. `name` may be given as a title.
pub fn run(state: &mut State, name: &str, status: PrintStatus) -> Result<CmdResult> {
    let name = slugify(name);
    let print = state.prints.require_mut(&name)?;
    print.append_history_entry(PrintHistory::new(now(), status));
    print.write()?;

    info!(print = %name, %status, count = print.count(), "recorded print");
    let mut result = CmdResult::default();
    let message = format!("Printed '{}' ({} so far)", print.title, print.count());
    result.add_message(match status {
        PrintStatus::Success => CmdMessage::success(message),
        PrintStatus::Failed => CmdMessage::warning(format!("{}, marked failed", message)),
    });
    Ok(result.with_affected_print(print.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, NewPrint};
    use crate::error::PrintedError;
    use tempfile::TempDir;

    #[test]
    fn appends_history_most_recent_first() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add::run(&mut state, NewPrint::titled("Cube")).unwrap();

        run(&mut state, "cube", PrintStatus::Failed).unwrap();
        run(&mut state, "Cube", PrintStatus::Success).unwrap();

        let reloaded = State::collect_all(dir.path()).unwrap();
        let history = &reloaded.prints.require("cube").unwrap().history;
        assert_eq!(history.len(), 2);
        assert!(history[0].printed_on >= history[1].printed_on);
        assert_eq!(history[0].status, PrintStatus::Success);
    }

    #[test]
    fn unknown_print_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        let err = run(&mut state, "ghost", PrintStatus::Success).unwrap_err();
        assert!(matches!(err, PrintedError::NotFound { .. }));
    }
}
