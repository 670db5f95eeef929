use crate::commands::CmdResult;
use crate::error::Result;
use crate::state::{PrintFilter, PrintOrder, SortDirection, State};

pub fn run(
    state: &State,
    order: PrintOrder,
    direction: SortDirection,
    filter: PrintFilter,
) -> Result<CmdResult> {
    let prints = state
        .get_prints(order, direction, filter)?
        .into_iter()
        .cloned()
        .collect();
    Ok(CmdResult::default()
        .with_listed_prints(prints)
        .with_summary(state.summary()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, NewPrint};
    use crate::commands::record;
    use crate::model::PrintStatus;
    use tempfile::TempDir;

    #[test]
    fn lists_filtered_prints_with_summary() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add::run(&mut state, NewPrint::titled("Cube")).unwrap();
        add::run(&mut state, NewPrint::titled("Vase")).unwrap();
        record::run(&mut state, "vase", PrintStatus::Success).unwrap();

        let result = run(
            &state,
            PrintOrder::Name,
            SortDirection::Asc,
            PrintFilter::Printed,
        )
        .unwrap();
        assert_eq!(result.listed_prints.len(), 1);
        assert_eq!(result.listed_prints[0].name, "vase");
        assert_eq!(result.summary.unwrap().total_count, 1);
    }
}
