use crate::commands::helpers::{links_from_urls, resolve_materials};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PrintedError, Result};
use crate::format::{parse_duration, slugify};
use crate::model::Print;
use crate::state::State;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct NewPrint {
    pub title: String,
    /// Directory name; derived from the title when absent.
    pub name: Option<String>,
    pub reference_cost: f64,
    pub duration: String,
    pub source_links: Vec<String>,
    pub reference_links: Vec<String>,
    /// `NAME=QUANTITY` pairs.
    pub materials: Vec<String>,
    /// Mesh files copied into the new print directory.
    pub files: Vec<PathBuf>,
    pub force: bool,
}

impl NewPrint {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

pub fn run(state: &mut State, new: NewPrint) -> Result<CmdResult> {
    let name = new
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| slugify(&new.title));
    validate_name(&name)?;

    if state.prints.contains(&name) && !new.force {
        return Err(PrintedError::NameCollision {
            kind: "Print",
            name: new.title,
        });
    }

    // Everything is validated before the store is touched.
    let materials = resolve_materials(state, &new.materials)?;
    let duration = parse_duration(&new.duration).map_err(PrintedError::InvalidInput)?;
    for file in &new.files {
        if !file.is_file() {
            return Err(PrintedError::InvalidInput(format!(
                "File '{}' does not exist",
                file.display()
            )));
        }
    }

    let mut print = Print::new(name.clone(), new.title);
    print.reference_cost = new.reference_cost;
    print.duration = duration;
    print.source_links = links_from_urls(&new.source_links);
    print.reference_links = links_from_urls(&new.reference_links);
    print.materials = materials;

    state.prints.add(print);
    state.prints.write(&name)?;
    let print = state.prints.require(&name)?.clone();

    let mut result = CmdResult::default();
    for file in &new.files {
        if let Some(file_name) = file.file_name() {
            fs::copy(file, print.path.join(file_name))?;
            result.add_message(CmdMessage::info(format!(
                "Copied {}",
                file_name.to_string_lossy()
            )));
        }
    }

    info!(print = %name, "added print");
    result.add_message(CmdMessage::success(format!(
        "Added print '{}' ({})",
        print.title, print.name
    )));
    Ok(result.with_affected_print(print))
}

/// A print name is the single directory that holds it under the root.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PrintedError::InvalidInput(
            "A print needs a non-empty title".to_string(),
        ));
    }
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(['/', '\\']) {
        return Err(PrintedError::InvalidInput(format!(
            "'{}' cannot be used as a print directory name",
            name
        )));
    }
    Ok(())
}
