use crate::error::{PrintedError, Result};
use crate::model::{Link, PrintMaterial};
use crate::state::State;

/// Splits a `NAME=QUANTITY` material argument.
pub fn parse_material_arg(arg: &str) -> Result<(String, f64)> {
    let (name, quantity) = arg.split_once('=').ok_or_else(|| {
        PrintedError::InvalidInput(format!(
            "Material '{}' must be given as NAME=QUANTITY",
            arg
        ))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(PrintedError::InvalidInput(format!(
            "Material '{}' has no name",
            arg
        )));
    }

    let quantity: f64 = quantity.trim().parse().map_err(|_| {
        PrintedError::InvalidInput(format!(
            "Material '{}' has a non-numeric quantity '{}'",
            name, quantity
        ))
    })?;

    Ok((name.to_string(), quantity))
}

/// Resolves every material argument against the registry, snapshotting the
/// current unit price. Fails on the first unknown name.
pub fn resolve_materials<S: AsRef<str>>(state: &State, args: &[S]) -> Result<Vec<PrintMaterial>> {
    args.iter()
        .map(|arg| {
            let (name, unit_count) = parse_material_arg(arg.as_ref())?;
            let material =
                state
                    .materials
                    .get(&name)
                    .ok_or_else(|| PrintedError::UnknownMaterial {
                        name: name.clone(),
                        available: state.material_names(),
                    })?;
            Ok(PrintMaterial {
                material: material.name.clone(),
                unit_count,
                price_per_unit: material.price_per_unit,
            })
        })
        .collect()
}

pub fn links_from_urls<S: AsRef<str>>(urls: &[S]) -> Vec<Link> {
    urls.iter().map(|url| Link::new(url.as_ref(), None)).collect()
}
