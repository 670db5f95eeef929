use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PrintedError, Result};
use crate::material::{Material, UNITS_PER_QUANTITY};
use crate::state::{MaterialOrder, SortDirection, State};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct NewMaterial {
    pub name: String,
    pub unit: String,
    pub price_per_unit: f64,
    /// Price of a bulk purchase and how many bulk units it holds. When set,
    /// the unit price is derived from it instead of `price_per_unit`.
    pub bulk: Option<BulkPrice>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulkPrice {
    pub price: f64,
    pub quantity: f64,
}

pub fn add(state: &mut State, new: NewMaterial) -> Result<CmdResult> {
    if state.materials.contains(&new.name) {
        return Err(PrintedError::NameCollision {
            kind: "Material",
            name: new.name,
        });
    }

    let material = match new.bulk {
        Some(bulk) if bulk.quantity > 0.0 => Material::from_bulk(
            new.name,
            new.unit,
            bulk.price,
            bulk.quantity,
            UNITS_PER_QUANTITY,
        ),
        Some(_) => {
            return Err(PrintedError::InvalidInput(
                "Bulk quantity must be greater than zero".to_string(),
            ))
        }
        None => Material::new(new.name, new.unit, new.price_per_unit),
    };

    state.materials.insert(material.clone());
    state.write_materials()?;

    info!(material = %material.name, price_per_unit = material.price_per_unit, "added material");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added material '{}'",
        material.name
    )));
    Ok(result.with_affected_material(material))
}

pub fn remove(state: &mut State, name: &str) -> Result<CmdResult> {
    let material = state
        .materials
        .remove(name)
        .ok_or_else(|| PrintedError::NotFound {
            kind: "Material",
            name: name.to_string(),
            available: state.material_names(),
        })?;
    state.write_materials()?;

    info!(material = %name, "removed material");
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Removed material '{}'",
        material.name
    )));
    Ok(result.with_affected_material(material))
}

pub fn list(state: &State, order: MaterialOrder, direction: SortDirection) -> CmdResult {
    let materials = state
        .get_materials(order, direction)
        .into_iter()
        .cloned()
        .collect();
    CmdResult::default().with_listed_materials(materials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pla() -> NewMaterial {
        NewMaterial {
            name: "PLA".into(),
            unit: "g".into(),
            price_per_unit: 0.02,
            bulk: None,
        }
    }

    #[test]
    fn add_persists_to_materials_file() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add(&mut state, pla()).unwrap();

        let reloaded = State::collect_all(dir.path()).unwrap();
        assert_eq!(reloaded.materials.get("PLA").unwrap().price_per_unit, 0.02);
    }

    #[test]
    fn add_collision_fails() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add(&mut state, pla()).unwrap();

        let err = add(&mut state, pla()).unwrap_err();
        assert_eq!(err.to_string(), "Material 'PLA' already exists.");
    }

    #[test]
    fn bulk_price_is_converted() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        let result = add(
            &mut state,
            NewMaterial {
                bulk: Some(BulkPrice {
                    price: 25.0,
                    quantity: 1.0,
                }),
                ..pla()
            },
        )
        .unwrap();
        assert!((result.affected_materials[0].price_per_unit - 0.025).abs() < 1e-12);
    }

    #[test]
    fn remove_missing_lists_names() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add(&mut state, pla()).unwrap();

        let err = remove(&mut state, "ABS").unwrap_err();
        assert_eq!(err.to_string(), "Material 'ABS' not found from: PLA.");

        remove(&mut state, "PLA").unwrap();
        let reloaded = State::collect_all(dir.path()).unwrap();
        assert!(reloaded.materials.is_empty());
    }

    #[test]
    fn list_is_sorted() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add(&mut state, pla()).unwrap();
        add(
            &mut state,
            NewMaterial {
                name: "ABS".into(),
                unit: "g".into(),
                price_per_unit: 0.03,
                bulk: None,
            },
        )
        .unwrap();

        let result = list(&state, MaterialOrder::PricePerUnit, SortDirection::Desc);
        let names: Vec<_> = result
            .listed_materials
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["ABS", "PLA"]);
    }
}
