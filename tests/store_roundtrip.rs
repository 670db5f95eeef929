use printed::api::{NewMaterial, NewPrint, PrintUpdate, PrintedApi};
use printed::error::PrintedError;
use printed::model::PrintStatus;
use printed::state::{PrintFilter, PrintOrder, SortDirection, State};
use std::fs;

fn seeded(root: &std::path::Path) -> PrintedApi {
    let mut api = PrintedApi::open_all(root).unwrap();
    api.add_material(NewMaterial {
        name: "PLA".into(),
        unit: "g".into(),
        price_per_unit: 0.02,
        bulk: None,
    })
    .unwrap();
    api
}

#[test]
fn test_prints_survive_a_fresh_state() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut api = seeded(temp_dir.path());
    api.add_print(NewPrint {
        reference_cost: 10.0,
        duration: "1h30m".into(),
        source_links: vec!["https://www.printables.com/model/1".into()],
        materials: vec!["PLA=100".into()],
        ..NewPrint::titled("Cube")
    })
    .unwrap();
    api.print_print("cube", PrintStatus::Success).unwrap();
    api.print_print("cube", PrintStatus::Failed).unwrap();
    let before = api.state().prints.require("cube").unwrap().clone();

    let reopened = PrintedApi::open_all(temp_dir.path()).unwrap();
    let after = reopened.state().prints.require("cube").unwrap();

    assert_eq!(after.title, before.title);
    assert_eq!(after.duration, before.duration);
    assert_eq!(after.materials, before.materials);
    assert_eq!(after.source_links[0].title, "www.printables.com");
    assert_eq!(after.count(), 2);
    assert_eq!(after.history[0].status, PrintStatus::Failed);
    assert_eq!(after.cost(), 2.0);
    assert_eq!(after.total_saved(), 16.0);
}

#[test]
fn test_hand_written_project_is_read() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path().join("benchy");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("project.toml"),
        r#"name = "benchy"
title = "Benchy"
reference_cost = 4.5
duration = "PT45M"

[[materials]]
material = "PLA"
unit_count = 15.0
price_per_unit = 0.02

[[history]]
printed_on = "2024-03-01T10:00:00+00:00"
status = "success"
"#,
    )
    .unwrap();

    let state = State::collect_all(temp_dir.path()).unwrap();
    let benchy = state.prints.require("benchy").unwrap();
    assert_eq!(benchy.count(), 1);
    assert!((benchy.cost() - 0.3).abs() < 1e-9);
    assert_eq!(benchy.duration.num_minutes(), 45);
}

#[test]
fn test_investments_reduce_grand_total() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("investments.toml"),
        r#"[[investment]]
description = "Printer"
cost = 5.0
"#,
    )
    .unwrap();
    let mut api = seeded(temp_dir.path());
    api.add_print(NewPrint {
        reference_cost: 10.0,
        materials: vec!["PLA=100".into()],
        ..NewPrint::titled("Cube")
    })
    .unwrap();
    api.print_print("cube", PrintStatus::Success).unwrap();

    let summary = api.state().summary().unwrap();
    assert_eq!(summary.total_investment, 5.0);
    assert_eq!(summary.total_saved, 8.0);
    assert_eq!(summary.grand_total_saved, 3.0);
}

#[test]
fn test_listing_is_a_filtered_permutation() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut api = seeded(temp_dir.path());
    for title in ["Cube", "Vase", "Hook"] {
        api.add_print(NewPrint::titled(title)).unwrap();
    }
    api.print_print("hook", PrintStatus::Success).unwrap();

    let all = api
        .list_prints(PrintOrder::Name, SortDirection::Asc, PrintFilter::All)
        .unwrap();
    let names: Vec<&str> = all.listed_prints.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["cube", "hook", "vase"]);

    let printed = api
        .list_prints(PrintOrder::Count, SortDirection::Desc, PrintFilter::Printed)
        .unwrap();
    assert_eq!(printed.listed_prints.len(), 1);
    assert_eq!(printed.listed_prints[0].name, "hook");
}

#[test]
fn test_update_and_position_edits_persist() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut api = seeded(temp_dir.path());
    api.add_print(NewPrint::titled("Cube")).unwrap();
    api.append_history("cube").unwrap();
    api.update_print(
        "cube",
        PrintUpdate {
            reference_cost: 7.0,
            duration: "2h".into(),
            source_links: vec![("https://example.com/cube".into(), "Cube page".into())],
        },
    )
    .unwrap();

    let err = api.delete_history("cube", 3).unwrap_err();
    assert!(matches!(err, PrintedError::IndexOutOfRange { .. }));
    api.delete_history("cube", 1).unwrap();

    let state = State::collect_all(temp_dir.path()).unwrap();
    let cube = state.prints.require("cube").unwrap();
    assert_eq!(cube.reference_cost, 7.0);
    assert_eq!(cube.duration.num_hours(), 2);
    assert_eq!(cube.source_links[0].title, "Cube page");
    assert!(cube.history.is_empty());
}

#[test]
fn test_materials_file_round_trips() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut api = seeded(temp_dir.path());
    api.remove_material("PLA").unwrap();
    api.add_material(NewMaterial {
        name: "PETG".into(),
        unit: "g".into(),
        price_per_unit: 0.0,
        bulk: Some(printed::api::BulkPrice {
            price: 25.0,
            quantity: 1.0,
        }),
    })
    .unwrap();

    let state = State::collect_all(temp_dir.path()).unwrap();
    assert_eq!(state.material_names(), "PETG");
    let petg = state.materials.get("PETG").unwrap();
    assert!((petg.price_per_unit - 0.025).abs() < 1e-12);
}
