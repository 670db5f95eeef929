//! # Printed Architecture
//!
//! Printed tracks 3D prints: what each one costs in material, what buying it
//! would have cost, and every time it was printed. Data lives in a directory
//! of plain TOML files that can be edited by hand or put under version control.
//!
//! The crate is a library with two clients, a CLI and a small web UI. Both go
//! through the same command layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)      Web (web/)               │
//! │  - argument parsing, tables        - axum routes, templates │
//! │  - exit codes                      - file watcher           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the State for one CLI invocation                    │
//! │  - Forwards to commands, returns CmdResult                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per user action, operating on &mut State      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  State (state.rs): PrintStore (store.rs), materials         │
//! │  Content codec (codec.rs): one typed value per TOML file    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## On-disk layout
//!
//! ```text
//! <root>/
//!   materials.toml        material name -> unit, price_per_unit
//!   investments.toml      [[investment]] description, cost
//!   <slug>/project.toml   one print
//!   <slug>/*.stl|3mf|obj  mesh files
//! ```
//!
//! A `State` is collected from a root path. Print directories are listed
//! eagerly but parsed lazily, then cached for as long as the `State` lives.
//! Mutations change the cached value and are written back explicitly.
//!
//! ## No I/O assumptions in the core
//!
//! From `api.rs` inward, code never writes to stdout or stderr and never
//! exits the process. Diagnostics go through `tracing`; the binary decides
//! where they end up.
//!
//! ## Module Overview
//!
//! - [`api`]: facade used by the CLI
//! - [`commands`]: business logic per action
//! - [`state`]: aggregates, sorting and filtering
//! - [`store`]: lazily loaded print collection
//! - [`model`]: `Print` and its parts
//! - [`material`], [`investment`]: the shared registry files
//! - [`codec`]: TOML load/save
//! - [`format`]: durations, timestamps, display helpers
//! - [`config`]: display settings and environment defaults
//! - [`web`]: HTTP interface
//! - [`error`]: error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod investment;
pub mod material;
pub mod model;
pub mod state;
pub mod store;
pub mod web;
