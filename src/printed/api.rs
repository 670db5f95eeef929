//! # API Facade
//!
//! A thin layer over the commands. `PrintedApi` owns the [`State`] collected
//! for one invocation and forwards each call to the matching command module,
//! parsing user-facing text (order names, material arguments) on the way in.
//!
//! Nothing here writes to the terminal. Callers get a [`CmdResult`] back and
//! decide how to show it.

use crate::commands;
use crate::error::Result;
use crate::model::PrintStatus;
use crate::state::{MaterialOrder, PrintFilter, PrintOrder, SortDirection, State};
use std::path::PathBuf;

pub struct PrintedApi {
    state: State,
}

impl PrintedApi {
    pub fn new(state: State) -> Self {
        Self { state }
    }

    /// Collects prints and materials under `root`. Investments are only read
    /// by [`open_all`](Self::open_all).
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(State::collect(root, false, true)?))
    }

    pub fn open_all(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(State::collect_all(root)?))
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn add_print(&mut self, new: NewPrint) -> Result<commands::CmdResult> {
        commands::add::run(&mut self.state, new)
    }

    pub fn remove_print(&mut self, name: &str) -> Result<commands::CmdResult> {
        commands::remove::run(&mut self.state, name)
    }

    pub fn list_prints(
        &self,
        order: PrintOrder,
        direction: SortDirection,
        filter: PrintFilter,
    ) -> Result<commands::CmdResult> {
        commands::list::run(&self.state, order, direction, filter)
    }

    pub fn print_print(&mut self, name: &str, status: PrintStatus) -> Result<commands::CmdResult> {
        commands::record::run(&mut self.state, name, status)
    }

    pub fn update_print(&mut self, name: &str, update: PrintUpdate) -> Result<commands::CmdResult> {
        commands::update::run(&mut self.state, name, update)
    }

    pub fn append_history(&mut self, name: &str) -> Result<commands::CmdResult> {
        commands::history::append(&mut self.state, name)
    }

    pub fn delete_history(&mut self, name: &str, number: usize) -> Result<commands::CmdResult> {
        commands::history::delete(&mut self.state, name, number)
    }

    pub fn append_source_link(&mut self, name: &str) -> Result<commands::CmdResult> {
        commands::links::append(&mut self.state, name)
    }

    pub fn delete_source_link(&mut self, name: &str, number: usize) -> Result<commands::CmdResult> {
        commands::links::delete(&mut self.state, name, number)
    }

    pub fn add_material(&mut self, new: NewMaterial) -> Result<commands::CmdResult> {
        commands::material::add(&mut self.state, new)
    }

    pub fn remove_material(&mut self, name: &str) -> Result<commands::CmdResult> {
        commands::material::remove(&mut self.state, name)
    }

    pub fn list_materials(
        &self,
        order: MaterialOrder,
        direction: SortDirection,
    ) -> commands::CmdResult {
        commands::material::list(&self.state, order, direction)
    }
}

pub use commands::add::NewPrint;
pub use commands::material::{BulkPrice, NewMaterial};
pub use commands::update::PrintUpdate;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
