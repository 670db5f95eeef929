//! # Print Store
//!
//! The store knows every print directory under the root but only parses a
//! print's `project.toml` the first time that print is asked for. Parsed
//! prints stay cached for the lifetime of the store.
//!
//! Each directory name gets a slot holding the print directory and a
//! [`OnceCell`] that is filled on first access. Iteration follows the order
//! the directory listing returned; the store never sorts.
//!
//! - [`PrintStore::add`] caches a new print without touching the disk. Call
//!   [`PrintStore::write`] to persist it.
//! - [`PrintStore::invalidate`] forgets every parsed print, so the next access
//!   re-reads from disk.
//! - [`PrintStore::refresh`] re-scans the root. Loaded prints whose directory
//!   still exists are kept; entries whose directory is gone are dropped.

use crate::error::{PrintedError, Result};
use crate::model::{Print, SETTINGS_FILE};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

#[derive(Debug)]
struct PrintSlot {
    path: PathBuf,
    print: OnceCell<Print>,
}

impl PrintSlot {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            print: OnceCell::new(),
        }
    }
}

#[derive(Debug)]
pub struct PrintStore {
    root: PathBuf,
    order: Vec<String>,
    slots: HashMap<String, PrintSlot>,
}

impl PrintStore {
    /// Scans `root` for print directories, creating `root` if needed.
    pub fn collect(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root)?;
        }

        let mut store = Self {
            root,
            order: Vec::new(),
            slots: HashMap::new(),
        };
        store.refresh()?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn refresh(&mut self) -> Result<()> {
        let mut order = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                order.push(name.to_string());
            }
        }

        let mut slots = HashMap::with_capacity(order.len());
        for name in &order {
            let slot = self
                .slots
                .remove(name)
                .unwrap_or_else(|| PrintSlot::new(self.root.join(name)));
            slots.insert(name.clone(), slot);
        }

        debug!(
            root = %self.root.display(),
            prints = order.len(),
            dropped = self.slots.len(),
            "scanned print directories"
        );
        self.order = order;
        self.slots = slots;
        Ok(())
    }

    pub fn invalidate(&mut self) {
        for slot in self.slots.values_mut() {
            slot.print = OnceCell::new();
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in directory-listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Loads the print on first access. Unknown names give `None`.
    pub fn get(&self, name: &str) -> Result<Option<&Print>> {
        let Some(slot) = self.slots.get(name) else {
            return Ok(None);
        };
        slot.print
            .get_or_try_init(|| {
                trace!(print = name, "loading print");
                Print::collect(&self.root, name)
            })
            .map(Some)
    }

    /// Like [`get`](Self::get), but unknown names are a `NotFound` error.
    pub fn require(&self, name: &str) -> Result<&Print> {
        self.get(name)?.ok_or_else(|| not_found(&self.order, name))
    }

    pub fn require_mut(&mut self, name: &str) -> Result<&mut Print> {
        let Some(slot) = self.slots.get_mut(name) else {
            return Err(not_found(&self.order, name));
        };
        load_slot(&self.root, slot, name)
    }

    /// Every print in listing order, loading as needed.
    pub fn all(&self) -> Result<Vec<&Print>> {
        self.order
            .iter()
            .map(|name| self.require(name))
            .collect()
    }

    /// Caches `print` under its name, pointing it at `<root>/<name>`.
    pub fn add(&mut self, mut print: Print) {
        let name = print.name.clone();
        let path = self.root.join(&name);
        print.path = path.clone();

        if !self.slots.contains_key(&name) {
            self.order.push(name.clone());
        }
        let slot = PrintSlot {
            path,
            print: OnceCell::with_value(print),
        };
        self.slots.insert(name, slot);
    }

    pub fn write(&self, name: &str) -> Result<()> {
        self.require(name)?.write()
    }
}

fn load_slot<'a>(root: &Path, slot: &'a mut PrintSlot, name: &str) -> Result<&'a mut Print> {
    if slot.print.get().is_none() {
        trace!(print = name, "loading print");
        let print = Print::collect(root, name)?;
        let _ = slot.print.set(print);
    }
    slot.print
        .get_mut()
        .ok_or_else(|| PrintedError::MissingFile(slot.path.join(SETTINGS_FILE)))
}

fn not_found(order: &[String], name: &str) -> PrintedError {
    PrintedError::NotFound {
        kind: "Print",
        name: name.to_string(),
        available: order.join(", "),
    }
}
