//! Everything known under one root: the print store, the material registry
//! and the investment ledger, plus the totals and sorted views built on them.

use crate::codec;
use crate::error::Result;
use crate::format::format_iso_duration;
use crate::investment::{Investment, InvestmentLedger};
use crate::material::{Material, MaterialRegistry};
use crate::model::Print;
use crate::store::PrintStore;
use chrono::TimeDelta;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

pub const INVESTMENTS_FILE: &str = "investments.toml";
pub const MATERIALS_FILE: &str = "materials.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintOrder {
    #[default]
    CreatedAt,
    Count,
    Name,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintFilter {
    #[default]
    All,
    Printed,
    Unprinted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialOrder {
    #[default]
    Name,
    Unit,
    PricePerUnit,
}

impl PrintOrder {
    pub const ALL: [PrintOrder; 4] = [
        PrintOrder::CreatedAt,
        PrintOrder::Count,
        PrintOrder::Name,
        PrintOrder::Saved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrintOrder::CreatedAt => "created_at",
            PrintOrder::Count => "count",
            PrintOrder::Name => "name",
            PrintOrder::Saved => "saved",
        }
    }

    fn compare(&self, a: &Print, b: &Print) -> Ordering {
        match self {
            PrintOrder::CreatedAt => a.created_at.cmp(&b.created_at),
            PrintOrder::Count => a.count().cmp(&b.count()),
            PrintOrder::Name => a.title.cmp(&b.title),
            PrintOrder::Saved => a.total_saved().total_cmp(&b.total_saved()),
        }
    }
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Applies the direction to an ascending comparison.
    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl PrintFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrintFilter::All => "all",
            PrintFilter::Printed => "printed",
            PrintFilter::Unprinted => "unprinted",
        }
    }

    pub fn matches(&self, print: &Print) -> bool {
        match self {
            PrintFilter::All => true,
            PrintFilter::Printed => print.count() > 0,
            PrintFilter::Unprinted => print.count() == 0,
        }
    }
}

impl MaterialOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialOrder::Name => "name",
            MaterialOrder::Unit => "unit",
            MaterialOrder::PricePerUnit => "price_per_unit",
        }
    }

    fn compare(&self, a: &Material, b: &Material) -> Ordering {
        match self {
            MaterialOrder::Name => a.name.cmp(&b.name),
            MaterialOrder::Unit => a.unit.cmp(&b.unit),
            MaterialOrder::PricePerUnit => a.price_per_unit.total_cmp(&b.price_per_unit),
        }
    }
}

macro_rules! text_enum {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        let options: Vec<&str> = [$($variant.as_str()),+].to_vec();
                        format!("Invalid {} '{}', expected one of: {}", $kind, s, options.join(", "))
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

text_enum!(
    PrintOrder,
    "order",
    [
        PrintOrder::CreatedAt,
        PrintOrder::Count,
        PrintOrder::Name,
        PrintOrder::Saved
    ]
);
text_enum!(SortDirection, "direction", [SortDirection::Asc, SortDirection::Desc]);
text_enum!(
    PrintFilter,
    "filter",
    [PrintFilter::All, PrintFilter::Printed, PrintFilter::Unprinted]
);
text_enum!(
    MaterialOrder,
    "order",
    [
        MaterialOrder::Name,
        MaterialOrder::Unit,
        MaterialOrder::PricePerUnit
    ]
);

/// Every aggregate shown on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_investment: f64,
    pub total_reference_cost: f64,
    pub total_weight: f64,
    pub total_cost: f64,
    #[serde(serialize_with = "serialize_duration")]
    pub total_print_time: TimeDelta,
    pub total_count: usize,
    pub total_printed_weight: f64,
    pub total_printed_cost: f64,
    pub total_saved: f64,
    pub grand_total_saved: f64,
}

fn serialize_duration<S: Serializer>(
    duration: &TimeDelta,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_iso_duration(duration))
}

#[derive(Debug)]
pub struct State {
    root: PathBuf,
    pub prints: PrintStore,
    pub investments: Vec<Investment>,
    pub materials: MaterialRegistry,
}

impl State {
    /// Scans the prints under `root`, optionally reading the investment ledger
    /// and material registry. Both default to empty when their file is absent.
    pub fn collect(
        root: impl Into<PathBuf>,
        read_investments: bool,
        read_materials: bool,
    ) -> Result<Self> {
        let root = root.into();
        let prints = PrintStore::collect(&root)?;

        let investments = if read_investments {
            codec::load(&investments_path(&root), Some(InvestmentLedger::default()))?.0
        } else {
            Vec::new()
        };

        let materials = if read_materials {
            codec::load(&materials_path(&root), Some(MaterialRegistry::new()))?
        } else {
            MaterialRegistry::new()
        };

        debug!(
            root = %root.display(),
            prints = prints.len(),
            materials = materials.len(),
            investments = investments.len(),
            "collected state"
        );
        Ok(Self {
            root,
            prints,
            investments,
            materials,
        })
    }

    pub fn collect_all(root: impl Into<PathBuf>) -> Result<Self> {
        Self::collect(root, true, true)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write_materials(&self) -> Result<()> {
        codec::save(&materials_path(&self.root), &self.materials)
    }

    /// Filtered prints, sorted by `order`. Ties keep directory-listing order
    /// in either direction.
    pub fn get_prints(
        &self,
        order: PrintOrder,
        direction: SortDirection,
        filter: PrintFilter,
    ) -> Result<Vec<&Print>> {
        let mut prints: Vec<&Print> = self
            .prints
            .all()?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        prints.sort_by(|a, b| direction.apply(order.compare(a, b)));
        Ok(prints)
    }

    pub fn get_materials(&self, order: MaterialOrder, direction: SortDirection) -> Vec<&Material> {
        let mut materials: Vec<&Material> = self.materials.values().collect();
        materials.sort_by(|a, b| direction.apply(order.compare(a, b)));
        materials
    }

    pub fn material_names(&self) -> String {
        self.materials.names().collect::<Vec<_>>().join(", ")
    }

    pub fn total_investment(&self) -> f64 {
        self.investments.iter().map(|i| i.cost).sum()
    }

    pub fn total_reference_cost(&self) -> Result<f64> {
        self.sum(|p| p.reference_cost)
    }

    pub fn total_weight(&self) -> Result<f64> {
        self.sum(Print::weight)
    }

    pub fn total_cost(&self) -> Result<f64> {
        self.sum(Print::cost)
    }

    /// Sum of every print's duration, saturating at `TimeDelta::MAX`.
    pub fn total_print_time(&self) -> Result<TimeDelta> {
        let mut total = TimeDelta::zero();
        for print in self.prints.all()? {
            total = match total.checked_add(&print.duration) {
                Some(sum) => sum,
                None => {
                    warn!(print = %print.name, "total print time overflowed, saturating");
                    return Ok(if print.duration < TimeDelta::zero() {
                        TimeDelta::MIN
                    } else {
                        TimeDelta::MAX
                    });
                }
            };
        }
        Ok(total)
    }

    pub fn total_count(&self) -> Result<usize> {
        Ok(self.prints.all()?.iter().map(|p| p.count()).sum())
    }

    pub fn total_printed_weight(&self) -> Result<f64> {
        self.sum(Print::total_printed_weight)
    }

    pub fn total_printed_cost(&self) -> Result<f64> {
        self.sum(Print::total_printed_cost)
    }

    pub fn total_saved(&self) -> Result<f64> {
        self.sum(Print::total_saved)
    }

    /// Savings net of everything spent on equipment.
    pub fn grand_total_saved(&self) -> Result<f64> {
        Ok(self.total_saved()? - self.total_investment())
    }

    pub fn summary(&self) -> Result<Summary> {
        Ok(Summary {
            total_investment: self.total_investment(),
            total_reference_cost: self.total_reference_cost()?,
            total_weight: self.total_weight()?,
            total_cost: self.total_cost()?,
            total_print_time: self.total_print_time()?,
            total_count: self.total_count()?,
            total_printed_weight: self.total_printed_weight()?,
            total_printed_cost: self.total_printed_cost()?,
            total_saved: self.total_saved()?,
            grand_total_saved: self.grand_total_saved()?,
        })
    }

    fn sum(&self, value: impl Fn(&Print) -> f64) -> Result<f64> {
        Ok(self.prints.all()?.into_iter().map(value).sum())
    }
}

pub fn investments_path(root: &Path) -> PathBuf {
    root.join(INVESTMENTS_FILE)
}

pub fn materials_path(root: &Path) -> PathBuf {
    root.join(MATERIALS_FILE)
}
