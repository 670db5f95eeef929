//! Serializable page contexts. Values stay raw (numbers, ISO text); the
//! template filters do the formatting.

use crate::error::{PrintedError, Result};
use crate::format::{format_iso_duration, format_timestamp};
use crate::material::Material;
use crate::model::{Link, Print, PrintStatus};
use crate::state::{
    MaterialOrder, PrintFilter, PrintOrder, SortDirection, State, Summary,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    pub order: Option<String>,
    pub direction: Option<String>,
    pub filter: Option<String>,
}

impl ListQuery {
    pub fn parse<T: FromStr<Err = String>>(value: Option<&str>, default: T) -> Result<T> {
        match value.map(str::trim) {
            None | Some("") => Ok(default),
            Some(text) => text.parse().map_err(PrintedError::InvalidInput),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LinkView {
    pub number: usize,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct PrintMaterialView {
    pub material: String,
    pub unit_count: f64,
    pub price_per_unit: f64,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub number: usize,
    pub printed_on: String,
    pub status: PrintStatus,
}

#[derive(Debug, Serialize)]
pub struct FileView {
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PrintView {
    pub name: String,
    /// `name`, percent-encoded for use in URLs.
    pub url_name: String,
    pub title: String,
    pub reference_cost: f64,
    pub duration: String,
    pub created_at: String,
    pub count: usize,
    pub weight: f64,
    pub cost: f64,
    pub total_printed_weight: f64,
    pub total_printed_cost: f64,
    pub total_reference_cost: f64,
    pub total_saved: f64,
    pub last_printed_on: Option<String>,
    pub source_links: Vec<LinkView>,
    pub reference_links: Vec<LinkView>,
    pub materials: Vec<PrintMaterialView>,
    pub history: Vec<HistoryView>,
    pub files: Vec<FileView>,
}

impl PrintView {
    /// Everything but the mesh files, which need a directory listing.
    pub fn from_print(print: &Print) -> Self {
        Self {
            name: print.name.clone(),
            url_name: urlencoding::encode(&print.name).into_owned(),
            title: print.title.clone(),
            reference_cost: print.reference_cost,
            duration: format_iso_duration(&print.duration),
            created_at: format_timestamp(&print.created_at),
            count: print.count(),
            weight: print.weight(),
            cost: print.cost(),
            total_printed_weight: print.total_printed_weight(),
            total_printed_cost: print.total_printed_cost(),
            total_reference_cost: print.total_reference_cost(),
            total_saved: print.total_saved(),
            last_printed_on: print.history.first().map(|h| format_timestamp(&h.printed_on)),
            source_links: link_views(&print.source_links),
            reference_links: link_views(&print.reference_links),
            materials: print
                .materials
                .iter()
                .map(|m| PrintMaterialView {
                    material: m.material.clone(),
                    unit_count: m.unit_count,
                    price_per_unit: m.price_per_unit,
                    price: m.price(),
                })
                .collect(),
            history: print
                .history
                .iter()
                .enumerate()
                .map(|(i, h)| HistoryView {
                    number: i + 1,
                    printed_on: format_timestamp(&h.printed_on),
                    status: h.status,
                })
                .collect(),
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, print: &Print, root_path: &str) -> Result<Self> {
        let files = print
            .files()?
            .into_iter()
            .map(|file| {
                let filename = file.filename();
                FileView {
                    url: format!(
                        "{}/files/{}/{}",
                        root_path,
                        self.url_name,
                        urlencoding::encode(&filename)
                    ),
                    filename,
                }
            })
            .collect();
        self.files = files;
        Ok(self)
    }
}

fn link_views(links: &[Link]) -> Vec<LinkView> {
    links
        .iter()
        .enumerate()
        .map(|(i, link)| LinkView {
            number: i + 1,
            url: link.url.clone(),
            title: link.title.clone(),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub root_path: String,
    pub summary: Summary,
    pub prints: Vec<PrintView>,
    pub order: PrintOrder,
    pub direction: SortDirection,
    pub filter: PrintFilter,
    pub orders: Vec<&'static str>,
    pub filters: Vec<&'static str>,
}

impl IndexPage {
    pub fn build(state: &State, root_path: &str, query: &ListQuery) -> Result<Self> {
        let order = ListQuery::parse(query.order.as_deref(), PrintOrder::CreatedAt)?;
        let direction = ListQuery::parse(query.direction.as_deref(), SortDirection::Desc)?;
        let filter = ListQuery::parse(query.filter.as_deref(), PrintFilter::All)?;

        let prints = state
            .get_prints(order, direction, filter)?
            .into_iter()
            .map(PrintView::from_print)
            .collect();

        Ok(Self {
            root_path: root_path.to_string(),
            summary: state.summary()?,
            prints,
            order,
            direction,
            filter,
            orders: PrintOrder::ALL.iter().map(|o| o.as_str()).collect(),
            filters: vec![
                PrintFilter::All.as_str(),
                PrintFilter::Printed.as_str(),
                PrintFilter::Unprinted.as_str(),
            ],
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MaterialPage {
    pub root_path: String,
    pub materials: Vec<Material>,
    pub order: MaterialOrder,
    pub direction: SortDirection,
}

impl MaterialPage {
    pub fn build(state: &State, root_path: &str, query: &ListQuery) -> Result<Self> {
        let order = ListQuery::parse(query.order.as_deref(), MaterialOrder::Name)?;
        let direction = ListQuery::parse(query.direction.as_deref(), SortDirection::Asc)?;

        Ok(Self {
            root_path: root_path.to_string(),
            materials: state
                .get_materials(order, direction)
                .into_iter()
                .cloned()
                .collect(),
            order,
            direction,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PrintPage {
    pub root_path: String,
    pub print: PrintView,
}

impl PrintPage {
    pub fn build(state: &State, root_path: &str, name: &str) -> Result<Self> {
        let print = state.prints.require(name)?;
        Ok(Self {
            root_path: root_path.to_string(),
            print: PrintView::from_print(print).with_files(print, root_path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add::{self, NewPrint};
    use crate::commands::history;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn print_page_numbers_history_and_files() {
        let dir = TempDir::new().unwrap();
        let mut state = State::collect_all(dir.path()).unwrap();
        add::run(&mut state, NewPrint::titled("Tall Vase")).unwrap();
        history::append(&mut state, "tall_vase").unwrap();
        fs::write(dir.path().join("tall_vase").join("vase body.stl"), "").unwrap();

        let page = PrintPage::build(&state, "/prints", "tall_vase").unwrap();
        assert_eq!(page.print.history[0].number, 1);
        assert_eq!(page.print.files[0].filename, "vase body.stl");
        assert_eq!(
            page.print.files[0].url,
            "/prints/files/tall_vase/vase%20body.stl"
        );
        assert_eq!(page.print.duration, "PT0S");
    }

    #[test]
    fn index_page_rejects_unknown_order() {
        let dir = TempDir::new().unwrap();
        let state = State::collect_all(dir.path()).unwrap();
        let query = ListQuery {
            order: Some("weight".into()),
            ..ListQuery::default()
        };
        assert!(matches!(
            IndexPage::build(&state, "", &query),
            Err(PrintedError::InvalidInput(_))
        ));
    }
}
