//! Terminal output for command results.
//!
//! Tables are laid out in Rust with `unicode-width` so titles with wide
//! characters still line up. Colors come from `colored` for messages and
//! `console` styles for headers; both honour `--tty/--no-tty`.

use colored::Colorize;
use console::Style;
use printed::api::{CmdMessage, MessageLevel};
use printed::config::DisplayConfig;
use printed::format::{
    format_cost, format_datetime, format_duration, format_iso_duration, format_timestamp,
    format_weight, relative_datetime,
};
use printed::material::Material;
use printed::model::Print;
use printed::state::Summary;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Right,
}

struct Column {
    header: &'static str,
    align: Align,
}

const fn left(header: &'static str) -> Column {
    Column {
        header,
        align: Align::Left,
    }
}

const fn right(header: &'static str) -> Column {
    Column {
        header,
        align: Align::Right,
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}

fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(column.header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_style = Style::new().bold();
    let header = columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| {
            header_style
                .apply_to(pad(column.header, width, column.align))
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);

    let mut out = String::new();
    out.push_str(header.trim_end());
    out.push('\n');
    for row in rows {
        let line = columns
            .iter()
            .zip(&widths)
            .zip(row)
            .map(|((column, &width), cell)| pad(cell, width, column.align))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_print_list(
    prints: &[Print],
    summary: Option<&Summary>,
    display: &DisplayConfig,
) -> String {
    if prints.is_empty() {
        return "No prints found.\n".to_string();
    }

    let columns = [
        left("Name"),
        left("Title"),
        right("Count"),
        right("Weight"),
        right("Cost"),
        right("Saved"),
        left("Duration"),
        left("Last printed"),
    ];
    let rows: Vec<Vec<String>> = prints
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.title.clone(),
                p.count().to_string(),
                format_weight(p.weight()),
                format_cost(p.cost(), &display.cost_symbol),
                format_cost(p.total_saved(), &display.cost_symbol),
                format_duration(&p.duration),
                relative_datetime(p.history.first().map(|h| &h.printed_on)),
            ]
        })
        .collect();

    let mut out = render_table(&columns, &rows);
    if let Some(summary) = summary {
        out.push('\n');
        out.push_str(&render_summary(summary, display));
    }
    out
}

fn render_summary(summary: &Summary, display: &DisplayConfig) -> String {
    let cost = |v: f64| format_cost(v, &display.cost_symbol);
    let lines = [
        ("Prints recorded", summary.total_count.to_string()),
        ("Print time", format_duration(&summary.total_print_time)),
        ("Material printed", format_weight(summary.total_printed_weight)),
        ("Material cost", cost(summary.total_printed_cost)),
        ("Saved", cost(summary.total_saved)),
        ("Investments", cost(summary.total_investment)),
        ("Net saved", cost(summary.grand_total_saved)),
    ];
    let label_width = lines.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
    let label_style = Style::new().dim();
    lines
        .iter()
        .map(|(label, value)| {
            format!(
                "{}  {}\n",
                label_style.apply_to(pad(label, label_width, Align::Left)),
                value
            )
        })
        .collect()
}

pub fn render_material_list(materials: &[Material], display: &DisplayConfig) -> String {
    if materials.is_empty() {
        return "No materials found.\n".to_string();
    }
    let columns = [left("Name"), left("Unit"), right("Price per unit")];
    let rows: Vec<Vec<String>> = materials
        .iter()
        .map(|m| {
            vec![
                m.name.clone(),
                m.unit.clone(),
                format!("{}{}", display.cost_symbol, m.price_per_unit),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}

/// One print as emitted by `print list --json`.
#[derive(Debug, Serialize)]
pub struct PrintRow<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub count: usize,
    pub weight: f64,
    pub cost: f64,
    pub reference_cost: f64,
    pub total_saved: f64,
    pub duration: String,
    pub created_at: String,
    pub last_printed_on: Option<String>,
}

impl<'a> PrintRow<'a> {
    fn new(print: &'a Print, display: &DisplayConfig) -> Self {
        Self {
            name: &print.name,
            title: &print.title,
            count: print.count(),
            weight: print.weight(),
            cost: print.cost(),
            reference_cost: print.reference_cost,
            total_saved: print.total_saved(),
            duration: format_iso_duration(&print.duration),
            created_at: format_timestamp(&print.created_at),
            last_printed_on: print
                .history
                .first()
                .map(|h| format_datetime(Some(&h.printed_on), &display.timezone)),
        }
    }
}

#[derive(Serialize)]
struct PrintListJson<'a> {
    prints: Vec<PrintRow<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a Summary>,
}

pub fn render_print_json(
    prints: &[Print],
    summary: Option<&Summary>,
    display: &DisplayConfig,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&PrintListJson {
        prints: prints.iter().map(|p| PrintRow::new(p, display)).collect(),
        summary,
    })
}

pub fn render_material_json(materials: &[Material]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(materials)
}
