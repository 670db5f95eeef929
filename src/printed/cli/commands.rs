//! # CLI Layer
//!
//! One client of [`PrintedApi`]; the web UI is the other. This is the only
//! place that parses arguments, writes to the terminal and decides exit codes.
//!
//! Each `handle_*` builds the API input from typed arguments, calls the API
//! and renders the returned [`CmdResult`](printed::api::CmdResult).

use super::render::{
    print_messages, render_material_json, render_material_list, render_print_json,
    render_print_list,
};
use super::setup::{init_logging, Cli, Commands, MaterialCommands, PrintCommands, WebArgs};
use clap::{CommandFactory, Parser};
use printed::api::{BulkPrice, NewMaterial, NewPrint, PrintedApi};
use printed::config::DisplayConfig;
use printed::error::Result;
use printed::model::PrintStatus;
use printed::state::{MaterialOrder, PrintFilter, PrintOrder, SortDirection};
use printed::web::{self, ServerConfig};
use std::path::PathBuf;

struct AppContext {
    root: PathBuf,
    display: DisplayConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(color) = cli.color_override() {
        colored::control::set_override(color);
        console::set_colors_enabled(color);
    }
    init_logging(cli.verbose, matches!(cli.command, Some(Commands::Web(_))));

    let ctx = AppContext {
        root: cli.path.clone(),
        display: DisplayConfig::new(cli.cost_symbol.clone(), cli.timezone),
    };

    match cli.command {
        Some(Commands::Print(cmd)) => match cmd {
            PrintCommands::Add {
                title,
                reference_cost,
                name,
                duration,
                source_links,
                reference_links,
                files,
                materials,
                force,
            } => handle_add(
                &ctx,
                NewPrint {
                    title,
                    name,
                    reference_cost,
                    duration,
                    source_links,
                    reference_links,
                    materials,
                    files,
                    force,
                },
            ),
            PrintCommands::Remove { name } => handle_remove(&ctx, &name),
            PrintCommands::List {
                order,
                direction,
                filter,
                json,
            } => handle_list(&ctx, order, direction, filter, json),
            PrintCommands::Print { name, failed } => handle_print(&ctx, &name, failed),
        },
        Some(Commands::Material(cmd)) => match cmd {
            MaterialCommands::Add {
                name,
                unit,
                price_per_unit,
                bulk_price,
                quantity,
            } => handle_material_add(
                &ctx,
                NewMaterial {
                    name,
                    unit,
                    price_per_unit,
                    bulk: bulk_price
                        .zip(quantity)
                        .map(|(price, quantity)| BulkPrice { price, quantity }),
                },
            ),
            MaterialCommands::Remove { name } => handle_material_remove(&ctx, &name),
            MaterialCommands::List {
                order,
                direction,
                json,
            } => handle_material_list(&ctx, order, direction, json),
        },
        Some(Commands::Web(args)) => handle_web(ctx, args),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn handle_add(ctx: &AppContext, new: NewPrint) -> Result<()> {
    let mut api = PrintedApi::open(&ctx.root)?;
    let result = api.add_print(new)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &AppContext, name: &str) -> Result<()> {
    let mut api = PrintedApi::open(&ctx.root)?;
    let result = api.remove_print(name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &AppContext,
    order: PrintOrder,
    direction: SortDirection,
    filter: PrintFilter,
    json: bool,
) -> Result<()> {
    let api = PrintedApi::open_all(&ctx.root)?;
    let result = api.list_prints(order, direction, filter)?;
    if json {
        println!(
            "{}",
            render_print_json(&result.listed_prints, result.summary.as_ref(), &ctx.display)?
        );
    } else {
        print!(
            "{}",
            render_print_list(&result.listed_prints, result.summary.as_ref(), &ctx.display)
        );
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_print(ctx: &AppContext, name: &str, failed: bool) -> Result<()> {
    let status = if failed {
        PrintStatus::Failed
    } else {
        PrintStatus::Success
    };
    let mut api = PrintedApi::open(&ctx.root)?;
    let result = api.print_print(name, status)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_material_add(ctx: &AppContext, new: NewMaterial) -> Result<()> {
    let mut api = PrintedApi::open(&ctx.root)?;
    let result = api.add_material(new)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_material_remove(ctx: &AppContext, name: &str) -> Result<()> {
    let mut api = PrintedApi::open(&ctx.root)?;
    let result = api.remove_material(name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_material_list(
    ctx: &AppContext,
    order: MaterialOrder,
    direction: SortDirection,
    json: bool,
) -> Result<()> {
    let api = PrintedApi::open(&ctx.root)?;
    let result = api.list_materials(order, direction);
    if json {
        println!("{}", render_material_json(&result.listed_materials)?);
    } else {
        print!(
            "{}",
            render_material_list(&result.listed_materials, &ctx.display)
        );
    }
    Ok(())
}

fn handle_web(ctx: AppContext, args: WebArgs) -> Result<()> {
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        root_path: args.root_path,
        display: ctx.display,
    };
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(ctx.root, config))
}
