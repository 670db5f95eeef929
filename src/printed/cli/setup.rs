use clap::{ArgAction, Args, Parser, Subcommand};
use printed::config::{
    DisplayTimezone, COST_SYMBOL_ENV, DEFAULT_COST_SYMBOL, DEFAULT_ROOT, DEFAULT_TIMEZONE,
    ROOT_ENV, TIMEZONE_ENV,
};
use printed::state::{MaterialOrder, PrintFilter, PrintOrder, SortDirection};
use printed::web::{DEFAULT_HOST, DEFAULT_PORT};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "printed", bin_name = "printed", version)]
#[command(about = "Track 3d prints, material costs and savings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the prints
    #[arg(short, long, env = ROOT_ENV, default_value = DEFAULT_ROOT)]
    pub path: PathBuf,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Force colored output
    #[arg(long, overrides_with = "no_tty")]
    pub tty: bool,

    /// Disable colored output
    #[arg(long, overrides_with = "tty")]
    pub no_tty: bool,

    /// Currency symbol for costs
    #[arg(long, env = COST_SYMBOL_ENV, default_value = DEFAULT_COST_SYMBOL)]
    pub cost_symbol: String,

    /// Timezone for dates: UTC, local, an offset like +02:00 or a name like Europe/Paris
    #[arg(long, env = TIMEZONE_ENV, default_value = DEFAULT_TIMEZONE)]
    pub timezone: DisplayTimezone,
}

impl Cli {
    /// `Some(true)` for `--tty`, `Some(false)` for `--no-tty`.
    pub fn color_override(&self) -> Option<bool> {
        match (self.tty, self.no_tty) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add, record and list prints
    #[command(subcommand, display_order = 1)]
    Print(PrintCommands),

    /// Manage materials and their prices
    #[command(subcommand, display_order = 2)]
    Material(MaterialCommands),

    /// Serve the web UI
    #[command(display_order = 3)]
    Web(WebArgs),
}

#[derive(Subcommand, Debug)]
pub enum PrintCommands {
    /// Add a new print
    #[command(display_order = 1)]
    Add {
        /// Title; the directory name is derived from it
        title: String,

        /// What the print would cost to buy
        #[arg(short = 'c', long, default_value_t = 0.0)]
        reference_cost: f64,

        /// Directory name to use instead of the slugified title
        #[arg(short, long)]
        name: Option<String>,

        /// Print time, e.g. 1h30m or PT1H30M
        #[arg(short, long, default_value = "")]
        duration: String,

        /// Where the model came from (repeatable)
        #[arg(short = 's', long = "source-link")]
        source_links: Vec<String>,

        /// Link to a comparable product (repeatable)
        #[arg(short = 'r', long = "reference-link")]
        reference_links: Vec<String>,

        /// Mesh files to copy into the print directory
        #[arg(short, long, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Materials used, as NAME=QUANTITY
        #[arg(short, long, num_args = 1..)]
        materials: Vec<String>,

        /// Overwrite an existing print with the same name
        #[arg(long)]
        force: bool,
    },

    /// Remove a print from the listing
    #[command(alias = "rm", display_order = 2)]
    Remove { name: String },

    /// List prints with totals
    #[command(alias = "ls", display_order = 3)]
    List {
        /// created_at, count, name or saved
        #[arg(long, default_value = "created_at")]
        order: PrintOrder,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        direction: SortDirection,

        /// all, printed or unprinted
        #[arg(long, default_value = "all")]
        filter: PrintFilter,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Record that a print was printed
    #[command(display_order = 4)]
    Print {
        /// Print name or title
        name: String,

        /// Record a failed attempt
        #[arg(long)]
        failed: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MaterialCommands {
    /// Add a material
    #[command(display_order = 1)]
    Add {
        name: String,

        /// Unit the price refers to, e.g. g or ml
        unit: String,

        #[arg(short, long, default_value_t = 0.0)]
        price_per_unit: f64,

        /// Price of a bulk purchase, e.g. one spool
        #[arg(long, requires = "quantity")]
        bulk_price: Option<f64>,

        /// Bulk units bought, e.g. 1 for a 1kg spool
        #[arg(long, requires = "bulk_price")]
        quantity: Option<f64>,
    },

    /// Remove a material
    #[command(alias = "rm", display_order = 2)]
    Remove { name: String },

    /// List materials
    #[command(alias = "ls", display_order = 3)]
    List {
        /// name, unit or price_per_unit
        #[arg(long, default_value = "name")]
        order: MaterialOrder,

        /// asc or desc
        #[arg(long, default_value = "asc")]
        direction: SortDirection,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct WebArgs {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path prefix when served behind a proxy
    #[arg(long, env = "ROOT_PATH", default_value = "")]
    pub root_path: String,
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8, serving: bool) {
    let level = match verbose {
        0 if serving => "info",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
