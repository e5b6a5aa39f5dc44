use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use matlens_core::catalog::default_collection;
use matlens_core::registry::{self, ModuleId};
use matlens_core::render::{render, RenderOptions, DEFAULT_ELEMENT_LIMIT};
use matlens_core::snapshot::{MemoryImage, Scalar, SnapshotTarget, SnapshotValue};
use matlens_core::typename::{basic_type_name, template_argument};
use matlens_core::types::Address;
use matlens_utils::{debug, info, init_logging_with_options, LogFormat, LogLevel};

/// Module id the CLI attaches its printers to; a dump has exactly one image.
const IMAGE_MODULE: ModuleId = ModuleId(0);

/// Render linear-algebra arrays and matrices out of process memory images.
#[derive(Parser, Debug)]
#[command(name = "matlens")]
#[command(version)]
#[command(about = "Render linear-algebra arrays and matrices out of process memory images", long_about = None)]
struct Cli
{
    /// Log level (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format: pretty or json (overrides MATLENS_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// List the registered type patterns
    Catalog,
    /// Show which patterns match a type name
    Match
    {
        /// Decorated type name, e.g. "LinAlg::Array<double, LinAlg::DenseDims>"
        type_name: String,
    },
    /// Render a value whose elements live in raw memory dumps
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs
{
    /// Decorated type name of the value
    #[arg(long = "type")]
    type_name: String,
    /// Memory dump to map, as ADDRESS=FILE (repeatable)
    #[arg(long = "region", value_parser = parse_region)]
    regions: Vec<(Address, PathBuf)>,
    /// Element pointer (hex with 0x prefix, or decimal)
    #[arg(long, value_parser = parse_address)]
    ptr: Option<Address>,
    /// Vector length
    #[arg(long, conflicts_with_all = ["rows", "value"])]
    size: Option<i64>,
    /// Matrix rows (`M`)
    #[arg(long, conflicts_with = "value")]
    rows: Option<i64>,
    /// Matrix columns (`N`)
    #[arg(long, requires = "rows")]
    cols: Option<i64>,
    /// Matrix row stride (`strideM`)
    #[arg(long, requires = "rows")]
    stride: Option<i64>,
    /// Plain value of a strong integer wrapper
    #[arg(long, allow_hyphen_values = true)]
    value: Option<i64>,
    /// Maximum number of elements to print
    #[arg(short, long, default_value_t = DEFAULT_ELEMENT_LIMIT)]
    limit: usize,
    /// Print every element
    #[arg(long, conflicts_with = "limit")]
    unlimited: bool,
}

fn main()
{
    let cli = Cli::parse();

    if let Err(e) = init_logging_with_options(cli.log_level, cli.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    match run_command(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when no printer handled the value.
fn run_command(cli: Cli) -> Result<bool, Box<dyn std::error::Error>>
{
    match cli.command {
        Commands::Catalog => {
            let collection = default_collection()?;
            println!("{}:", collection.name());
            for entry in collection.entries() {
                println!("  {:<22} {:<16} {}", entry.name(), entry.kind().to_string(), entry.pattern());
            }
            Ok(true)
        }
        Commands::Match { type_name } => {
            let collection = default_collection()?;
            let basic = basic_type_name(&type_name);
            let mut matched = false;
            for entry in collection.matching(&type_name) {
                println!("{} -> {} ({})", basic, entry.kind(), entry.name());
                matched = true;
            }
            if !matched {
                println!("{basic}: no printer");
            }
            Ok(matched)
        }
        Commands::Render(args) => render_value(&args),
    }
}

fn render_value(args: &RenderArgs) -> Result<bool, Box<dyn std::error::Error>>
{
    let mut image = MemoryImage::new();
    for (start, path) in &args.regions {
        let region = image.map_file(*start, path)?;
        info!("Mapped {} at {}..{}", path.display(), region.start, region.end);
    }
    let target = SnapshotTarget::new(image);
    let value = build_value(args)?;
    debug!(?value, "Built value");

    let options = if args.unlimited {
        RenderOptions::unlimited()
    } else {
        RenderOptions::with_limit(args.limit)
    };

    registry::on_attach(IMAGE_MODULE)?;
    let rendered = registry::global()
        .lookup(Some(IMAGE_MODULE), &target, &value)
        .map(|printer| render(&printer, &options));
    registry::on_detach(IMAGE_MODULE);

    match rendered {
        Some(text) => {
            println!("{text}");
            Ok(true)
        }
        None => {
            println!("{}", structural_display(&value));
            eprintln!("No pretty-printer available for {}", value.type_name());
            Ok(false)
        }
    }
}

fn build_value(args: &RenderArgs) -> Result<SnapshotValue, Box<dyn std::error::Error>>
{
    if let Some(raw) = args.value {
        return Ok(SnapshotValue::structure(
            args.type_name.as_str(),
            [("value", SnapshotValue::scalar("unsigned long", integer(raw)))],
        ));
    }

    let element = template_argument(&args.type_name, 0)
        .ok_or_else(|| format!("{} has no element type argument", args.type_name))?;
    let ptr = args.ptr.ok_or("--ptr is required for arrays")?;

    let sz = if let Some(size) = args.size {
        SnapshotValue::scalar("unsigned int", integer(size))
    } else if let Some(rows) = args.rows {
        let dims_type = template_argument(&args.type_name, 1).unwrap_or("dims");
        let mut fields = vec![("M", SnapshotValue::scalar("long", integer(rows)))];
        if let Some(cols) = args.cols {
            fields.push(("N", SnapshotValue::scalar("long", integer(cols))));
        }
        if let Some(stride) = args.stride {
            fields.push(("strideM", SnapshotValue::scalar("long", integer(stride))));
        }
        SnapshotValue::structure(dims_type, fields)
    } else {
        return Err("one of --size, --rows or --value is required".into());
    };

    Ok(SnapshotValue::structure(
        args.type_name.as_str(),
        [("ptr", SnapshotValue::pointer(format!("{element} *"), ptr)), ("sz", sz)],
    ))
}

fn integer(value: i64) -> Scalar
{
    Scalar::Signed(value)
}

/// What a debugger shows for a value no printer claims
fn structural_display(value: &SnapshotValue) -> String
{
    match value {
        SnapshotValue::Scalar { value, .. } => value.to_string(),
        SnapshotValue::Pointer { address, .. } => address.to_string(),
        SnapshotValue::Struct { fields, .. } => {
            let body: Vec<String> = fields
                .iter()
                .map(|(name, field)| format!("{name} = {}", structural_display(field)))
                .collect();
            format!("{{{}}}", body.join(", "))
        }
    }
}

fn parse_address(text: &str) -> Result<Address, String>
{
    Address::parse(text).ok_or_else(|| format!("invalid address: {text}"))
}

fn parse_region(text: &str) -> Result<(Address, PathBuf), String>
{
    let (address, path) = text
        .split_once('=')
        .ok_or_else(|| format!("expected ADDRESS=FILE, got {text}"))?;
    Ok((parse_address(address)?, PathBuf::from(path)))
}
