//! Gallery CLI - Build the product gallery feed from a CSV export
//!
//! ```bash
//! gallery                               # products.csv -> products.json
//! gallery convert input.csv -o out.json # explicit paths
//! gallery parse input.csv               # dump raw rows as JSON (debug)
//! ```
//!
//! `GALLERY_INPUT`, `GALLERY_OUTPUT` and `GALLERY_LOG_FORMAT` may be set in
//! the environment or a `.env` file.

use clap::{Args, Parser, Subcommand};
use gallery::logs::{self, LogFormat};
use gallery::{
    convert_file, read_all_rows, ConvertOptions, InputEncoding, RaggedRows, ReaderOptions,
    Schema, DEFAULT_INPUT, DEFAULT_OUTPUT,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(about = "Convert a product CSV into the gallery products.json feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Conversion settings used when no subcommand is given
    #[command(flatten)]
    convert: ConvertArgs,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log line format: text or json
    #[arg(long, global = true, env = "GALLERY_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a product CSV into gallery JSON (the default command)
    Convert(ConvertArgs),

    /// Parse a CSV file and output its rows as JSON objects
    Parse {
        /// Input CSV file (`-` for stdin)
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        #[command(flatten)]
        reader: ReaderArgs,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Input CSV file (`-` for stdin)
    #[arg(env = "GALLERY_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output JSON file (`-` for stdout)
    #[arg(short, long, env = "GALLERY_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    #[command(flatten)]
    reader: ReaderArgs,

    /// Column holding the SKU
    #[arg(long, default_value = "sku")]
    sku_field: String,

    /// Column holding the title
    #[arg(long, default_value = "title")]
    title_field: String,

    /// Prefix of the image columns (case-sensitive)
    #[arg(long, default_value = "image")]
    image_prefix: String,
}

#[derive(Args)]
struct ReaderArgs {
    /// CSV delimiter (default: ',')
    #[arg(short, long, conflicts_with = "detect_delimiter")]
    delimiter: Option<char>,

    /// Detect the delimiter from the header line
    #[arg(long)]
    detect_delimiter: bool,

    /// Input encoding: utf8, auto, latin1 or windows1252
    #[arg(long, default_value = "utf8")]
    encoding: InputEncoding,

    /// Accept rows whose field count differs from the header
    #[arg(long)]
    lenient: bool,
}

impl ReaderArgs {
    fn options(&self) -> ReaderOptions {
        ReaderOptions {
            delimiter: if self.detect_delimiter {
                None
            } else {
                Some(self.delimiter.unwrap_or(','))
            },
            encoding: self.encoding,
            ragged: if self.lenient {
                RaggedRows::Lenient
            } else {
                RaggedRows::Reject
            },
        }
    }
}

impl ConvertArgs {
    fn options(self) -> ConvertOptions {
        ConvertOptions {
            reader: self.reader.options(),
            input: self.input,
            output: self.output,
            schema: Schema {
                sku_field: self.sku_field,
                title_field: self.title_field,
                image_prefix: self.image_prefix,
            },
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logs::init(cli.log_format, cli.quiet);

    let result = match cli.command {
        Some(Commands::Convert(args)) => cmd_convert(args),
        Some(Commands::Parse { input, output, reader }) => cmd_parse(input, output, &reader),
        None => cmd_convert(cli.convert),
    };

    if let Err(e) = result {
        logs::log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_convert(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options();
    convert_file(&options)?;
    logs::log_success("✨ Done!");
    Ok(())
}

fn cmd_parse(
    input: PathBuf,
    output: PathBuf,
    reader: &ReaderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    logs::log_info(format!("📄 Parsing CSV: {}", input.display()));

    let (headers, rows) = read_all_rows(&input, &reader.options())?;
    logs::log_info(format!("Columns: {}", headers.join(", ")));
    logs::log_success(format!("Parsed {} records", rows.len()));

    gallery::writer::write_json_file(&output, &rows)?;
    Ok(())
}
