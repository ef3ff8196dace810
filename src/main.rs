use clap::Parser;
use gini_cli::inequality::SortedIncomeSeries;
use gini_cli::report::{self, Format, Summary};
use gini_cli::{Error, export, parsing, sample};
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    about = "Computes the Gini coefficient and Lorenz curve of income data",
    version
)]
struct Args {
    /// Input file: one income per line, or a CSV with an income column (stdin if not specified)
    input: Option<PathBuf>,

    /// Use a synthetic sample of 1000 fictitious incomes instead of input
    #[arg(long, conflicts_with = "input")]
    sample: bool,

    /// Seed for the synthetic sample
    #[arg(long, default_value_t = sample::DEFAULT_SEED)]
    seed: u64,

    /// Name of the income column in CSV input (case-insensitive)
    #[arg(short, long, default_value = "income")]
    column: String,

    /// Percentage of highest incomes to report the share of
    #[arg(long, default_value_t = 20.0)]
    top: f64,

    /// Percentage of lowest incomes to report the share of
    #[arg(long, default_value_t = 20.0)]
    bottom: f64,

    /// Output format
    #[arg(short, long, default_value = "table")]
    fmt: Format,

    /// Number of sorted rows shown in the table output
    #[arg(long, default_value_t = 10)]
    preview: usize,

    /// Skip the Lorenz curve chart
    #[arg(long)]
    no_plot: bool,

    /// Write the calculated per-rank table to this CSV file, and the summary to <name>_summary.csv beside it
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let incomes = if args.sample {
        info!("using fictitious sample data (seed {})", args.seed);
        sample::generate(args.seed)
    } else {
        parsing::load(args.input.as_deref(), &args.column)?
    };

    let series = SortedIncomeSeries::new(incomes)?;
    let summary = Summary::new(&series, args.top, args.bottom)?;
    debug!(
        "gini {} over {} observations",
        summary.gini.coefficient, summary.gini.observation_count
    );

    if let Some(path) = &args.export {
        export::export_csv(path, &series, &summary)?;
    }

    match args.fmt {
        Format::Json => println!("{}", report::summary_to_json(&summary)?),
        Format::Table => {
            let mut out = io::stdout().lock();
            report::write_summary_table(&mut out, &summary, &series, args.preview)?;
            out.flush()?;
            drop(out);

            if !args.no_plot {
                println!();
                report::plot_lorenz(&summary.gini);
            }
        }
    }

    Ok(())
}
