extern crate retrofit_savings;

use clap::Parser;
use retrofit_savings::output::FileOutput;
use retrofit_savings::{run_project, ProjectFlags};
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct RetrofitArgs {
    input_file: String,
    #[arg(
        long,
        short,
        default_value_t = false,
        help = "Use the preset intervention scenario when the input has no selection"
    )]
    default_scenario: bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Also output the end use breakdown for each building zone"
    )]
    detailed_output: bool,
    #[clap(long, default_value_t = false, help = "Whether to log out spans")]
    log_spans: bool,
}

fn main() -> anyhow::Result<()> {
    let args = RetrofitArgs::parse();

    tracing_subscriber::fmt()
        .with_span_events(if args.log_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        })
        .init();

    let input_file = args.input_file.as_str();
    let input_file_ext = Path::new(input_file).extension().and_then(OsStr::to_str);
    let input_file_stem = match input_file_ext {
        Some(ext) => &input_file[..(input_file.len() - ext.len() - 1)],
        None => input_file,
    };
    let input_file_name = Path::new(input_file_stem)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(input_file_stem);

    let output_path = PathBuf::from(format!("{input_file_stem}__results"));
    fs::create_dir_all(&output_path)?;
    let file_output = FileOutput::new(output_path, format!("{input_file_name}__{{}}.{{}}"));

    let mut flags = ProjectFlags::empty();
    if args.default_scenario {
        flags.insert(ProjectFlags::DEFAULT_SCENARIO);
    }
    if args.detailed_output {
        flags.insert(ProjectFlags::DETAILED_OUTPUT);
    }

    let results = run_project(
        BufReader::new(File::open(Path::new(input_file))?),
        &file_output,
        &flags,
    )?;

    info!(
        total_savings = results.savings.total_savings,
        percent_savings = results.savings.percent_savings,
        annual_cost_savings = results.financials.annual_cost_savings,
        simple_payback = results.financials.simple_payback,
        "calculation complete"
    );

    Ok(())
}
