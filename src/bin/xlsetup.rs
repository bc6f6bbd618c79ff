//! xlsetup CLI
//!
//! Command-line front end for the two extraction pipelines. The setup mode
//! produces mps3.ini, HMISetup.ini and the per-language *.lng files; the
//! lang mode produces lng.ini and the touchNN.ini touch panel files.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use xlsetup::{ExtractionPlan, ExtractorBuilder, XlSetupError};

enum Mode {
    Setup,
    Lang,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let mut mode = Mode::Setup;
    let mut out_dir: Option<PathBuf> = None;
    let mut plan_path: Option<PathBuf> = None;

    // Parse options
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --mode requires a value");
                    process::exit(1);
                }
                mode = match args[i + 1].as_str() {
                    "setup" => Mode::Setup,
                    "lang" => Mode::Lang,
                    other => {
                        eprintln!("Error: Unknown mode: {} (expected 'setup' or 'lang')", other);
                        process::exit(1);
                    }
                };
                i += 2;
            }
            "--out-dir" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --out-dir requires a value");
                    process::exit(1);
                }
                out_dir = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--plan" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --plan requires a value");
                    process::exit(1);
                }
                plan_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            _ => {
                eprintln!("Error: Unknown option: {}", args[i]);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    // Default output directory: next to the workbook
    let out_dir = out_dir.unwrap_or_else(|| {
        input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    match run(&input_path, &out_dir, plan_path.as_deref(), &mode) {
        Ok(_) => {
            println!(
                "Extraction completed: {} -> {}",
                input_path.display(),
                out_dir.display()
            );
        }
        Err(e) => {
            handle_error(e);
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <workbook.xlsx> [options]", program);
    eprintln!("\nOptions:");
    eprintln!("  --mode <setup|lang>  Extraction pipeline to run (default: setup)");
    eprintln!("  --out-dir <dir>      Output directory (default: workbook's directory)");
    eprintln!("  --plan <plan.json>   Custom extraction plan (default: built-in layout)");
    eprintln!("\nExamples:");
    eprintln!("  {} setup.xlsx", program);
    eprintln!("  {} languages.xlsx --mode lang --out-dir out", program);
    eprintln!("  {} setup.xlsx --plan rev2-layout.json", program);
}

fn run(
    input_path: &Path,
    out_dir: &Path,
    plan_path: Option<&Path>,
    mode: &Mode,
) -> Result<(), XlSetupError> {
    let mut builder = ExtractorBuilder::new();
    if let Some(plan_path) = plan_path {
        let plan = ExtractionPlan::from_json_reader(File::open(plan_path)?)?;
        builder = builder.with_plan(plan);
    }
    let extractor = builder.build()?;

    let input = File::open(input_path)?;
    match mode {
        Mode::Setup => extractor.extract_setup(input, out_dir),
        Mode::Lang => extractor.extract_translations(input, out_dir),
    }
}

fn handle_error(error: XlSetupError) {
    match error {
        XlSetupError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        XlSetupError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid Excel file or may be corrupted.");
        }
        XlSetupError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check the extraction plan and the workbook layout.");
        }
        XlSetupError::Utf8(utf8_err) => {
            eprintln!("UTF-8 Conversion Error: {}", utf8_err);
            eprintln!("The file contains invalid UTF-8 characters.");
        }
        XlSetupError::Zip(msg) => {
            eprintln!("ZIP Archive Error: {}", msg);
            eprintln!("The file may be corrupted or not a valid ZIP archive.");
        }
        XlSetupError::ParseInt(parse_int_err) => {
            eprintln!("Number Parse Error: {}", parse_int_err);
            eprintln!("Failed to parse a number in the file.");
        }
        XlSetupError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file violates security constraints (e.g., file size limit).");
        }
        XlSetupError::WriteFile { path, source } => {
            eprintln!("Write Error: {}: {}", path.display(), source);
            eprintln!("Please check that the output directory exists and is writable.");
        }
        XlSetupError::Encode { path, encoding } => {
            eprintln!(
                "Encoding Error: output for {} is not representable in {}",
                path.display(),
                encoding
            );
            eprintln!("The workbook contains characters outside the target code page.");
        }
    }
}
