//! Strand command-line interface.
//!
//! Usage:
//!   strand <file.sx>                 Evaluate a source file
//!   strand -e <code>                 Evaluate a string
//!   strand pipeline <config> <hex>   Run a configured pipeline
//!   strand                           Read source from stdin

use std::{
    env, fs,
    io::{self, Read},
    process::ExitCode,
};

use strand::PipelineConfig;

const USAGE: &str = "\
Usage: strand [OPTIONS] [FILE]
       strand pipeline <CONFIG.toml> <HEX-BYTES>

Arguments:
  [FILE]  strand source file to evaluate

Options:
  -e <CODE>  Evaluate CODE string
  -h, --help Print this help message

The pipeline form builds the step chain described by the TOML manifest,
feeds it the hex-encoded input bytes, and prints the final output in hex.

If no arguments are given, reads source from stdin.";

enum Action {
    Eval(String),
    Pipeline { config: String, input: Vec<u8> },
    Help,
}

fn read_stdin() -> Result<String, io::Error> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() % 2 != 0 {
        return Err("hex input must have an even number of digits".to_string());
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16)
                .map_err(|_| format!("invalid hex byte '{}'", &compact[i..i + 2]))
        })
        .collect()
}

fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_args() -> Result<Action, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    match args.as_slice() {
        [] => Ok(Action::Eval(
            read_stdin().map_err(|e| format!("error reading stdin: {e}"))?,
        )),
        [arg] if arg == "-h" || arg == "--help" => Ok(Action::Help),
        [flag, code] if flag == "-e" => Ok(Action::Eval(code.clone())),
        [cmd, config, hex] if cmd == "pipeline" => Ok(Action::Pipeline {
            config: config.clone(),
            input: parse_hex(hex)?,
        }),
        [file] => Ok(Action::Eval(
            fs::read_to_string(file).map_err(|e| format!("error reading {file}: {e}"))?,
        )),
        _ => Err(USAGE.into()),
    }
}

fn run_eval(source: &str) -> ExitCode {
    match strand::eval(source) {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_pipeline(config_path: &str, input: &[u8]) -> ExitCode {
    let config = match PipelineConfig::from_file(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let mut steps = match config.build_steps() {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    match strand::run_pipeline(&mut steps, input) {
        Ok(output) => {
            println!("{}", format_hex(&output));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match parse_args() {
        Ok(Action::Help) => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Action::Eval(source)) => run_eval(&source),
        Ok(Action::Pipeline { config, input }) => run_pipeline(&config, &input),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
