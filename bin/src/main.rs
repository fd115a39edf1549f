use std::{
    io::{self, stderr, stdin, stdout, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;

use errors::Diagnostics;
use interpreter::Interpreter;

/// Evaluates a single Lox expression, from a file or interactively.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Script to run. Starts an interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Print the parsed syntax tree instead of evaluating it.
    #[arg(long)]
    print_ast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Evaluate,
    PrintAst,
}

// sysexits.h
const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;

fn run(
    source: &str,
    mode: Mode,
    output: &mut impl Write,
    diagnostics: &mut Diagnostics,
) -> io::Result<()> {
    match mode {
        Mode::Evaluate => Interpreter::new().run_source(source, output, diagnostics),
        Mode::PrintAst => match interpreter::parse(source, diagnostics) {
            Some(expr) if !diagnostics.had_error() => writeln!(output, "{expr}"),
            _ => Ok(()),
        },
    }
}

fn report(diagnostics: &Diagnostics, error_output: &mut impl Write) -> io::Result<()> {
    for diagnostic in diagnostics.iter() {
        writeln!(error_output, "{diagnostic}")?;
    }
    Ok(())
}

fn exit_status(diagnostics: &Diagnostics) -> u8 {
    if diagnostics.had_error() {
        EX_DATAERR
    } else if diagnostics.had_runtime_error() {
        EX_SOFTWARE
    } else {
        0
    }
}

fn run_file(path: PathBuf, mode: Mode) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    log::debug!("loaded {} ({} bytes)", path.display(), source.len());

    let mut diagnostics = Diagnostics::new();
    run(&source, mode, &mut stdout(), &mut diagnostics)?;
    report(&diagnostics, &mut stderr())?;

    Ok(ExitCode::from(exit_status(&diagnostics)))
}

/// Reads and runs one line at a time until an empty line or end of input.
fn run_prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    error_output: &mut impl Write,
    mode: Mode,
) -> anyhow::Result<()> {
    let mut diagnostics = Diagnostics::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if line.is_empty() {
            break;
        }

        log::debug!("prompt: {line:?}");
        diagnostics.clear();
        run(line, mode, output, &mut diagnostics)?;
        report(&diagnostics, error_output)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let mode = if args.print_ast { Mode::PrintAst } else { Mode::Evaluate };

    match args.file {
        Some(file) => run_file(file, mode),
        None => {
            run_prompt(&mut stdin().lock(), &mut stdout(), &mut stderr(), mode)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
