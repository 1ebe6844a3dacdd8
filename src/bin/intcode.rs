//! intcode - Run, check and orchestrate Intcode programs
//!
//! # Usage
//!
//! ```bash
//! # Run with inputs, print outputs
//! intcode run program.txt 1 2 3
//!
//! # Run and dump the final machine state as JSON
//! intcode run --state program.txt 5
//!
//! # Linear decode diagnostics
//! intcode check program.txt
//!
//! # Best phase ordering, series (0..=4) or feedback (5..=9)
//! intcode amplify program.txt
//! intcode amplify --feedback program.txt
//!
//! # Breadth-first exploration of a world program
//! intcode explore program.txt
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: The program faulted or failed validation
//! - 2: Invalid arguments or IO error

use std::process::ExitCode;

use anyhow::{bail, Context};
use intcode::vm::DiagnosticLevel;
use intcode::{
    format_program, load_file, max_signal, validate_program, Direction, Engine, ExecState,
    Explorer, IntcodeError, Word,
};

/// Failure that should exit with code 1 rather than 2
#[derive(Debug)]
struct ProgramFailure(String);

impl std::fmt::Display for ProgramFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ProgramFailure {}

#[derive(Default)]
struct Options {
    state: bool,
    feedback: bool,
    positional: Vec<String>,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some((command, rest)) = args.split_first() else {
        eprintln!("Error: No command specified\n");
        print_help();
        return ExitCode::from(2);
    };

    if command == "-h" || command == "--help" {
        print_help();
        return ExitCode::SUCCESS;
    }

    let mut opts = Options::default();
    for arg in rest {
        match arg.as_str() {
            "--state" => opts.state = true,
            "--feedback" | "-f" => opts.feedback = true,
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            // negative numbers are inputs, not options
            _ if arg.starts_with('-') && arg.parse::<Word>().is_err() => {
                eprintln!("Unknown option: {}\n", arg);
                print_help();
                return ExitCode::from(2);
            }
            _ => opts.positional.push(arg.clone()),
        }
    }

    let result = match command.as_str() {
        "run" => cmd_run(&opts),
        "check" => cmd_check(&opts),
        "amplify" => cmd_amplify(&opts),
        "explore" => cmd_explore(&opts),
        other => {
            eprintln!("Unknown command: {}\n", other);
            print_help();
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_program_failure(&e) => {
            eprintln!("x {:#}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Faults raised by the machine itself, as opposed to unreadable input
fn is_program_failure(e: &anyhow::Error) -> bool {
    if e.is::<ProgramFailure>() {
        return true;
    }
    matches!(
        e.downcast_ref::<IntcodeError>(),
        Some(err) if !matches!(err, IntcodeError::Parse { .. })
    )
}

fn program_arg(opts: &Options) -> anyhow::Result<Vec<Word>> {
    let Some(path) = opts.positional.first() else {
        bail!("No program file specified");
    };
    load_file(path)
}

fn cmd_run(opts: &Options) -> anyhow::Result<()> {
    let program = program_arg(opts)?;
    let inputs = opts.positional[1..]
        .iter()
        .map(|s| s.parse::<Word>().with_context(|| format!("Invalid input value {:?}", s)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut engine = Engine::new(&program, inputs);
    let state = engine.run()?;
    println!("{}", format_program(&engine.drain_outputs()));

    if opts.state {
        let json = serde_json::to_string_pretty(&engine.snapshot())
            .context("Failed to serialize machine state")?;
        println!("{}", json);
    }

    if state == ExecState::WaitingForInput {
        return Err(ProgramFailure(format!(
            "program is waiting for input at address {}",
            engine.pc()
        ))
        .into());
    }
    Ok(())
}

fn cmd_check(opts: &Options) -> anyhow::Result<()> {
    let program = program_arg(opts)?;
    let report = validate_program(&program);

    for d in &report.diagnostics {
        eprintln!("  {}", d);
    }
    let marker = if report.has_errors() { "!" } else { "+" };
    let halt = report
        .halt_at
        .map_or_else(|| "none".to_string(), |at| at.to_string());
    println!(
        "{} {} words, {} instructions, halt at {}",
        marker,
        program.len(),
        report.instructions,
        halt
    );

    let errors = report
        .diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Error)
        .count();
    if errors > 0 {
        return Err(ProgramFailure(format!("{} error(s)", errors)).into());
    }
    Ok(())
}

fn cmd_amplify(opts: &Options) -> anyhow::Result<()> {
    let program = program_arg(opts)?;
    let phases: Vec<Word> = if opts.feedback {
        (5..=9).collect()
    } else {
        (0..=4).collect()
    };

    let (signal, order) = max_signal(&program, &phases)?;
    println!("{} (phases {})", signal, format_program(&order));
    Ok(())
}

fn cmd_explore(opts: &Options) -> anyhow::Result<()> {
    let program = program_arg(opts)?;
    let mut explorer = Explorer::new(&program, &Direction::ALL)?;
    let map = explorer.explore()?;

    let Some(goal) = map.goal() else {
        return Err(ProgramFailure(format!(
            "no goal found in {} explored cells",
            map.len()
        ))
        .into());
    };
    let steps = map.steps_to(goal).unwrap_or_default();
    let fill = map.fill_time(goal, &Direction::ALL).unwrap_or_default();

    println!("goal {} reached in {} moves", goal, steps);
    println!("fill from goal takes {} ticks", fill);
    if map.abandoned() > 0 {
        eprintln!("  {} branch(es) abandoned after a fault", map.abandoned());
    }
    Ok(())
}

fn print_help() {
    eprintln!("intcode - Run and orchestrate Intcode programs");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    intcode <COMMAND> [OPTIONS] <FILE> [INPUTS]...");
    eprintln!();
    eprintln!("COMMANDS:");
    eprintln!("    run        Run to halt with the given inputs and print outputs");
    eprintln!("    check      Decode linearly and report diagnostics");
    eprintln!("    amplify    Search phase orderings for the largest signal");
    eprintln!("    explore    Map a world program and report goal distance");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    --state           Print the final machine state as JSON (run)");
    eprintln!("    -f, --feedback    Use a feedback ring with phases 5..=9 (amplify)");
    eprintln!("    -h, --help        Print this help message");
    eprintln!();
    eprintln!("EXIT CODES:");
    eprintln!("    0    Success");
    eprintln!("    1    Program faulted, stalled or failed validation");
    eprintln!("    2    Invalid arguments or IO error");
}
