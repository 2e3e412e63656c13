use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use novolang::{
    ast::{
        formatter::{DebugFormatter, ProgramFormatter, SExpressionFormatter},
        Program,
    },
    interpreter::{
        context::StdioContext,
        dispatch::{FunctionTable, HostValue},
        error::ExecutionError,
        TreeWalkInterpreter,
    },
    value::error::{RuntimeError, RuntimeErrorKind},
};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs::read_to_string, process::ExitCode};
use tracing_subscriber::EnvFilter;

const EXIT_MALFORMED_INPUT: u8 = 65;
const EXIT_RUNTIME_FAILURE: u8 = 70;

#[derive(Debug, Parser)]
#[clap(name = "novo", version)]
pub struct CLArgs {
    /// Log filter directives, e.g. `novolang=debug`. Falls back to `RUST_LOG`.
    #[clap(long = "log", global = true)]
    pub log: Option<String>,
    #[clap(subcommand)]
    pub routine: NovoCommand,
}

#[derive(Debug, Subcommand)]
pub enum NovoCommand {
    /// Execute a JSON syntax tree.
    Run { path: PathBuf },
    /// Lower a JSON syntax tree, print it and list its malformed nodes without executing it.
    Check {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: TreeFormat,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TreeFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CLArgs::parse();
    install_tracing(args.log.as_deref())?;
    match args.routine {
        NovoCommand::Run { path } => {
            tracing::info!(?path, "running");
            run(&path)
        }
        NovoCommand::Check { path, format } => {
            tracing::info!(?path, "checking");
            check(&path, &format)
        }
    }
}

fn install_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .wrap_err_with(|| format!("Invalid log filter {directives:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
    Ok(())
}

fn read_syntax_tree(path: &Path) -> Result<Option<JsonValue>> {
    let src = read_to_string(path).wrap_err_with(|| format!("Failed to read {path:?}"))?;
    match serde_json::from_str(&src) {
        Ok(root) => Ok(Some(root)),
        Err(error) => {
            eprintln!("Invalid JSON in {path:?}: {error}");
            Ok(None)
        }
    }
}

fn run(path: &Path) -> Result<ExitCode> {
    let Some(root) = read_syntax_tree(path)? else {
        return Ok(ExitCode::from(EXIT_MALFORMED_INPUT));
    };
    let mut interpreter = TreeWalkInterpreter::new(StdioContext, host_functions());
    match interpreter.try_execute(&root) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            interpreter.report(&error);
            let code = match error {
                ExecutionError::Ast(_)
                | ExecutionError::Runtime(RuntimeError {
                    kind: RuntimeErrorKind::MalformedNode(_),
                    ..
                }) => EXIT_MALFORMED_INPUT,
                ExecutionError::Runtime(_) => EXIT_RUNTIME_FAILURE,
            };
            Ok(ExitCode::from(code))
        }
    }
}

fn check(path: &Path, format: &TreeFormat) -> Result<ExitCode> {
    let Some(root) = read_syntax_tree(path)? else {
        return Ok(ExitCode::from(EXIT_MALFORMED_INPUT));
    };
    let formatter: Box<dyn ProgramFormatter> = match format {
        TreeFormat::Debug => Box::new(DebugFormatter),
        TreeFormat::SExpr => Box::new(SExpressionFormatter),
    };
    match Program::lower(&root) {
        Ok(Some(program)) => {
            print!("{}", formatter.format(&program));
            let faults = program.faults();
            for error in faults.iter() {
                eprintln!("{}", formatter.format_error(error));
            }
            if faults.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_MALFORMED_INPUT))
            }
        }
        Ok(None) => {
            eprintln!("Root node is not a block; nothing would be executed.");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!("{}", formatter.format_error(&error));
            Ok(ExitCode::from(EXIT_MALFORMED_INPUT))
        }
    }
}

/// A small demonstration host. Real embedders supply their own dispatcher.
fn host_functions() -> FunctionTable {
    let mut table = FunctionTable::new();
    table
        .register(&["wait", "等待"], |arguments| {
            let seconds = match arguments {
                [HostValue::Int(v)] => *v as f64,
                [HostValue::Float(v)] => *v,
                _ => return Err("expected a single number of seconds".into()),
            };
            let duration = Duration::try_from_secs_f64(seconds).map_err(|e| e.to_string())?;
            std::thread::sleep(duration);
            Ok(())
        })
        .register(&["echo", "回显"], |arguments| {
            let line = arguments
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            eprintln!("{line}");
            Ok(())
        });
    table
}
