use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use rox::ast_printer::AstPrinter;
use rox::parser::Parser;
use rox::scanner::{scan_tokens, Scanner};
use rox::{Lox, Outcome, EXIT_STATIC_ERROR};

/// Exit status when the input file cannot be read.
const EXIT_IO_ERROR: i32 = 74;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Enable logging to rox.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print one JSON object per token
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints the syntax tree of each statement
    Parse { filename: PathBuf },

    /// Runs input from a file as a Lox program
    Run { filename: PathBuf },

    /// Starts an interactive prompt (the default)
    Repl,
}

/// Reads a source file through a read-only memory map.
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // SAFETY: the map is read-only and dropped before this function returns;
    // the text is copied out.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    let text = std::str::from_utf8(&map)
        .context(format!("File {:?} is not valid UTF-8", filename))?
        .to_owned();

    info!("Read {} bytes from {:?}", text.len(), filename);

    Ok(text)
}

/// `read_file`, or report and exit with the I/O status.
fn read_source(filename: &Path) -> String {
    match read_file(filename) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(EXIT_IO_ERROR);
        }
    }
}

fn init_logger() -> Result<()> {
    let log_file = File::create("rox.log").context("Failed to create rox.log")?;

    // `[module:line] - message`, module path without the crate prefix
    Builder::new()
        .format(|buf, record| {
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("rox::").unwrap_or(module);
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to rox.log");
    Ok(())
}

/// Print every diagnostic of `outcome` to stderr.
fn report(outcome: &Outcome) {
    for diagnostic in outcome.diagnostics() {
        debug!("Reporting diagnostic: {}", diagnostic);
        eprintln!("{}", diagnostic);
    }
}

fn tokenize(filename: &Path, json: bool) -> Result<()> {
    let source = read_source(filename);
    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) if json => println!("{}", serde_json::to_string(&token)?),
            Ok(token) => println!("{}", token),
            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code 65");
        process::exit(EXIT_STATIC_ERROR);
    }

    Ok(())
}

fn parse(filename: &Path) -> Result<()> {
    let source = read_source(filename);
    let (tokens, lex_errors) = scan_tokens(&source);

    let parsed = Parser::new(tokens).parse();

    for e in &lex_errors {
        eprintln!("{}", e);
    }

    match parsed {
        Ok(statements) if lex_errors.is_empty() => {
            for stmt in &statements {
                println!("{}", AstPrinter::print_stmt(stmt));
            }
            Ok(())
        }
        Ok(_) => process::exit(EXIT_STATIC_ERROR),
        Err(errors) => {
            for e in &errors {
                eprintln!("{}", e);
            }
            process::exit(EXIT_STATIC_ERROR);
        }
    }
}

fn run_file(filename: &Path) -> Result<()> {
    let source = read_source(filename);
    let mut lox = Lox::new(io::stdout());

    let outcome = lox.run(&source);
    report(&outcome);

    info!("Run finished with exit code {}", outcome.exit_code());

    if !outcome.is_success() {
        process::exit(outcome.exit_code());
    }

    Ok(())
}

fn repl() -> Result<()> {
    let stdin = io::stdin();
    let mut lox = Lox::new(io::stdout());
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        // Errors are reported and the session carries on.
        let outcome = lox.run(line.trim_end_matches(['\n', '\r']));
        report(&outcome);
        println!();
    }

    info!("REPL closed");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        Builder::new().filter_level(log::LevelFilter::Off).init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands.unwrap_or(Commands::Repl) {
        Commands::Tokenize { filename, json } => tokenize(&filename, json),
        Commands::Parse { filename } => parse(&filename),
        Commands::Run { filename } => run_file(&filename),
        Commands::Repl => repl(),
    }
}
