// tapestep: single-stepping tape language interpreter

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser as _;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::Level;

use tapestep::interpreter::constants::DEFAULT_SNAPSHOT_LIMIT;
use tapestep::interpreter::engine::Interpreter;
use tapestep::parser::ast::{Program, SourceMap};
use tapestep::parser::{parse, ParseErrors, Parser};
use tapestep::ui::App;
use tapestep::Machine;

#[derive(clap::Parser)]
#[command(
    name = "tapestep",
    about = "Step through tape language programs, or run them to completion"
)]
struct Cli {
    /// Source file to run ("-" reads from stdin).
    file: PathBuf,

    /// Run to completion without the TUI and print the output.
    #[arg(long)]
    run: bool,

    /// Text for `,` to read.
    #[arg(long, default_value = "")]
    input: String,

    /// Give up after this many steps instead of running forever.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Memory budget in bytes for the TUI's snapshot history.
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_LIMIT)]
    snapshot_limit: usize,

    /// Log parser and loop activity to stderr (with --run).
    #[arg(long)]
    debug: bool,
}

fn read_source(file: &Path) -> io::Result<String> {
    if file.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(file)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let source = match read_source(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.file.display(), e);
            std::process::exit(1);
        }
    };

    let program = match parse_source(&source, cli.run) {
        Ok(program) => program,
        Err(errors) => {
            for error in errors.iter() {
                eprintln!("{}", error);
            }
            std::process::exit(1);
        }
    };

    if cli.run {
        run_to_completion(program, &cli)
    } else {
        run_tui(program, source, &cli)
    }
}

/// Parse for the chosen mode. Only the TUI shows locations, so headless runs
/// skip the source map, whose keys grow with nesting depth.
fn parse_source(source: &str, headless: bool) -> Result<Program, ParseErrors> {
    if headless {
        Ok(Program {
            commands: parse(source)?,
            source_map: SourceMap::new(),
        })
    } else {
        Parser::new(source).parse_program()
    }
}

/// Non-interactive mode: the only one with a log subscriber, since the TUI
/// owns the terminal
fn run_to_completion(program: Program, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut machine = Machine::with_input(program.commands, &cli.input);
    let result = machine.run(cli.max_steps);

    let mut stdout = io::stdout();
    stdout.write_all(machine.output().as_bytes())?;
    stdout.flush()?;

    if let Err(e) = result {
        eprintln!();
        eprintln!("Runtime error after {} steps: {}", machine.steps(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_tui(program: Program, source: String, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!(
        "Parsed successfully. Found {} commands.",
        program.command_count()
    );

    let interpreter = Interpreter::with_input(program, &cli.input, cli.snapshot_limit)?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(interpreter, source, cli.max_steps);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
