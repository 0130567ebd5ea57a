use clap::Parser;
use loxwalk::Lox;
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process,
};

const EXIT_USAGE: i32 = 64;
const EXIT_SYNTAX_ERROR: i32 = 65;
const EXIT_INPUT_ERROR: i32 = 66;
const EXIT_RUNTIME_ERROR: i32 = 70;
const EXIT_IO_ERROR: i32 = 74;

/// A tree-walking interpreter for a small Lox expression language.
#[derive(Parser)]
#[command(name = "loxwalk")]
struct Cli {
    /// Script to run. Starts an interactive prompt when omitted.
    script: Option<PathBuf>,

    /// Print the parsed syntax tree instead of running the program.
    #[arg(long)]
    ast: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(EXIT_USAGE);
        },
        Err(e) => e.exit(),
    };

    let result = match &cli.script {
        Some(path) => run_file(path, cli.ast),
        None => run_prompt(cli.ast),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_IO_ERROR);
        },
    }
}

fn run_file(path: &Path, ast: bool) -> io::Result<i32> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Could not read {}: {}", path.display(), e);
            return Ok(EXIT_INPUT_ERROR);
        },
    };

    let mut lox = Lox::new(io::stdout(), io::stderr());
    run(&mut lox, contents.as_str(), ast)?;

    Ok(if lox.had_syntax_error() {
        EXIT_SYNTAX_ERROR
    } else if lox.had_runtime_error() {
        EXIT_RUNTIME_ERROR
    } else {
        0
    })
}

fn run_prompt(ast: bool) -> io::Result<i32> {
    let mut buffer = String::new();
    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    let mut stdout = io::stdout();

    let mut lox = Lox::new(io::stdout(), io::stderr());

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        buffer.clear();

        let num_bytes = stdin.read_line(&mut buffer)?;
        if num_bytes == 0 { break };

        run(&mut lox, buffer.as_str(), ast)?;
    }

    Ok(0)
}

fn run<Out: Write, ErrOut: Write>(lox: &mut Lox<Out, ErrOut>, source: &str, ast: bool) -> io::Result<()> {
    if ast {
        lox.print_ast(source)
    } else {
        lox.run(source)
    }
}
