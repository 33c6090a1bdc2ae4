use clap::Parser as _;
use mylisp::{eval, repl, Environment, LispExpr, Parser};
use rustyline::error::ReadlineError;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(clap::Parser, Debug)]
#[command(name = "mylisp", about = "A tiny lisp interpreter")]
struct Cli {
    /// Source file to run, one or more top-level expressions
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Read-loop history file [default: ~/.mylisp_history]
    #[arg(long)]
    history: Option<PathBuf>,

    /// Read-loop prompt
    #[arg(long, default_value = "lisp> ")]
    prompt: String,

    /// Expression to evaluate once instead of starting the read loop
    expr: Vec<String>,
}

fn print_result(result: LispExpr) {
    if !result.is_void() {
        println!("{}", result);
    }
}

fn run_file(path: &Path, env: &Rc<Environment>) -> Result<(), String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("mylisp: failed to read {}: {}", path.display(), e))?;
    let exprs = Parser::parse_all(&source).map_err(|e| format!("Parse error: {}", e))?;
    for expr in exprs.iter() {
        let result = eval(expr, env).map_err(|e| format!("Eval error: {}", e))?;
        print_result(result);
    }
    Ok(())
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    // the one global scope, shared by every top-level evaluation
    let env = Rc::new(Environment::new());

    if let Some(ref path) = cli.file {
        return run_file(path, &env);
    }
    if !cli.expr.is_empty() {
        if let Some(out) = repl::rep(&cli.expr.join(" "), &env) {
            println!("{}", out);
        }
        return Ok(());
    }

    let history = cli.history.clone()
        .or_else(|| dirs::home_dir().map(|home| home.join(".mylisp_history")));
    let mut rl = rustyline::DefaultEditor::new().map_err(|e| e.to_string())?;
    if let Some(ref h) = history {
        let _ = rl.load_history(h);
    }
    loop {
        match rl.readline(&cli.prompt) {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(format!("Readline err: {:?}", e)),
            Ok(line) => {
                if repl::is_exit(&line) {
                    break;
                }
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                if let Some(out) = repl::rep(&line, &env) {
                    println!("{}", out);
                }
            }
        }
    }
    if let Some(ref h) = history {
        let _ = rl.save_history(h);
    }
    Ok(())
}
