#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod runner;

use bootstrap::{InterpreterConfig, init_logging};
use runner::ScriptRunner;
use splitmint_parser::parse_program;
use splitmint_presentation::format_parse_error;
use std::{borrow::Cow, env, fs, process};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err(splitmint_i18n::USAGE.into());
    };

    let config = InterpreterConfig::from_env()?;
    let source = fs::read_to_string(&path)
        .map_err(|err| splitmint_i18n::failed_to_read_file(&path, err))?;

    let program = parse_program(&source).map_err(|err| format_parse_error(&err))?;

    let mut runner = ScriptRunner::new(&config)?;
    let outputs = runner.run(&program)?;
    println!("{}", outputs.join("\n"));

    Ok(())
}
