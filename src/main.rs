use std::io;
use std::process::ExitCode;

use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};

use scrawl::{run_file, run_source, Command, Config, Interpreter, Value};

// Native recursion backs recursion in scripts, so evaluation runs on a
// thread with a larger stack than the main thread gets.
const STACK_SIZE: usize = 64 * 1024 * 1024;

fn main() -> ExitCode {
    env_logger::init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{HELP_MSG}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("error: {msg}\n\n{HELP_MSG}");
            return ExitCode::FAILURE;
        }
    };

    let worker = std::thread::Builder::new()
        .name("scrawl".to_string())
        .stack_size(STACK_SIZE)
        .spawn(move || {
            if config.interactive {
                run_repl(&config).map_err(|e| e.to_string())
            } else {
                run_script(&config)
            }
        });

    match worker.map(|handle| handle.join()) {
        Ok(Ok(Ok(()))) => ExitCode::SUCCESS,
        Ok(Ok(Err(msg))) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
        Ok(Err(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: cannot start interpreter: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_script(config: &Config) -> Result<(), String> {
    if !config.main_file.exists() {
        println!("No such main file.");
        return Ok(());
    }
    log::debug!("running {}", config.main_file.display());
    run_file(&config.main_file, config, io::stdout()).map_err(|e| e.to_string())
}

fn run_repl(config: &Config) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    let mut interpreter = Interpreter::from_config(config, io::stdout());
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                match run_source(&mut interpreter, &line) {
                    Ok(Value::Undefined) => {}
                    Ok(value) => println!("{}", value.to_code_string()),
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

const HELP_MSG: &str = r#"Usage: scrawl [FILE] [options]

  FILE  Entry source file (default: main.txt)

Options:
  -i, --interactive      Start a read-eval-print loop
  --max-depth N          Maximum nesting of function calls (default: 1000)
  --include-dir DIR      Directory #insert directives read from (default: .)
  -h, --help             Print this message

Set RUST_LOG=scrawl=debug for diagnostic logging."#;
