use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    console::Console,
    diagnostics::{HythonError, Result},
    parser,
};

pub struct Repl {
    console: Console,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            console: Console::new(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;
        loop {
            match editor.readline(">>> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == ":quit" || trimmed == ":exit" {
                        break;
                    }
                    if trimmed == ":builtins" {
                        let names: Vec<&str> = self.console.builtins().names().collect();
                        println!("{}", names.join(", "));
                        continue;
                    }
                    if parser::is_blank(trimmed) {
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    match self.console.eval_source(trimmed) {
                        Ok(value) if value.is_none() => {}
                        Ok(value) => println!("{}", value.repr()),
                        Err(HythonError::Diagnostic(diag)) => {
                            eprintln!("{}: {}", diag.kind, diag.message);
                        }
                        Err(other) => eprintln!("error: {other}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(readline_error(err)),
            }
        }
        Ok(())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

fn readline_error(err: ReadlineError) -> HythonError {
    HythonError::from(std::io::Error::other(err))
}
