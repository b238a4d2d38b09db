use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub enum MenuChoice {
    Entry(usize),
    /// Ctrl-C: step back one operation, or abort an empty session.
    Back,
    /// Ctrl-D: finish the session.
    Finish,
}

/// Read a 1-based menu selection, re-prompting until valid.
pub fn select(rl: &mut DefaultEditor, max: usize) -> anyhow::Result<MenuChoice> {
    loop {
        match rl.readline("choice> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match line.parse::<usize>() {
                    Ok(n) if (1..=max).contains(&n) => return Ok(MenuChoice::Entry(n - 1)),
                    _ => println!("enter a number between 1 and {max}"),
                }
            }
            Err(ReadlineError::Interrupted) => return Ok(MenuChoice::Back),
            Err(ReadlineError::Eof) => return Ok(MenuChoice::Finish),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Prompt for one line of input. Ctrl-C / Ctrl-D cancel (None).
pub fn line(rl: &mut DefaultEditor, prompt: &str) -> anyhow::Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
