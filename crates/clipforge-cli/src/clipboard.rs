use anyhow::Context;
use std::io::Read;

/// Capture the session input: the clipboard by default, stdin on request.
pub fn read_input(use_stdin: bool) -> anyhow::Result<String> {
    if use_stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    let mut clipboard =
        arboard::Clipboard::new().context("clipboard unavailable (try --stdin)")?;
    clipboard.get_text().context("no text on the clipboard")
}

pub fn write_clipboard(text: &str) -> anyhow::Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().context("clipboard unavailable (try --stdout)")?;
    clipboard
        .set_text(text.to_string())
        .context("failed to write to the clipboard")
}

/// Emit the final value: the clipboard by default, stdout on request.
pub fn write_output(text: &str, use_stdout: bool) -> anyhow::Result<()> {
    if use_stdout {
        println!("{text}");
        return Ok(());
    }
    write_clipboard(text)
}
