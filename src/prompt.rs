use log::warn;
use std::io::{self, BufRead, Write};

// @module: Interactive validate-or-repeat prompts

/// Ask `message` until `parse` accepts the answer
///
/// Rejected answers print the parser's message and ask again. Returns
/// `Ok(None)` when the input is closed, which callers treat as the user
/// quitting.
pub fn prompt_until_valid<R, W, T, F>(input: &mut R, output: &mut W, message: &str, parse: F) -> io::Result<Option<T>>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Result<T, String>,
{
    loop {
        write!(output, "{}", message)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }

        match parse(line.trim()) {
            Ok(value) => return Ok(Some(value)),
            Err(reason) => {
                writeln!(output, "Error: {}", reason)?;
                writeln!(output)?;
            }
        }
    }
}

/// Any integer, negative included
pub fn parse_integer(answer: &str) -> Result<i64, String> {
    answer
        .parse::<i64>()
        .map_err(|_| "please enter a valid integer".to_string())
}

/// A non-negative integer
pub fn parse_stop_id(answer: &str) -> Result<u64, String> {
    let value = parse_integer(answer)?;
    u64::try_from(value).map_err(|_| "the stop id must be greater than or equal to 0".to_string())
}

/// A non-empty file name
pub fn parse_file_name(answer: &str) -> Result<String, String> {
    if answer.is_empty() {
        Err("please enter a file name".to_string())
    } else {
        Ok(answer.to_string())
    }
}

/// Prompt on the process's stdin and stdout
pub fn prompt_stdin<T, F>(message: &str, parse: F) -> io::Result<Option<T>>
where
    F: Fn(&str) -> Result<T, String>,
{
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    prompt_until_valid(&mut input, &mut output, message, parse)
}

/// [`prompt_stdin`] on a blocking thread, raced against Ctrl-C
///
/// An interrupt is reported as `Ok(None)`, the same as closed input. The
/// blocking reader is left behind, so the runtime must be shut down with
/// `shutdown_background` rather than dropped.
pub async fn prompt_stdin_or_interrupt<T, F>(message: &'static str, parse: F) -> io::Result<Option<T>>
where
    T: Send + 'static,
    F: Fn(&str) -> Result<T, String> + Send + 'static,
{
    let mut answer = tokio::task::spawn_blocking(move || prompt_stdin(message, parse));
    tokio::select! {
        joined = &mut answer => joined.map_err(io::Error::other)?,
        interrupted = tokio::signal::ctrl_c() => {
            interrupted?;
            println!();
            warn!("Interrupted, exiting");
            Ok(None)
        }
    }
}
