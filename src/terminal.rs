//! Terminal front end - a line-oriented stand-in for the calculator form.
//!
//! Each input line is one command. Typed field values go through the same live-typing
//! and blur normalization a form field would apply, and everything else is forwarded to
//! the [`FormController`]. This module only renders text; it holds no calculator state.

use crate::{
    core::{
        form::{Field, FormController},
        record::CalculationRecord,
        slot::KeyValueSlot,
        summary::{history_entry, summarize},
    },
    errors::Result,
};
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info};

const HELP_TEXT: &str = "\
Area calculator
  width <cm>            set the width
  height <cm>           set the height
  price <value>         set the price per m² (digits are read as cents)
  eyelets <count>       set the number of eyelets (optional)
  eyelet-price <value>  set the price per eyelet (optional)
  submit                calculate and save
  show                  show the form and the last result
  history               list saved calculations
  edit <id>             load a saved calculation into the form
  delete <id>           delete a saved calculation
  cancel                clear the form and stop editing
  help                  show this message
  quit                  leave
";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Type text into a field
    Set(Field, String),
    /// Calculate and save
    Submit,
    /// Show form state and last result
    Show,
    /// List the history
    History,
    /// Load an entry for editing
    Edit(String),
    /// Delete an entry
    Delete(String),
    /// Clear the form
    Cancel,
    /// Print usage
    Help,
    /// End the session
    Quit,
}

/// Parses one input line. Blank lines and unknown commands give `None`.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (name, argument) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, rest)| (name, rest.trim()));

    let field = match name.to_ascii_lowercase().as_str() {
        "width" => Some(Field::Width),
        "height" => Some(Field::Height),
        "price" => Some(Field::PricePerSquareMeter),
        "eyelets" => Some(Field::EyeletCount),
        "eyelet-price" => Some(Field::EyeletPrice),
        "submit" => return Some(Command::Submit),
        "show" => return Some(Command::Show),
        "history" => return Some(Command::History),
        "cancel" => return Some(Command::Cancel),
        "help" => return Some(Command::Help),
        "quit" | "exit" => return Some(Command::Quit),
        "edit" if !argument.is_empty() => return Some(Command::Edit(argument.to_string())),
        "delete" if !argument.is_empty() => return Some(Command::Delete(argument.to_string())),
        _ => None,
    }?;

    Some(Command::Set(field, argument.to_string()))
}

const fn field_label(field: Field) -> &'static str {
    match field {
        Field::Width => "Width (cm)",
        Field::Height => "Height (cm)",
        Field::PricePerSquareMeter => "Price per m² (R$)",
        Field::EyeletCount => "Eyelets (un)",
        Field::EyeletPrice => "Price per eyelet (R$)",
    }
}

fn render_form<S: KeyValueSlot>(controller: &FormController<S>) -> String {
    let mut out = String::new();
    if let Some(id) = controller.editing_id() {
        let _ = writeln!(out, "Editing calculation {id}");
    }
    for field in Field::ALL {
        let _ = writeln!(
            out,
            "  {}: {}",
            field_label(field),
            controller.fields().get(field)
        );
    }
    if let Some(record) = controller.result() {
        out.push_str(&render_result(record));
    }
    out
}

fn render_result(record: &CalculationRecord) -> String {
    let summary = summarize(record);
    let mut out = String::from("Result:\n");
    let _ = writeln!(out, "  Total area: {}", summary.area);
    if let Some(eyelets) = summary.eyelets {
        let _ = writeln!(out, "  Eyelets: {eyelets}");
    }
    let _ = writeln!(out, "  Total value: {}", summary.total);
    out
}

fn render_history<S: KeyValueSlot>(controller: &FormController<S>) -> String {
    if controller.history().is_empty() {
        return "No calculations yet\n".to_string();
    }

    let mut out = String::new();
    for record in controller.history() {
        let entry = history_entry(record);
        let marker = if controller.editing_id() == Some(entry.id.as_str()) {
            " (editing)"
        } else {
            ""
        };
        let _ = writeln!(out, "[{}] {}{marker}", entry.id, entry.written_at);
        let _ = writeln!(
            out,
            "  Dimensions: {}  Area: {}  Price per m²: {}",
            entry.dimensions, entry.area, entry.unit_price
        );
        if let Some(eyelets) = entry.eyelets {
            let _ = writeln!(out, "  Eyelets: {eyelets}");
        }
        let _ = writeln!(out, "  Total value: {}", entry.total);
    }
    out
}

/// Applies one command to the controller and returns the text to print, or `None` when
/// the session should end.
///
/// # Errors
/// Returns an error if the history cannot be written.
pub async fn execute<S: KeyValueSlot>(
    controller: &mut FormController<S>,
    command: Command,
) -> Result<Option<String>> {
    let output = match command {
        Command::Set(field, raw) => {
            controller.type_into(field, &raw);
            let shown = controller.blur(field);
            format!("{}: {shown}\n", field_label(field))
        }
        Command::Submit => match controller.submit().await? {
            Some(record) => render_result(&record),
            None => "Width, height and price must be greater than zero\n".to_string(),
        },
        Command::Show => render_form(controller),
        Command::History => render_history(controller),
        Command::Edit(id) => {
            if controller.edit(&id) {
                render_form(controller)
            } else {
                format!("No calculation with id {id}\n")
            }
        }
        Command::Delete(id) => {
            controller.delete(&id).await?;
            format!("Deleted {id}\n")
        }
        Command::Cancel => {
            controller.reset();
            "Form cleared\n".to_string()
        }
        Command::Help => HELP_TEXT.to_string(),
        Command::Quit => return Ok(None),
    };
    Ok(Some(output))
}

/// Runs a session reading commands from `input` and writing responses to `output`,
/// until `quit` or end of input.
///
/// Storage errors are reported and the session continues.
///
/// # Errors
/// Returns an error if reading input or writing output fails.
pub async fn run_session<S, R, W>(
    controller: &mut FormController<S>,
    input: R,
    output: &mut W,
) -> Result<()>
where
    S: KeyValueSlot,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(HELP_TEXT.as_bytes()).await?;
    output.flush().await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                output.write_all(b"Unknown command, type `help`\n").await?;
                output.flush().await?;
            }
            continue;
        };

        match execute(controller, command).await {
            Ok(Some(text)) => output.write_all(text.as_bytes()).await?,
            Ok(None) => break,
            Err(e) => {
                error!("Command failed: {}", e);
                output.write_all(format!("Error: {e}\n").as_bytes()).await?;
            }
        }
        output.flush().await?;
    }

    info!("Calculator session ended");
    Ok(())
}

/// Runs a session on stdin/stdout.
///
/// # Errors
/// Returns an error if the terminal cannot be read or written.
pub async fn run<S: KeyValueSlot>(controller: &mut FormController<S>) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_session(controller, stdin, &mut stdout).await
}
