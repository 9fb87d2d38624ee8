//! Console command parsing.

use transcode_core::Msg;

pub const HELP: &str = "\
Commands:
  <n>            open directory / toggle file at row n
  cd <name>      enter directory (cd .. goes up)
  up             go to parent directory
  sel <n> [...]  toggle the files at the given rows
  submit         queue the checked files
  refresh        reload the queue now
  ls             redraw the screen
  help           show this text
  quit           leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(Msg),
    /// Rows (zero based) whose files should be toggled.
    Select(Vec<usize>),
    Redraw,
    Help,
    Empty,
    Unknown(String),
}

/// Parses one input line. Row numbers are shown one-based.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if let Some(row) = parse_row(line) {
        return Command::Send(Msg::EntryActivated(row));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match (word, rest) {
        ("cd" | "open", name) if !name.is_empty() => {
            Command::Send(Msg::DirectoryClicked(name.to_string()))
        }
        ("up", "") => Command::Send(Msg::UpClicked),
        ("sel" | "select", rows) if !rows.is_empty() => {
            let parsed: Option<Vec<usize>> = rows.split_whitespace().map(parse_row).collect();
            match parsed {
                Some(rows) => Command::Select(rows),
                None => Command::Unknown(line.to_string()),
            }
        }
        ("submit" | "queue", "") => Command::Send(Msg::SubmitClicked),
        ("refresh" | "r", "") => Command::Send(Msg::RefreshClicked),
        ("ls" | "redraw", "") => Command::Redraw,
        ("help" | "?", "") => Command::Help,
        ("quit" | "exit" | "q", "") => Command::Send(Msg::Shutdown),
        _ => Command::Unknown(line.to_string()),
    }
}

fn parse_row(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}
