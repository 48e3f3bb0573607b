//! Shell command parsing.
//!
//! One command per line. Words are separated by whitespace; a double-quoted
//! run (which may sit inside a word, as in `@"Head Table"`) is kept together
//! with the quotes removed. Guest and table arguments are references that
//! the shell resolves later, by id or by name.

use std::path::PathBuf;

use crate::error::CommandError;

/// Text printed by `help`.
pub const HELP: &str = "\
commands:
  guest add <name> [@<table>]      add a guest, optionally seating them
  guest rm <guest>                 delete a guest
  guest unseat <guest>             move a guest back to unassigned
  seat <guest> <table> [<seat>]    seat a guest (first free seat, or seat 1..n)
  table add [<capacity>]           add a table
  table rm <table>                 delete a table, unassigning its guests
  table rename <table> <name>      rename a table
  table move <table> <dx> <dy>     move a table on the canvas
  table clear <table>              unassign everyone at a table
  import <file>                    import a guest list (CSV)
  undo | redo                      step through history
  list                             show every table and the unassigned guests
  unassigned [<query>]             list unassigned guests, optionally filtered
  show <table>                     show a table's seats
  fit <width> <height>             fit all tables into a viewport of that size
  help | quit
guests and tables can be named by id or by name; quote names with spaces.";

/// A parsed shell command. References are unresolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `guest add <name> [@<table>]`
    AddGuest {
        /// Display name.
        name: String,
        /// Table to seat the guest at.
        table: Option<String>,
    },
    /// `guest rm <guest>`
    RemoveGuest(String),
    /// `guest unseat <guest>`
    UnseatGuest(String),
    /// `seat <guest> <table> [<seat>]`
    Seat {
        /// Guest reference.
        guest: String,
        /// Table reference.
        table: String,
        /// Zero-based seat, already converted from the 1-based input.
        seat: Option<u32>,
    },
    /// `table add [<capacity>]`
    AddTable(Option<u32>),
    /// `table rm <table>`
    RemoveTable(String),
    /// `table rename <table> <name>`
    RenameTable {
        /// Table reference.
        table: String,
        /// New name.
        name: String,
    },
    /// `table move <table> <dx> <dy>`
    MoveTable {
        /// Table reference.
        table: String,
        /// Horizontal offset.
        dx: f64,
        /// Vertical offset.
        dy: f64,
    },
    /// `table clear <table>`
    ClearTable(String),
    /// `import <file>`
    Import(PathBuf),
    /// `undo`
    Undo,
    /// `redo`
    Redo,
    /// `list`
    List,
    /// `unassigned [<query>]`
    Unassigned(String),
    /// `show <table>`
    Show(String),
    /// `fit <width> <height>`
    Fit {
        /// Viewport width in pixels.
        width: f64,
        /// Viewport height in pixels.
        height: f64,
    },
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let words = tokenize(trimmed)?;
    let Some((head, rest)) = words.split_first() else {
        return Ok(None);
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    let command = match (head.to_lowercase().as_str(), rest.as_slice()) {
        ("guest", [sub, args @ ..]) => parse_guest(sub, args)?,
        ("table", [sub, args @ ..]) => parse_table(sub, args)?,
        ("guest", []) => return Err(CommandError::Usage("guest add|rm|unseat ...")),
        ("table", []) => return Err(CommandError::Usage("table add|rm|rename|move|clear ...")),
        ("seat", [guest, table]) => Command::Seat {
            guest: (*guest).to_owned(),
            table: (*table).to_owned(),
            seat: None,
        },
        ("seat", [guest, table, seat]) => Command::Seat {
            guest: (*guest).to_owned(),
            table: (*table).to_owned(),
            seat: Some(parse_seat_number(seat)?),
        },
        ("seat", _) => return Err(CommandError::Usage("seat <guest> <table> [<seat>]")),
        ("import", []) => return Err(CommandError::Usage("import <file>")),
        ("import", parts) => Command::Import(PathBuf::from(parts.join(" "))),
        ("undo", []) => Command::Undo,
        ("redo", []) => Command::Redo,
        ("list" | "ls", []) => Command::List,
        ("unassigned", query) => Command::Unassigned(query.join(" ")),
        ("show", [table]) => Command::Show((*table).to_owned()),
        ("show", _) => return Err(CommandError::Usage("show <table>")),
        ("fit", [width, height]) => Command::Fit {
            width: parse_number(width)?,
            height: parse_number(height)?,
        },
        ("fit", _) => return Err(CommandError::Usage("fit <width> <height>")),
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        ("undo" | "redo" | "list" | "ls" | "quit" | "exit", _) => {
            return Err(CommandError::Usage("this command takes no arguments"));
        }
        (other, _) => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn parse_guest(sub: &str, args: &[&str]) -> Result<Command, CommandError> {
    match (sub.to_lowercase().as_str(), args) {
        ("add", []) => Err(CommandError::Usage("guest add <name> [@<table>]")),
        ("add", words) => {
            let (table, name_words) = match words.split_last() {
                Some((last, init)) if last.starts_with('@') => {
                    (Some(last.trim_start_matches('@').to_owned()), init)
                }
                _ => (None, words),
            };
            if table.as_deref() == Some("") {
                return Err(CommandError::Usage("guest add <name> [@<table>]"));
            }
            Ok(Command::AddGuest {
                name: name_words.join(" "),
                table,
            })
        }
        ("rm" | "remove", [guest]) => Ok(Command::RemoveGuest((*guest).to_owned())),
        ("rm" | "remove", _) => Err(CommandError::Usage("guest rm <guest>")),
        ("unseat", [guest]) => Ok(Command::UnseatGuest((*guest).to_owned())),
        ("unseat", _) => Err(CommandError::Usage("guest unseat <guest>")),
        (other, _) => Err(CommandError::Unknown(format!("guest {other}"))),
    }
}

fn parse_table(sub: &str, args: &[&str]) -> Result<Command, CommandError> {
    match (sub.to_lowercase().as_str(), args) {
        ("add", []) => Ok(Command::AddTable(None)),
        ("add", [capacity]) => Ok(Command::AddTable(Some(parse_count(capacity)?))),
        ("add", _) => Err(CommandError::Usage("table add [<capacity>]")),
        ("rm" | "remove", [table]) => Ok(Command::RemoveTable((*table).to_owned())),
        ("rm" | "remove", _) => Err(CommandError::Usage("table rm <table>")),
        ("rename", [table, name @ ..]) if !name.is_empty() => Ok(Command::RenameTable {
            table: (*table).to_owned(),
            name: name.join(" "),
        }),
        ("rename", _) => Err(CommandError::Usage("table rename <table> <name>")),
        ("move", [table, dx, dy]) => Ok(Command::MoveTable {
            table: (*table).to_owned(),
            dx: parse_number(dx)?,
            dy: parse_number(dy)?,
        }),
        ("move", _) => Err(CommandError::Usage("table move <table> <dx> <dy>")),
        ("clear", [table]) => Ok(Command::ClearTable((*table).to_owned())),
        ("clear", _) => Err(CommandError::Usage("table clear <table>")),
        (other, _) => Err(CommandError::Unknown(format!("table {other}"))),
    }
}

/// Split a line into words, honouring double quotes.
pub fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn parse_count(raw: &str) -> Result<u32, CommandError> {
    raw.parse::<u32>()
        .ok()
        .ok_or_else(|| CommandError::InvalidNumber(raw.to_owned()))
}

/// Convert a 1-based seat number to a zero-based index.
fn parse_seat_number(raw: &str) -> Result<u32, CommandError> {
    parse_count(raw)?
        .checked_sub(1)
        .ok_or(CommandError::SeatNumberZero)
}

fn parse_number(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber(raw.to_owned()))
}
