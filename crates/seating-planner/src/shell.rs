//! The interactive shell: resolves references, drives the engine, renders
//! replies, and saves after every state-producing command.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use seating_core::{Placement, PlannerConfig, SeatingEngine, Size, Viewport};
use seating_db::{KeyValueStore, StateStore};
use seating_types::{GuestId, Position, Table, TableId};
use tracing::{debug, error, info};

use crate::command::{self, Command, HELP};
use crate::error::{CommandError, PlannerError};

/// What a successfully handled line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The state changed; print this and save.
    Changed(String),
    /// Read-only output.
    Info(String),
    /// Blank line or comment.
    Nothing,
    /// Stop reading input.
    Quit,
}

/// Command shell over one engine and one state store.
pub struct Shell<S> {
    engine: SeatingEngine,
    store: StateStore<S>,
    viewport: Viewport,
    default_capacity: u32,
    max_capacity: u32,
}

impl<S: KeyValueStore> Shell<S> {
    /// Wrap an engine and the store its state is saved to.
    pub fn new(engine: SeatingEngine, store: StateStore<S>, config: &PlannerConfig) -> Self {
        Self {
            engine,
            store,
            viewport: Viewport::new(config.viewport.clone()),
            default_capacity: config.tables.default_capacity,
            max_capacity: config.tables.max_capacity,
        }
    }

    /// Read commands from `input` until it ends or `quit` is given.
    ///
    /// Rejected commands are reported on `output` and do not stop the loop.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Io`] if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
        prompt: bool,
    ) -> Result<(), PlannerError> {
        if prompt {
            write!(output, "> ")?;
            output.flush()?;
        }
        for line in input.lines() {
            let line = line?;
            match self.execute_line(&line) {
                Ok(Reply::Changed(text)) => {
                    writeln!(output, "{text}")?;
                    self.persist(output)?;
                }
                Ok(Reply::Info(text)) => writeln!(output, "{text}")?,
                Ok(Reply::Nothing) => {}
                Ok(Reply::Quit) => break,
                Err(err) => writeln!(output, "{}", describe_error(&err))?,
            }
            if prompt {
                write!(output, "> ")?;
                output.flush()?;
            }
        }
        Ok(())
    }

    /// Parse and run one line.
    pub fn execute_line(&mut self, line: &str) -> Result<Reply, CommandError> {
        let Some(command) = command::parse_line(line)? else {
            return Ok(Reply::Nothing);
        };
        debug!(?command, "Executing command");
        self.execute(command)
    }

    fn persist<W: Write>(&mut self, output: &mut W) -> Result<(), PlannerError> {
        if let Err(err) = self.store.save(self.engine.state()) {
            error!(error = %err, "Failed to save seating state");
            writeln!(output, "warning: changes not saved: {err}")?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, command: Command) -> Result<Reply, CommandError> {
        let reply = match command {
            Command::AddGuest { name, table } => {
                let (guest, placed) = match table {
                    Some(reference) => {
                        let table = self.resolve_table(&reference)?;
                        let (guest, seat) = self.engine.create_guest_at_table(&name, table)?;
                        let placed = seat.map_or_else(
                            || format!("unassigned, {} is full", self.table_name(table)),
                            |seat| self.describe_seat(table, seat),
                        );
                        (guest, placed)
                    }
                    None => (self.engine.create_guest(&name)?, "unassigned".to_owned()),
                };
                Reply::Changed(format!("added {} ({placed})", self.guest_name(guest)))
            }
            Command::RemoveGuest(reference) => {
                let guest = self.resolve_guest(&reference)?;
                let removed = self.engine.delete_guest(guest)?;
                Reply::Changed(format!("removed {}", removed.name))
            }
            Command::UnseatGuest(reference) => {
                let guest = self.resolve_guest(&reference)?;
                let freed = self.engine.unassign_from_table(guest)?;
                let from = freed.map_or_else(String::new, |(table, seat)| {
                    format!(" from {}", self.describe_seat(table, seat))
                });
                Reply::Changed(format!("{} unassigned{from}", self.guest_name(guest)))
            }
            Command::Seat { guest, table, seat } => {
                let guest = self.resolve_guest(&guest)?;
                let table = self.resolve_table(&table)?;
                self.seat(guest, table, seat)?
            }
            Command::AddTable(capacity) => {
                let capacity = capacity.unwrap_or(self.default_capacity);
                if capacity > self.max_capacity {
                    return Err(CommandError::CapacityTooLarge {
                        capacity,
                        max: self.max_capacity,
                    });
                }
                let table = self.engine.create_table(capacity, None)?;
                let position = self
                    .engine
                    .table(table)
                    .map_or(Position::ORIGIN, |t| t.position);
                Reply::Changed(format!(
                    "added {} ({capacity} seats) at {}",
                    self.table_name(table),
                    format_position(position)
                ))
            }
            Command::RemoveTable(reference) => {
                let table = self.resolve_table(&reference)?;
                let name = self.table_name(table);
                let released = self.engine.delete_table(table)?;
                Reply::Changed(format!(
                    "removed {name}; {} guest(s) unassigned",
                    released.len()
                ))
            }
            Command::RenameTable { table, name } => {
                let table = self.resolve_table(&table)?;
                let old = self.table_name(table);
                self.engine.rename_table(table, &name)?;
                Reply::Changed(format!("renamed {old} to {}", self.table_name(table)))
            }
            Command::MoveTable { table, dx, dy } => {
                let table = self.resolve_table(&table)?;
                let position = self.engine.move_table(table, Position::new(dx, dy))?;
                Reply::Changed(format!(
                    "{} moved to {}",
                    self.table_name(table),
                    format_position(position)
                ))
            }
            Command::ClearTable(reference) => {
                let table = self.resolve_table(&reference)?;
                let released = self.engine.clear_table(table)?;
                Reply::Changed(format!(
                    "cleared {}; {} guest(s) unassigned",
                    self.table_name(table),
                    released.len()
                ))
            }
            Command::Import(path) => {
                let text = std::fs::read_to_string(&path).map_err(|source| {
                    CommandError::ReadFile {
                        path: path.clone(),
                        source,
                    }
                })?;
                let report = self.engine.import_guests_from_text(&text)?;
                info!(
                    path = %path.display(),
                    imported = report.imported.len(),
                    "Imported guest list"
                );
                Reply::Changed(format!(
                    "imported {} guest(s) ({:?} format)",
                    report.imported.len(),
                    report.format
                ))
            }
            Command::Undo => {
                self.engine.undo()?;
                Reply::Changed("undone".to_owned())
            }
            Command::Redo => {
                self.engine.redo()?;
                Reply::Changed("redone".to_owned())
            }
            Command::List => Reply::Info(self.render_overview()),
            Command::Unassigned(query) => Reply::Info(self.render_unassigned(&query)),
            Command::Show(reference) => {
                let table = self.resolve_table(&reference)?;
                Reply::Info(self.render_table(table))
            }
            Command::Fit { width, height } => {
                let tables = self.engine.tables();
                if self.viewport.fit_all(tables, Size::new(width, height)) {
                    let pan = self.viewport.pan();
                    Reply::Info(format!(
                        "zoom {:.0}%, pan {}",
                        self.viewport.zoom() * 100.0,
                        format_position(pan)
                    ))
                } else {
                    Reply::Info("no tables to fit".to_owned())
                }
            }
            Command::Help => Reply::Info(HELP.to_owned()),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    fn seat(
        &mut self,
        guest: GuestId,
        table: TableId,
        seat: Option<u32>,
    ) -> Result<Reply, CommandError> {
        let Some(seat) = seat else {
            let seat = self.engine.assign_to_first_available_seat(guest, table)?;
            return Ok(Reply::Changed(format!(
                "{} -> {}",
                self.guest_name(guest),
                self.describe_seat(table, seat)
            )));
        };
        let placement = self.engine.assign_to_specific_seat(guest, table, seat)?;
        let mut text = format!(
            "{} -> {}",
            self.guest_name(guest),
            self.describe_seat(table, seat)
        );
        match placement {
            Placement::Seated { .. } => {}
            Placement::Swapped {
                displaced,
                displaced_to: (to_table, to_seat),
            } => {
                let _ = write!(
                    text,
                    "; {} moved to {}",
                    self.guest_name(displaced),
                    self.describe_seat(to_table, to_seat)
                );
            }
            Placement::Displaced { displaced } => {
                let _ = write!(text, "; {} is now unassigned", self.guest_name(displaced));
            }
        }
        Ok(Reply::Changed(text))
    }

    // -------------------------------------------------------------------
    // Reference resolution
    // -------------------------------------------------------------------

    /// Find a guest by id, or by a name matched case-insensitively.
    fn resolve_guest(&self, reference: &str) -> Result<GuestId, CommandError> {
        if let Ok(id) = reference.parse::<GuestId>()
            && self.engine.guest(id).is_some()
        {
            return Ok(id);
        }
        let needle = reference.trim().to_lowercase();
        unique(
            "guest",
            reference,
            self.engine
                .guests()
                .iter()
                .filter(|g| g.name.to_lowercase() == needle)
                .map(|g| g.id),
        )
    }

    /// Find a table by id, or by a name matched case-insensitively.
    fn resolve_table(&self, reference: &str) -> Result<TableId, CommandError> {
        if let Ok(id) = reference.parse::<TableId>()
            && self.engine.table(id).is_some()
        {
            return Ok(id);
        }
        let needle = reference.trim().to_lowercase();
        unique(
            "table",
            reference,
            self.engine
                .tables()
                .iter()
                .filter(|t| t.name.to_lowercase() == needle)
                .map(|t| t.id),
        )
    }

    // -------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------

    fn guest_name(&self, id: GuestId) -> String {
        self.engine
            .guest(id)
            .map_or_else(|| id.to_string(), |g| g.name.clone())
    }

    fn table_name(&self, id: TableId) -> String {
        self.engine
            .table(id)
            .map_or_else(|| id.to_string(), |t| t.name.clone())
    }

    fn describe_seat(&self, table: TableId, seat: u32) -> String {
        format!("{} seat {}", self.table_name(table), seat.saturating_add(1))
    }

    fn render_overview(&self) -> String {
        let mut out = String::new();
        for table in self.engine.tables() {
            let _ = writeln!(out, "{}", table_heading(table));
            for (seat, occupant) in self.seats(table) {
                if let Some(guest) = occupant {
                    let _ = writeln!(
                        out,
                        "  {:>2}. {}",
                        seat.saturating_add(1),
                        self.guest_name(guest)
                    );
                }
            }
        }
        out.push_str(&self.render_unassigned(""));
        out
    }

    fn render_unassigned(&self, query: &str) -> String {
        let guests = self.engine.search_unassigned(query);
        let names: Vec<&str> = guests.iter().map(|g| g.name.as_str()).collect();
        if names.is_empty() {
            if query.trim().is_empty() {
                "no unassigned guests".to_owned()
            } else {
                format!("no unassigned guests match {query:?}")
            }
        } else {
            format!("unassigned ({}): {}", names.len(), names.join(", "))
        }
    }

    fn render_table(&self, id: TableId) -> String {
        let Some(table) = self.engine.table(id) else {
            return format!("unknown table {id}");
        };
        let mut out = table_heading(table);
        for (seat, occupant) in self.seats(table) {
            let name = occupant.map_or_else(|| "(empty)".to_owned(), |g| self.guest_name(g));
            let _ = write!(out, "\n  {:>2}. {name}", seat.saturating_add(1));
        }
        out
    }

    fn seats(&self, table: &Table) -> Vec<(u32, Option<GuestId>)> {
        self.engine
            .seat_map(table.id)
            .unwrap_or_default()
            .into_iter()
            .zip(0..)
            .map(|(occupant, seat)| (seat, occupant))
            .collect()
    }
}

fn table_heading(table: &Table) -> String {
    format!(
        "{} [{}/{}] at {}",
        table.name,
        table.occupancy(),
        table.capacity,
        format_position(table.position)
    )
}

fn format_position(position: Position) -> String {
    format!("({:.0}, {:.0})", position.x, position.y)
}

/// Exactly one match, or the matching error.
fn unique<T>(
    kind: &'static str,
    reference: &str,
    mut matches: impl Iterator<Item = T>,
) -> Result<T, CommandError> {
    let Some(first) = matches.next() else {
        return Err(CommandError::NoMatch {
            kind,
            reference: reference.to_owned(),
        });
    };
    let others = matches.count();
    if others > 0 {
        return Err(CommandError::Ambiguous {
            kind,
            reference: reference.to_owned(),
            count: others.saturating_add(1),
        });
    }
    Ok(first)
}

/// One-line message for a rejected command.
pub fn describe_error(err: &CommandError) -> String {
    match err {
        CommandError::Seating(inner) if inner.is_no_op() => format!("nothing to do: {inner}"),
        other => format!("error: {other}"),
    }
}
