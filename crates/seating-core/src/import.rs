//! Guest-list import from delimited text.
//!
//! Two layouts are recognised:
//!
//! - **Structured**: the header names `First Name` and `Last Name` columns
//!   (an RSVP-site export). Each row can yield up to seven guests: the
//!   primary person, a partner, and up to five children, each built from a
//!   first/last column pair.
//! - **Simple**: anything else. Every line, the first included, yields its
//!   first field as a full name.
//!
//! Parsing is pure and never fails: missing columns read as empty and empty
//! names are skipped. Cells are split on `,` and have double quotes removed,
//! so quoted commas are not supported.

/// Column labels for the primary and partner name slots.
const NAMED_SLOTS: [(&str, &str); 2] = [
    ("First Name", "Last Name"),
    ("Partner First Name", "Partner Last Name"),
];

/// Number of child name slots in a structured row.
const CHILD_SLOTS: u8 = 5;

/// Which layout a payload was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// Header with first/last name columns.
    Structured,
    /// One name per line in the first field.
    Simple,
}

/// Guest names extracted from a payload, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    /// Detected layout.
    pub format: ImportFormat,
    /// Non-empty, trimmed names.
    pub names: Vec<String>,
}

/// Extract guest names from `text`.
///
/// An empty payload is read as [`ImportFormat::Simple`] with no names.
pub fn parse_guest_list(text: &str) -> ImportBatch {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect();

    let Some((header, rows)) = lines.split_first() else {
        return ImportBatch {
            format: ImportFormat::Simple,
            names: Vec::new(),
        };
    };

    if is_structured_header(header) {
        ImportBatch {
            format: ImportFormat::Structured,
            names: parse_structured(header, rows),
        }
    } else {
        ImportBatch {
            format: ImportFormat::Simple,
            names: lines
                .iter()
                .filter_map(|line| split_cells(line).into_iter().next())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }
}

fn is_structured_header(header: &str) -> bool {
    let lowered = header.to_lowercase();
    lowered.contains("first name") && lowered.contains("last name")
}

/// Split a line on commas, trimming cells and stripping double quotes.
fn split_cells(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().replace('"', ""))
        .collect()
}

/// Column indices of one first/last name slot.
#[derive(Debug, Clone, Copy)]
struct NameSlot {
    first: Option<usize>,
    last: Option<usize>,
}

impl NameSlot {
    fn locate(headers: &[String], first: &str, last: &str) -> Self {
        Self {
            first: column_index(headers, first),
            last: column_index(headers, last),
        }
    }

    /// The slot's combined name in `row`, or `None` when blank.
    fn name(self, row: &[String]) -> Option<String> {
        let first = cell(row, self.first);
        let last = cell(row, self.last);
        let name = format!("{first} {last}").trim().to_owned();
        (!name.is_empty()).then_some(name)
    }
}

fn column_index(headers: &[String], label: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(label))
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map_or("", String::as_str)
}

fn parse_structured(header: &str, rows: &[&str]) -> Vec<String> {
    let headers = split_cells(header);
    let mut slots: Vec<NameSlot> = NAMED_SLOTS
        .iter()
        .map(|(first, last)| NameSlot::locate(&headers, first, last))
        .collect();
    slots.extend((1..=CHILD_SLOTS).map(|n| {
        NameSlot::locate(
            &headers,
            &format!("Child {n} First Name"),
            &format!("Child {n} Last Name"),
        )
    }));

    rows.iter()
        .flat_map(|line| {
            let row = split_cells(line);
            slots
                .iter()
                .filter_map(|slot| slot.name(&row))
                .collect::<Vec<_>>()
        })
        .collect()
}
