use crate::grid::Position;
use crate::recorder::Operation;
use std::cmp::Ordering;

/// Rendered in place of a missing parent coordinate.
pub const NONE_GLYPH: &str = "Ø";

#[derive(Debug, Clone, PartialEq)]
pub struct SetEntry {
    pub position: Position,
    pub f: Option<f64>,
    pub parent: Option<Position>,
}

impl From<&Operation> for SetEntry {
    fn from(op: &Operation) -> Self {
        SetEntry {
            position: op.position,
            f: op.f,
            parent: op.parent,
        }
    }
}

impl SetEntry {
    /// `B2 (A1) 3.41`: coordinate, parent coordinate, truncated `f`.
    pub fn line(&self) -> String {
        let parent = self
            .parent
            .map(coordinate_label)
            .unwrap_or_else(|| NONE_GLYPH.to_string());
        format!("{} ({}) {}", coordinate_label(self.position), parent, format_score(self.f))
    }
}

/// Both tables, each kept sorted ascending by `f`. A coordinate lives in at
/// most one of them.
#[derive(Debug, Clone, Default)]
pub struct SetTracker {
    open: Vec<SetEntry>,
    closed: Vec<SetEntry>,
}

impl SetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> &[SetEntry] {
        &self.open
    }

    pub fn closed(&self) -> &[SetEntry] {
        &self.closed
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.closed.is_empty()
    }

    pub fn clear(&mut self) {
        self.open.clear();
        self.closed.clear();
    }

    pub fn add_opened(&mut self, op: &Operation) {
        self.closed.retain(|entry| entry.position != op.position);
        upsert(&mut self.open, SetEntry::from(op));
    }

    pub fn add_closed(&mut self, op: &Operation) {
        self.open.retain(|entry| entry.position != op.position);
        upsert(&mut self.closed, SetEntry::from(op));
    }

    pub fn open_lines(&self) -> Vec<String> {
        self.open.iter().map(SetEntry::line).collect()
    }

    pub fn closed_lines(&self) -> Vec<String> {
        self.closed.iter().map(SetEntry::line).collect()
    }
}

fn upsert(list: &mut Vec<SetEntry>, entry: SetEntry) {
    match list.iter_mut().find(|existing| existing.position == entry.position) {
        Some(existing) => *existing = entry,
        None => list.push(entry),
    }
    // Stable: equal scores keep insertion order.
    list.sort_by(|a, b| compare_scores(a.f, b.f));
}

/// Missing scores sort after every real one.
fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Truncates (never rounds) to two decimals.
pub fn format_score(f: Option<f64>) -> String {
    match f {
        Some(f) if f.is_finite() => {
            // A relative nudge absorbs binary noise such as 0.29 * 100 = 28.999...
            // without lifting values that really sit below the next hundredth.
            let scaled = f * 100.0;
            let truncated = (scaled + scaled * 1e-12).trunc() / 100.0;
            format!("{:.2}", truncated)
        }
        Some(f) => format!("{}", f),
        None => "-".to_string(),
    }
}

/// Column letters run A..Z, then AA, AB, ... like spreadsheet columns.
pub fn column_label(mut x: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (x % 26) as u8);
        if x < 26 {
            break;
        }
        x = x / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Column letter followed by the 1-based row number, e.g. `(1, 1)` is `B2`.
pub fn coordinate_label(pos: Position) -> String {
    format!("{}{}", column_label(pos.x), pos.y + 1)
}
