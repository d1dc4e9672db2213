//! Caret and selection state for the text shape being edited.
//!
//! All positions are char indices into the whole content, newline included,
//! in `0..=char_count`. Every index coming in is clamped first since many of
//! them come from approximate pixel math.

use crate::input::{Key, KeyEvent};
use crate::measure::TextMeasure;
use crate::shapes::{ShapeId, Text};
use kurbo::{Point, Rect};

/// Result of handling a key while editing.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEditResult {
    /// Caret or selection changed, content did not.
    Handled,
    /// Content changed; the caller swaps in the new string.
    Changed(String),
    /// The user wants to stop editing.
    ExitEdit,
    /// Not a text editing key.
    NotHandled,
}

/// Editing state for one text shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditState {
    pub shape_id: ShapeId,
    /// Set when the shape was created by this edit session.
    pub is_new: bool,
    cursor: usize,
    /// `(anchor, end)`; the selected range is `[min, max)`.
    selection: Option<(usize, usize)>,
    /// Timestamp of the last caret reset.
    blink_origin_ms: u64,
}

impl TextEditState {
    pub fn new(shape_id: ShapeId, cursor: usize, is_new: bool, now_ms: u64) -> Self {
        Self {
            shape_id,
            is_new,
            cursor,
            selection: None,
            blink_origin_ms: now_ms,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Raw `(anchor, end)` pair.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Selected range as `(min, max)`, `None` when nothing is selected.
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        self.selection
            .map(|(a, b)| (a.min(b), a.max(b)))
            .filter(|(start, end)| start != end)
    }

    /// Place the caret and drop any selection.
    pub fn set_cursor(&mut self, cursor: usize, content: &str) {
        self.cursor = cursor.min(char_count(content));
        self.selection = None;
    }

    pub fn select_all(&mut self, content: &str) {
        let len = char_count(content);
        self.cursor = len;
        self.selection = (len > 0).then_some((0, len));
    }

    /// Restart the blink cycle with the caret visible.
    pub fn reset_blink(&mut self, now_ms: u64) {
        self.blink_origin_ms = now_ms;
    }

    /// Caret is shown for the first `blink_ms` after a reset, hidden for the
    /// next `blink_ms`, and so on.
    pub fn caret_visible(&self, now_ms: u64, blink_ms: u64) -> bool {
        if blink_ms == 0 {
            return true;
        }
        (now_ms.saturating_sub(self.blink_origin_ms) / blink_ms) % 2 == 0
    }

    /// Apply a key press to `content`.
    pub fn handle_key(&mut self, event: &KeyEvent, content: &str, tab_width: usize) -> TextEditResult {
        let len = char_count(content);
        self.clamp_to(len);
        self.reset_blink(event.time_ms);

        let shift = event.modifiers.shift;
        let action = event.modifiers.action();

        match event.key {
            Key::Escape => TextEditResult::ExitEdit,
            Key::Char(c) if action => {
                if c.eq_ignore_ascii_case(&'a') {
                    self.select_all(content);
                    TextEditResult::Handled
                } else {
                    TextEditResult::NotHandled
                }
            }
            Key::Char(c) if c.is_control() => TextEditResult::NotHandled,
            Key::Char(c) => self.insert(content, &c.to_string()),
            Key::Enter => self.insert(content, "\n"),
            Key::Tab => self.insert(content, &" ".repeat(tab_width)),
            Key::Backspace => match self.selection_range() {
                Some(range) => self.delete_range(content, range),
                None if self.cursor > 0 => self.delete_range(content, (self.cursor - 1, self.cursor)),
                None => TextEditResult::Handled,
            },
            Key::Delete => match self.selection_range() {
                Some(range) => self.delete_range(content, range),
                None if self.cursor < len => self.delete_range(content, (self.cursor, self.cursor + 1)),
                None => TextEditResult::Handled,
            },
            Key::ArrowLeft => {
                if shift {
                    self.extend_to(self.cursor.saturating_sub(1));
                } else if let Some((start, _)) = self.selection_range() {
                    self.set_cursor(start, content);
                } else {
                    self.set_cursor(self.cursor.saturating_sub(1), content);
                }
                TextEditResult::Handled
            }
            Key::ArrowRight => {
                if shift {
                    self.extend_to((self.cursor + 1).min(len));
                } else if let Some((_, end)) = self.selection_range() {
                    self.set_cursor(end, content);
                } else {
                    self.set_cursor(self.cursor + 1, content);
                }
                TextEditResult::Handled
            }
            Key::ArrowUp | Key::ArrowDown => {
                let target = vertical_target(content, self.cursor, event.key == Key::ArrowDown);
                self.move_or_extend(target, shift, content);
                TextEditResult::Handled
            }
            Key::Home | Key::End => {
                let (line, _) = line_col(content, self.cursor);
                let target = if event.key == Key::Home {
                    position_of(content, line, 0)
                } else {
                    position_of(content, line, usize::MAX)
                };
                self.move_or_extend(target, shift, content);
                TextEditResult::Handled
            }
        }
    }

    fn clamp_to(&mut self, len: usize) {
        self.cursor = self.cursor.min(len);
        self.selection = self
            .selection
            .map(|(a, b)| (a.min(len), b.min(len)))
            .filter(|(a, b)| a != b);
    }

    /// Move the selection end to `target`, anchoring at the caret if there
    /// was no selection yet.
    fn extend_to(&mut self, target: usize) {
        let anchor = self.selection.map_or(self.cursor, |(anchor, _)| anchor);
        self.cursor = target;
        self.selection = (anchor != target).then_some((anchor, target));
    }

    fn move_or_extend(&mut self, target: usize, shift: bool, content: &str) {
        if shift {
            self.extend_to(target);
        } else {
            self.set_cursor(target, content);
        }
    }

    /// Replace the selection (if any) with `insert`.
    fn insert(&mut self, content: &str, insert: &str) -> TextEditResult {
        let (start, end) = self.selection_range().unwrap_or((self.cursor, self.cursor));
        let new_content = splice(content, start, end, insert);
        self.cursor = start + insert.chars().count();
        self.selection = None;
        TextEditResult::Changed(new_content)
    }

    fn delete_range(&mut self, content: &str, (start, end): (usize, usize)) -> TextEditResult {
        let new_content = splice(content, start, end, "");
        self.cursor = start;
        self.selection = None;
        TextEditResult::Changed(new_content)
    }
}

fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of char index `index`, clamped to the end of `s`.
fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(offset, _)| offset)
}

/// Replace chars `[start, end)` of `s` with `insert`.
fn splice(s: &str, start: usize, end: usize, insert: &str) -> String {
    let (start, end) = (byte_offset(s, start), byte_offset(s, end.max(start)));
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..start]);
    out.push_str(insert);
    out.push_str(&s[end..]);
    out
}

/// Char lengths of each line.
fn line_lengths(content: &str) -> Vec<usize> {
    content.split('\n').map(char_count).collect()
}

/// Line and column of a caret position.
pub fn line_col(content: &str, position: usize) -> (usize, usize) {
    let mut remaining = position.min(char_count(content));
    let lengths = line_lengths(content);
    let last = lengths.len() - 1;
    for (line, len) in lengths.iter().enumerate() {
        if remaining <= *len || line == last {
            return (line, remaining.min(*len));
        }
        // Skip the line and its newline.
        remaining -= len + 1;
    }
    (last, 0)
}

/// Caret position of `(line, col)`, both clamped.
pub fn position_of(content: &str, line: usize, col: usize) -> usize {
    let lengths = line_lengths(content);
    let line = line.min(lengths.len() - 1);
    let start: usize = lengths[..line].iter().map(|len| len + 1).sum();
    start + col.min(lengths[line])
}

/// Same column on the previous or next line; unchanged at the first or last line.
fn vertical_target(content: &str, cursor: usize, down: bool) -> usize {
    let (line, col) = line_col(content, cursor);
    let line_count = line_lengths(content).len();
    match (down, line) {
        (false, 0) => cursor,
        (false, line) => position_of(content, line - 1, col),
        (true, line) if line + 1 >= line_count => cursor,
        (true, line) => position_of(content, line + 1, col),
    }
}

/// Caret position nearest to a canvas-space point inside `text`.
///
/// The line is picked from the y offset, then each candidate offset on that
/// line is measured and the one whose x lies closest to the click wins.
pub fn caret_from_point(text: &Text, point: Point, measure: &dyn TextMeasure) -> usize {
    let lines = text.lines();
    let line_height = text.line_height(measure);
    let raw_line = if line_height > 0.0 {
        ((point.y - text.position.y) / line_height).floor()
    } else {
        0.0
    };
    let line = (raw_line.max(0.0) as usize).min(lines.len() - 1);
    let target_x = point.x - text.position.x;

    let line_text = lines[line];
    let mut best_col = 0;
    let mut best_dist = f64::INFINITY;
    for col in 0..=char_count(line_text) {
        let prefix = &line_text[..byte_offset(line_text, col)];
        let x = measure.width(prefix, text.font_size, text.font_family);
        let dist = (x - target_x).abs();
        if dist < best_dist {
            best_dist = dist;
            best_col = col;
        }
    }
    position_of(&text.content, line, best_col)
}

/// Canvas-space top point of the caret and its height.
pub fn caret_geometry(text: &Text, position: usize, measure: &dyn TextMeasure) -> (Point, f64) {
    let (line, col) = line_col(&text.content, position);
    let line_height = text.line_height(measure);
    let line_text = text.lines()[line];
    let prefix = &line_text[..byte_offset(line_text, col)];
    let x = text.position.x + measure.width(prefix, text.font_size, text.font_family);
    let y = text.position.y + line as f64 * line_height;
    (Point::new(x, y), line_height)
}

/// Canvas-space highlight rectangles for the char range `[start, end)`, one
/// per touched line.
pub fn selection_rects(
    text: &Text,
    (start, end): (usize, usize),
    measure: &dyn TextMeasure,
) -> Vec<Rect> {
    let (start_line, start_col) = line_col(&text.content, start);
    let (end_line, end_col) = line_col(&text.content, end);
    let line_height = text.line_height(measure);
    let lines = text.lines();
    let width_of = |line: &str, col: usize| {
        measure.width(&line[..byte_offset(line, col)], text.font_size, text.font_family)
    };

    (start_line..=end_line)
        .filter_map(|line| {
            let line_text = lines.get(line)?;
            let from = if line == start_line { start_col } else { 0 };
            let to = if line == end_line {
                end_col
            } else {
                char_count(line_text)
            };
            let x0 = text.position.x + width_of(line_text, from);
            let x1 = text.position.x + width_of(line_text, to);
            let y0 = text.position.y + line as f64 * line_height;
            Some(Rect::new(x0, y0, x1, y0 + line_height))
        })
        .collect()
}
