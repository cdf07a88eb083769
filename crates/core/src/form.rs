//! Form field model used by hydration
//!
//! A [`FormField`] is the DOM-independent stand-in for one input element tagged
//! with a dotted entity path: it knows its current value, what kind of input it
//! is, and carries the presentation state hydration writes back (confidence
//! mark, review notes, an undo snapshot).

use serde::{Deserialize, Serialize};

/// One option of a select input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    /// Visible label text
    #[serde(default)]
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Input kind of a form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Date,
    Select {
        #[serde(default)]
        options: Vec<SelectOption>,
    },
}

impl FieldKind {
    pub fn is_select(&self) -> bool {
        matches!(self, FieldKind::Select { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select { .. } => "select",
        }
    }
}

/// Visual confidence indicator applied after a fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMark {
    /// Confidence at or above the strong threshold
    Confirmed,
    /// Confidence between the weak and strong thresholds
    Caution,
    /// Value failed validation after the fill
    NeedsReview,
}

/// Form field descriptor plus the state hydration writes into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Dotted entity path (`data-field` attribute)
    pub path: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<FieldMark>,
    /// Review notes shown to the user (tooltip text)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Value before the last overwrite, for undo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl FormField {
    pub fn new(path: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            path: path.into(),
            kind,
            value: String::new(),
            mark: None,
            notes: Vec::new(),
            previous: None,
        }
    }

    pub fn text(path: impl Into<String>) -> Self {
        Self::new(path, FieldKind::Text)
    }

    pub fn number(path: impl Into<String>) -> Self {
        Self::new(path, FieldKind::Number)
    }

    pub fn date(path: impl Into<String>) -> Self {
        Self::new(path, FieldKind::Date)
    }

    pub fn select(path: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self::new(path, FieldKind::Select { options })
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Whether the field currently holds nothing
    ///
    /// Text inputs are trimmed; select values are compared as-is.
    pub fn is_empty(&self) -> bool {
        if self.kind.is_select() {
            self.value.is_empty()
        } else {
            self.value.trim().is_empty()
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }

    /// Write a new value, keeping the old one as an undo snapshot when it differs
    pub fn assign(&mut self, next: String) {
        if !self.value.is_empty() && self.value != next {
            self.previous = Some(std::mem::take(&mut self.value));
        }
        self.value = next;
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Drop any mark left by an earlier pass
    pub fn clear_mark(&mut self) {
        self.mark = None;
    }
}
