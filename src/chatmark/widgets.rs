//! Leaf widgets of the ChatMark protocol
//!
//! Each widget serializes itself into a fragment of the block and later picks
//! its own fields out of the host response by stable identifier. Widgets never
//! hold the transport or see their siblings.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ConfigurationError, RenderError};

use super::transport::{FormResponse, Transport};

// Identifier allocation is append-only; uniqueness per process is all the
// protocol needs for fragments within one block.
static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(0);

fn next_id(prefix: &str) -> String {
    let n = NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed);
    format!("{}{}", prefix, n)
}

/// A serializable, response-parsing UI element
pub trait Widget {
    /// Stable identifier carried by this widget's fragment
    fn id(&self) -> &str;

    /// Produce this widget's fragment of the block. Deterministic for a given
    /// configuration; no side effects.
    fn serialize(&self) -> String;

    /// Extract this widget's own fields from the full host response. Absent
    /// fields mean "no selection" / "no edit", never an error.
    fn parse_response(&mut self, response: &FormResponse);
}

/// Render a single widget outside a form: one block, one round-trip, one parse.
///
/// Used for direct flows such as showing a lone text editor; forms go through
/// [`super::Form::render`] instead.
pub fn render_widget(
    widget: &mut dyn Widget,
    transport: &mut dyn Transport,
) -> Result<(), RenderError> {
    let block = format!("```chatmark\n{}\n```", widget.serialize());
    let response = transport.round_trip(&block)?;
    widget.parse_response(&response);
    Ok(())
}

/// Multi-select over an ordered list of labeled options
#[derive(Debug, Clone)]
pub struct Checkbox {
    id: String,
    options: Vec<String>,
    initial_states: Vec<bool>,
    selections: Vec<usize>,
}

impl Checkbox {
    /// Create a checkbox; `options` and `initial_states` must be parallel
    pub fn new(options: Vec<String>, initial_states: Vec<bool>) -> Result<Self, ConfigurationError> {
        if options.len() != initial_states.len() {
            return Err(ConfigurationError::CheckboxLengthMismatch {
                options: options.len(),
                states: initial_states.len(),
            });
        }
        Ok(Self {
            id: next_id("cb"),
            options,
            initial_states,
            selections: Vec::new(),
        })
    }

    /// Create a checkbox with every option initially in the same state
    pub fn uniform(options: Vec<String>, checked: bool) -> Result<Self, ConfigurationError> {
        let states = vec![checked; options.len()];
        Self::new(options, states)
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Indices the user left checked, ascending by original option index.
    /// Empty when nothing was selected or the form was never submitted.
    pub fn selections(&self) -> &[usize] {
        &self.selections
    }

    /// Identifier of one option's fragment, e.g. "cb0-2"
    pub fn option_id(&self, index: usize) -> String {
        format!("{}-{}", self.id, index)
    }
}

impl Widget for Checkbox {
    fn id(&self) -> &str {
        &self.id
    }

    fn serialize(&self) -> String {
        let mut lines = Vec::with_capacity(self.options.len());
        for (i, (label, checked)) in self.options.iter().zip(&self.initial_states).enumerate() {
            let mark = if *checked { "x" } else { "" };
            lines.push(format!("> [{}]({}) {}", mark, self.option_id(i), label));
        }
        lines.join("\n")
    }

    fn parse_response(&mut self, response: &FormResponse) {
        // Walk options in order so selections stay ascending regardless of the
        // order the host reports them.
        self.selections = (0..self.options.len())
            .filter(|i| response.is_checked(&self.option_id(*i)) == Some(true))
            .collect();
    }
}

/// A single editable text block
#[derive(Debug, Clone)]
pub struct TextEditor {
    id: String,
    text: String,
    new_text: Option<String>,
}

impl TextEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: next_id("ed"),
            text: text.into(),
            new_text: None,
        }
    }

    /// The edited text. `None` means the host reported nothing for this
    /// editor (cancelled or unchanged-and-omitted) — distinct from the user
    /// submitting an empty string.
    pub fn new_text(&self) -> Option<&str> {
        self.new_text.as_deref()
    }
}

impl Widget for TextEditor {
    fn id(&self) -> &str {
        &self.id
    }

    fn serialize(&self) -> String {
        let mut lines = vec![format!("> | ({})", self.id)];
        for line in self.text.lines() {
            lines.push(format!("> {}", line));
        }
        lines.join("\n")
    }

    fn parse_response(&mut self, response: &FormResponse) {
        self.new_text = response.text(&self.id).map(String::from);
    }
}

/// A named action trigger
///
/// Valid only as a terminal element in direct render flows; never composable
/// inside a [`super::Form`].
#[derive(Debug, Clone)]
pub struct Button {
    id: String,
    label: String,
    action_id: String,
    clicked: bool,
}

impl Button {
    pub fn new(label: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            id: next_id("btn"),
            label: label.into(),
            action_id: action_id.into(),
            clicked: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn clicked(&self) -> bool {
        self.clicked
    }
}

impl Widget for Button {
    fn id(&self) -> &str {
        &self.id
    }

    fn serialize(&self) -> String {
        format!("> ({}) {}", self.id, self.label)
    }

    fn parse_response(&mut self, response: &FormResponse) {
        self.clicked = response.is_checked(&self.id) == Some(true);
    }
}
