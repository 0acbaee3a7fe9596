//! Form container and its render-once lifecycle

use tracing::debug;

use crate::error::{ConfigurationError, LifecycleError, RenderError};

use super::transport::Transport;
use super::widgets::{Button, Checkbox, TextEditor, Widget};

/// One element of a form: a literal text line or a widget.
///
/// A closed set: response dispatch matches on the variant, no runtime type
/// inspection. `Button` is carried here only so `Form::new` can reject it.
#[derive(Debug)]
pub enum Component {
    Text(String),
    Checkbox(Checkbox),
    TextEditor(TextEditor),
    Button(Button),
}

impl Component {
    pub fn as_checkbox(&self) -> Option<&Checkbox> {
        match self {
            Component::Checkbox(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_text_editor(&self) -> Option<&TextEditor> {
        match self {
            Component::TextEditor(e) => Some(e),
            _ => None,
        }
    }

    fn as_widget(&self) -> Option<&dyn Widget> {
        match self {
            Component::Text(_) => None,
            Component::Checkbox(c) => Some(c),
            Component::TextEditor(e) => Some(e),
            Component::Button(b) => Some(b),
        }
    }

    fn as_widget_mut(&mut self) -> Option<&mut dyn Widget> {
        match self {
            Component::Text(_) => None,
            Component::Checkbox(c) => Some(c),
            Component::TextEditor(e) => Some(e),
            Component::Button(b) => Some(b),
        }
    }
}

impl From<Checkbox> for Component {
    fn from(c: Checkbox) -> Self {
        Component::Checkbox(c)
    }
}

impl From<TextEditor> for Component {
    fn from(e: TextEditor) -> Self {
        Component::TextEditor(e)
    }
}

impl From<&str> for Component {
    fn from(s: &str) -> Self {
        Component::Text(s.to_string())
    }
}

impl From<String> for Component {
    fn from(s: String) -> Self {
        Component::Text(s)
    }
}

/// An ordered composite of widgets and literal text that renders once and
/// receives one structured response.
///
/// The form exclusively owns its components; after [`Form::render`] returns,
/// each widget's result is read back through [`Form::components`]. There is no
/// aggregated accessor: every widget owns its own output field.
#[derive(Debug)]
pub struct Form {
    components: Vec<Component>,
    title: Option<String>,
    rendered: bool,
}

impl Form {
    /// Create a form from components and an optional title.
    ///
    /// Buttons are terminal elements and may not appear among a form's
    /// components; attempting it is a caller error, never silently dropped.
    pub fn new(
        components: Vec<Component>,
        title: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        if components
            .iter()
            .any(|c| matches!(c, Component::Button(_)))
        {
            return Err(ConfigurationError::ButtonInForm);
        }
        Ok(Self {
            components,
            title,
            rendered: false,
        })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Serialize title and components, in order, into the block body
    fn serialize_body(&self) -> String {
        let mut lines = Vec::new();

        if let Some(title) = &self.title {
            lines.push(title.clone());
        }

        for component in &self.components {
            match component {
                Component::Text(text) => lines.push(text.clone()),
                other => {
                    if let Some(widget) = other.as_widget() {
                        lines.push(widget.serialize());
                    }
                }
            }
        }

        lines.join("\n")
    }

    /// Render the form and block until the host responds.
    ///
    /// One complete cycle: serialize everything into a single `type=form`
    /// block, one synchronous transport round-trip, then dispatch the same
    /// full response to every widget child in original order. The instance is
    /// marked rendered before the round-trip, so a second call fails with
    /// [`LifecycleError::AlreadyRendered`] permanently; the first call's
    /// results stay readable.
    pub fn render(&mut self, transport: &mut dyn Transport) -> Result<(), RenderError> {
        if self.rendered {
            return Err(LifecycleError::AlreadyRendered.into());
        }
        self.rendered = true;

        let block = format!("```chatmark type=form\n{}\n```", self.serialize_body());
        debug!("Rendering form with {} components", self.components.len());

        let response = transport.round_trip(&block)?;

        for component in &mut self.components {
            if let Some(widget) = component.as_widget_mut() {
                widget.parse_response(&response);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatmark::transport::FormResponse;
    use crate::error::TransportError;

    struct StaticTransport {
        response: FormResponse,
        sent: Vec<String>,
    }

    impl StaticTransport {
        fn new(response: FormResponse) -> Self {
            Self {
                response,
                sent: Vec::new(),
            }
        }
    }

    impl Transport for StaticTransport {
        fn round_trip(&mut self, block: &str) -> Result<FormResponse, TransportError> {
            self.sent.push(block.to_string());
            Ok(self.response.clone())
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn round_trip(&mut self, _block: &str) -> Result<FormResponse, TransportError> {
            Err(TransportError::ChannelClosed)
        }
    }

    fn options(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_form_rejects_button() {
        let err = Form::new(
            vec![
                Component::from("Pick an action:"),
                Component::Button(Button::new("Go", "go")),
            ],
            None,
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::ButtonInForm);
    }

    #[test]
    fn test_form_serializes_title_text_and_widgets_in_order() {
        let checkbox = Checkbox::uniform(options(&["x.py", "y.py"]), true).unwrap();
        let cb_id0 = checkbox.option_id(0);
        let mut form = Form::new(
            vec![Component::from("Staged:"), Component::from(checkbox)],
            Some("Pick files".to_string()),
        )
        .unwrap();

        let mut transport = StaticTransport::new(FormResponse::empty());
        form.render(&mut transport).unwrap();

        let block = &transport.sent[0];
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "```chatmark type=form");
        assert_eq!(lines[1], "Pick files");
        assert_eq!(lines[2], "Staged:");
        assert_eq!(lines[3], format!("> [x]({}) x.py", cb_id0));
        assert_eq!(lines[lines.len() - 1], "```");
    }

    #[test]
    fn test_form_render_twice_fails_and_keeps_results() {
        let checkbox = Checkbox::uniform(options(&["a", "b"]), false).unwrap();
        let selected_id = checkbox.option_id(1);
        let mut form = Form::new(vec![Component::from(checkbox)], None).unwrap();

        let mut transport =
            StaticTransport::new(FormResponse::empty().with_checked(selected_id, true));
        form.render(&mut transport).unwrap();

        let err = form.render(&mut transport).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Lifecycle(LifecycleError::AlreadyRendered)
        ));

        // First render's results stay readable.
        let selections = form.components()[0].as_checkbox().unwrap().selections();
        assert_eq!(selections, &[1]);
        // Transport saw exactly one round-trip.
        assert_eq!(transport.sent.len(), 1);
    }

    #[test]
    fn test_form_transport_failure_propagates() {
        let mut form = Form::new(
            vec![Component::from(TextEditor::new("hello"))],
            None,
        )
        .unwrap();
        let err = form.render(&mut FailingTransport).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Transport(TransportError::ChannelClosed)
        ));

        // Failed render still consumes the single render slot.
        let err = form.render(&mut FailingTransport).unwrap_err();
        assert!(matches!(err, RenderError::Lifecycle(_)));
    }

    #[test]
    fn test_form_dispatches_same_response_to_all_widgets() {
        let checkbox = Checkbox::uniform(options(&["a"]), false).unwrap();
        let editor = TextEditor::new("before");
        let cb_id = checkbox.option_id(0);
        let ed_id = editor.id().to_string();

        let mut form = Form::new(
            vec![Component::from(checkbox), Component::from(editor)],
            None,
        )
        .unwrap();

        let response = FormResponse::empty()
            .with_checked(cb_id, true)
            .with_text(ed_id, "after");
        let mut transport = StaticTransport::new(response);
        form.render(&mut transport).unwrap();

        assert_eq!(
            form.components()[0].as_checkbox().unwrap().selections(),
            &[0]
        );
        assert_eq!(
            form.components()[1].as_text_editor().unwrap().new_text(),
            Some("after")
        );
    }
}
