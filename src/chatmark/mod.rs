//! ChatMark interactive form protocol
//!
//! ChatMark renders structured input widgets (checkboxes, text editors,
//! buttons) as a fenced textual block inside a chat-style host, then parses the
//! host's structured response back into typed per-widget results.
//!
//! A render is one synchronous round-trip: serialize the whole form into a
//! single block, send it through a [`Transport`], block until the response
//! arrives, and let each widget pick its own fields out of the response by
//! stable identifier.
//!
//! - **widgets**: the [`Widget`] contract and the leaf types
//!   ([`Checkbox`], [`TextEditor`], [`Button`])
//! - **form**: the [`Form`] container and its render-once lifecycle
//! - **transport**: the host channel ([`Transport`], [`PipeTransport`]) and
//!   the [`FormResponse`] field map

pub mod form;
pub mod transport;
pub mod widgets;

pub use form::{Component, Form};
pub use transport::{FormResponse, PipeTransport, Transport};
pub use widgets::{render_widget, Button, Checkbox, TextEditor, Widget};
