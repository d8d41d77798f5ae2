//! Event sinks: where the serializer sends its events.
//!
//! The serializer never formats text itself. It hands each event, in order, to an
//! [`EventSink`]. Two sinks ship with the crate:
//!
//! - `Vec<Event>` collects events in memory
//! - [`EventLog`] writes one line per event in the YAML test-suite event notation
//!
//! ## Examples
//!
//! ```rust
//! use yaml_serializer::{EventLog, Graph, ScalarStyle, Serializer, SerializerOptions};
//! use yaml_serializer::node::tags;
//!
//! let mut graph = Graph::new();
//! let root = graph.add_scalar(tags::STR, "hello", ScalarStyle::Plain);
//!
//! let sink = EventLog::new(Vec::<u8>::new());
//! let mut serializer = Serializer::new(sink, SerializerOptions::new()).unwrap();
//! serializer.open().unwrap();
//! serializer.serialize(&graph, root).unwrap();
//! serializer.close().unwrap();
//!
//! let text = String::from_utf8(serializer.into_inner().into_inner()).unwrap();
//! assert_eq!(text, "+STR\n+DOC\n=VAL :hello\n-DOC\n-STR\n");
//! ```

use crate::{Event, Result, ScalarStyle};
use std::io;

/// Receiver of serialized events. Must keep events in the order given.
pub trait EventSink {
    /// Accepts the next event. An error aborts the current serializer call.
    fn emit(&mut self, event: Event) -> Result<()>;
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: Event) -> Result<()> {
        (**self).emit(event)
    }
}

/// Writes events as lines of test-suite notation (`+STR`, `=VAL :text`, `=ALI *a`, ...).
///
/// A scalar's tag is left out when the implicit flag for its style is set: the plain
/// flag for plain scalars, the quoted flag for every other style.
pub struct EventLog<W: io::Write> {
    writer: W,
}

impl<W: io::Write> EventLog<W> {
    pub fn new(writer: W) -> Self {
        EventLog { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> EventSink for EventLog<W> {
    fn emit(&mut self, event: Event) -> Result<()> {
        let line = format_event(&event);
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        if matches!(event, Event::StreamEnd) {
            self.writer.flush()?;
        }
        Ok(())
    }
}

fn format_event(event: &Event) -> String {
    match event {
        Event::StreamStart => "+STR".to_string(),
        Event::StreamEnd => "-STR".to_string(),
        Event::DocumentStart { explicit, .. } => {
            if *explicit {
                "+DOC ---".to_string()
            } else {
                "+DOC".to_string()
            }
        }
        Event::DocumentEnd { explicit } => {
            if *explicit {
                "-DOC ...".to_string()
            } else {
                "-DOC".to_string()
            }
        }
        Event::Alias { anchor } => format!("=ALI *{}", anchor),
        Event::Scalar {
            anchor,
            tag,
            implicit,
            value,
            style,
        } => {
            let mut line = String::from("=VAL");
            push_properties(&mut line, anchor.as_deref(), tag, implicit.for_style(*style));
            line.push(' ');
            line.push(style_indicator(*style));
            escape_into(&mut line, value);
            line
        }
        Event::SequenceStart {
            anchor,
            tag,
            implicit,
            flow_style,
        } => {
            let mut line = String::from("+SEQ");
            if *flow_style == crate::FlowStyle::Flow {
                line.push_str(" []");
            }
            push_properties(&mut line, anchor.as_deref(), tag, *implicit);
            line
        }
        Event::SequenceEnd => "-SEQ".to_string(),
        Event::MappingStart {
            anchor,
            tag,
            implicit,
            flow_style,
        } => {
            let mut line = String::from("+MAP");
            if *flow_style == crate::FlowStyle::Flow {
                line.push_str(" {}");
            }
            push_properties(&mut line, anchor.as_deref(), tag, *implicit);
            line
        }
        Event::MappingEnd => "-MAP".to_string(),
    }
}

fn push_properties(line: &mut String, anchor: Option<&str>, tag: &str, implicit: bool) {
    if let Some(anchor) = anchor {
        line.push_str(" &");
        line.push_str(anchor);
    }
    if !implicit {
        line.push_str(" <");
        line.push_str(tag);
        line.push('>');
    }
}

const fn style_indicator(style: ScalarStyle) -> char {
    match style {
        ScalarStyle::Plain => ':',
        ScalarStyle::SingleQuoted => '\'',
        ScalarStyle::DoubleQuoted => '"',
        ScalarStyle::Literal => '|',
        ScalarStyle::Folded => '>',
    }
}

fn escape_into(line: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\\' => line.push_str("\\\\"),
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            '\u{0008}' => line.push_str("\\b"),
            '\0' => line.push_str("\\0"),
            _ => line.push(ch),
        }
    }
}
