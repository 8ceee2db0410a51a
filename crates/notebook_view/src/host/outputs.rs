//! Output-rendering registry keyed by an output record's declared kind.

use notebook_core::OutputRecord;
use serde_json::Value;
use std::collections::HashMap;

/// Visual element produced for one output record.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputElement {
    Text(String),
    Html(String),
    Error {
        name: String,
        value: String,
        traceback: String,
    },
    Unsupported(String),
}

impl OutputElement {
    /// Visible text used for measurement.
    pub fn display_text(&self) -> String {
        match self {
            OutputElement::Text(text) => text.clone(),
            OutputElement::Html(html) => strip_tags(html),
            OutputElement::Error {
                name,
                value,
                traceback,
            } => {
                if traceback.is_empty() {
                    format!("{name}: {value}")
                } else {
                    format!("{name}: {value}\n{traceback}")
                }
            }
            OutputElement::Unsupported(kind) => format!("[unsupported output: {kind}]"),
        }
    }
}

/// Rendered output plus whether its size is only known after layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedOutput {
    pub element: OutputElement,
    pub has_dynamic_height: bool,
}

/// Renderer for one declared output kind.
pub type OutputRenderFn = fn(&OutputRecord) -> RenderedOutput;

pub struct OutputRegistry {
    renderers: HashMap<String, OutputRenderFn>,
}

impl Default for OutputRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("stream", render_stream);
        registry.register("display_data", render_rich);
        registry.register("execute_result", render_rich);
        registry.register("error", render_error);
        registry
    }
}

impl OutputRegistry {
    /// Registry without any renderers; everything falls back to a placeholder.
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Register (or replace) the renderer for `kind`.
    pub fn register(&mut self, kind: &str, renderer: OutputRenderFn) {
        self.renderers.insert(kind.to_string(), renderer);
    }

    pub fn render(&self, output: &OutputRecord) -> RenderedOutput {
        let kind = output.output_type().unwrap_or("unknown");
        match self.renderers.get(kind) {
            Some(renderer) => renderer(output),
            None => RenderedOutput {
                element: OutputElement::Unsupported(kind.to_string()),
                has_dynamic_height: false,
            },
        }
    }
}

/// nbformat multiline strings arrive either as one string or a list of lines.
fn multiline_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(parts)) => parts.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

fn render_stream(output: &OutputRecord) -> RenderedOutput {
    // Streams keep growing while a cell runs.
    RenderedOutput {
        element: OutputElement::Text(multiline_text(output.field("text"))),
        has_dynamic_height: true,
    }
}

fn render_rich(output: &OutputRecord) -> RenderedOutput {
    let data = output.field("data");
    let mime = |name: &str| data.and_then(|data| data.get(name));
    if let Some(html) = mime("text/html") {
        return RenderedOutput {
            element: OutputElement::Html(multiline_text(Some(html))),
            has_dynamic_height: true,
        };
    }
    RenderedOutput {
        element: OutputElement::Text(multiline_text(mime("text/plain"))),
        has_dynamic_height: false,
    }
}

fn render_error(output: &OutputRecord) -> RenderedOutput {
    let field = |name: &str| {
        output
            .field(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let traceback = match output.field("traceback") {
        Some(Value::Array(lines)) => lines
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        other => multiline_text(other),
    };
    RenderedOutput {
        element: OutputElement::Error {
            name: field("ename"),
            value: field("evalue"),
            traceback,
        },
        has_dynamic_height: false,
    }
}

/// Drop markup, keeping one text line per source line.
pub(crate) fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}
