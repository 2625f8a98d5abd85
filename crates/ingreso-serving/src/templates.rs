//! HTML pages compiled into the binary.

use crate::classifier::ClassLabel;

/// The input form served at `/`.
pub const FORM_PAGE: &str = include_str!("../templates/formulario.html");

const RESULT_TEMPLATE: &str = include_str!("../templates/resultado.html");

const LABEL_SLOT: &str = "{{ prediccion }}";

/// Render the result page for a predicted label.
pub fn render_result(label: &ClassLabel) -> String {
    RESULT_TEMPLATE.replace(LABEL_SLOT, &escape_html(&label.to_string()))
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
