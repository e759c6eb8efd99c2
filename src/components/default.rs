//! # Default Component
//!
//! The built-in fallback renderer. Works for any valid Schema/Sample pair
//! with zero configuration: the form is driven purely by field type tags and
//! the sample view is identifier + artifact list + pretty-printed payload.
//! Both renders are pure functions with no network access.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::components::contract::{
    ComponentCapabilities, LabelFormRenderer, QueueComponent, RenderOptions, SampleRenderer,
};
use crate::models::{ArtifactKind, Field, FieldKind, LabelSchema, Sample};

#[derive(Debug, Default)]
pub struct DefaultComponent;

impl SampleRenderer for DefaultComponent {
    fn render_sample(&self, sample: &Sample, _options: &RenderOptions) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<section class=\"sample\" data-sample-id=\"{}\">",
            escape(&sample.id)
        );
        let _ = write!(html, "<h2 class=\"sample-id\">{}</h2>", escape(&sample.id));

        if !sample.artifacts.is_empty() {
            html.push_str("<ul class=\"artifacts\">");
            for artifact in &sample.artifacts {
                html.push_str("<li>");
                match artifact.kind() {
                    ArtifactKind::Image => {
                        let _ = write!(
                            html,
                            "<img src=\"{}\" alt=\"{}\">",
                            escape(&artifact.url),
                            escape(&artifact.filename)
                        );
                    }
                    ArtifactKind::Audio => {
                        let _ = write!(
                            html,
                            "<audio controls src=\"{}\"></audio>",
                            escape(&artifact.url)
                        );
                    }
                    _ => {
                        let _ = write!(
                            html,
                            "<a href=\"{}\" download>{} ({}, {} bytes)</a>",
                            escape(&artifact.url),
                            escape(&artifact.filename),
                            escape(&artifact.content_type),
                            artifact.size_bytes
                        );
                    }
                }
                html.push_str("</li>");
            }
            html.push_str("</ul>");
        }

        let payload = serde_json::to_string_pretty(&sample.payload).unwrap_or_default();
        let _ = write!(html, "<pre class=\"payload\">{}</pre>", escape(&payload));
        html.push_str("</section>");
        html
    }
}

impl LabelFormRenderer for DefaultComponent {
    fn render_label_form(
        &self,
        schema: &LabelSchema,
        current_values: &BTreeMap<String, serde_json::Value>,
        options: &RenderOptions,
    ) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<form class=\"label-form\" data-schema=\"{}\">",
            escape(&schema.name)
        );

        for field in &schema.fields {
            let current = current_values.get(&field.name).or(field.default.as_ref());
            html.push_str("<div class=\"field\">");
            let _ = write!(
                html,
                "<label for=\"{name}\">{name}{req}</label>",
                name = escape(&field.name),
                req = if field.required { " *" } else { "" }
            );
            if let Some(help) = &field.help_text {
                let _ = write!(html, "<p class=\"help\">{}</p>", escape(help));
            }
            html.push_str(&render_input(field, current, options.read_only));
            html.push_str("</div>");
        }

        if !options.read_only {
            html.push_str("<button type=\"submit\">Submit</button>");
        }
        html.push_str("</form>");
        html
    }
}

impl QueueComponent for DefaultComponent {
    fn component_name(&self) -> &'static str {
        "default"
    }

    fn capabilities(&self) -> ComponentCapabilities {
        // Generic schema validation happens upstream; the default declares
        // no optional hooks
        ComponentCapabilities::default()
    }
}

fn render_input(field: &Field, current: Option<&serde_json::Value>, read_only: bool) -> String {
    let name = escape(&field.name);
    let disabled = if read_only { " disabled" } else { "" };

    match field.kind() {
        FieldKind::Scale => {
            let mut attrs = String::new();
            if let Some(min) = field.min {
                let _ = write!(attrs, " min=\"{min}\"");
            }
            if let Some(max) = field.max {
                let _ = write!(attrs, " max=\"{max}\"");
            }
            if let Some(value) = current.and_then(|v| v.as_f64()) {
                let _ = write!(attrs, " value=\"{value}\"");
            }
            format!("<input type=\"number\" id=\"{name}\" name=\"{name}\"{attrs}{disabled}>")
        }
        FieldKind::Boolean => {
            let checked = if current.and_then(|v| v.as_bool()).unwrap_or(false) {
                " checked"
            } else {
                ""
            };
            format!("<input type=\"checkbox\" id=\"{name}\" name=\"{name}\"{checked}{disabled}>")
        }
        FieldKind::Select => {
            let mut html =
                format!("<select id=\"{name}\" name=\"{name}\"{disabled}>");
            let chosen = current.and_then(|v| v.as_str());
            for option in field.options.as_deref().unwrap_or(&[]) {
                let selected = if chosen == Some(option.as_str()) {
                    " selected"
                } else {
                    ""
                };
                let _ = write!(
                    html,
                    "<option value=\"{opt}\"{selected}>{opt}</option>",
                    opt = escape(option)
                );
            }
            html.push_str("</select>");
            html
        }
        FieldKind::Text => {
            let value = current.and_then(|v| v.as_str()).unwrap_or("");
            format!(
                "<textarea id=\"{name}\" name=\"{name}\"{disabled}>{}</textarea>",
                escape(value)
            )
        }
        // Unrecognized type tags degrade to a plain text input
        FieldKind::Other => {
            let value = current
                .map(|v| match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                })
                .unwrap_or_default();
            format!(
                "<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\"{disabled}>",
                escape(&value)
            )
        }
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::contract::ComponentAssets;
    use crate::test_utils::fixtures;

    #[test]
    fn test_render_sample_contains_id_artifacts_payload() {
        let sample = fixtures::sample();
        let html = DefaultComponent.render_sample(&sample, &RenderOptions::default());

        assert!(html.contains("data-sample-id=\"smp-001\""));
        assert!(html.contains("<audio controls"));
        assert!(html.contains("class=\"payload\""));
    }

    #[test]
    fn test_render_sample_escapes_payload() {
        let mut sample = fixtures::sample();
        sample.payload = serde_json::json!({"note": "<script>alert(1)</script>"});
        let html = DefaultComponent.render_sample(&sample, &RenderOptions::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_form_covers_every_field_kind() {
        let schema = fixtures::kitchen_sink_schema();
        let html =
            DefaultComponent.render_label_form(&schema, &BTreeMap::new(), &RenderOptions::default());

        assert!(html.contains("type=\"number\""));
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("<select"));
        assert!(html.contains("<textarea"));
        // Unknown tag falls back to a text input
        assert!(html.contains("type=\"text\""));
        assert!(html.contains("<button type=\"submit\">"));
    }

    #[test]
    fn test_render_form_prefills_current_values() {
        let schema = fixtures::schema();
        let mut current = BTreeMap::new();
        current.insert("rating".to_string(), serde_json::json!(4));
        let html =
            DefaultComponent.render_label_form(&schema, &current, &RenderOptions::default());
        assert!(html.contains("value=\"4\""));
    }

    #[test]
    fn test_read_only_disables_inputs_and_hides_submit() {
        let schema = fixtures::schema();
        let options = RenderOptions { read_only: true };
        let html = DefaultComponent.render_label_form(&schema, &BTreeMap::new(), &options);
        assert!(html.contains(" disabled"));
        assert!(!html.contains("<button"));
    }

    #[test]
    fn test_default_declares_no_optional_capabilities() {
        let caps = DefaultComponent.capabilities();
        assert!(!caps.preprocess);
        assert!(!caps.validate);
        assert_eq!(DefaultComponent.required_assets(), ComponentAssets::default());
    }
}
