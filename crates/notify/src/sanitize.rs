// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secret redaction (§4.13) and the two `tracing_subscriber` layers that
//! apply it: [`CorrelationLayer`] threads the active
//! [`mover_status_core::CorrelationId`] onto every span and event under
//! the stable field name `correlation_id`, and [`SanitizingLayer`]
//! captures, redacts, and writes event fields itself rather than
//! delegating to `fmt::layer()` — that's what "installed on every sink"
//! means here: redaction happens in the one place output is produced,
//! not as a best-effort pass over already-formatted text.

use mover_status_core::correlation::NO_CORRELATION;
use serde_json::{Map, Value};
use std::io::Write;
use std::sync::LazyLock;
use tracing::field::{Field, Visit};
use tracing::span;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

pub const REDACTED: &str = "<REDACTED>";

const SENSITIVE_KEYWORDS: &[&str] = &["token", "secret", "password", "credential", "bearer", "auth", "webhook", "key"];

/// True if a field's *name* alone is enough to redact its value
/// regardless of content, matching the sensitive-field list used by
/// the provider-config and structured-log sanitizers.
pub fn is_sensitive_field(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SENSITIVE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

struct UrlPatterns {
    discord: regex::Regex,
    telegram: regex::Regex,
    path_token: regex::Regex,
    query_token: regex::Regex,
}

static URL_PATTERNS: LazyLock<UrlPatterns> = LazyLock::new(|| UrlPatterns {
    discord: regex::Regex::new(r"(?i)(discord(?:app)?\.com/api/webhooks/\d+/)[A-Za-z0-9_-]+").unwrap(),
    telegram: regex::Regex::new(r"(?i)(api\.telegram\.org/bot)[A-Za-z0-9:_-]+(/)").unwrap(),
    path_token: regex::Regex::new(r"(?i)(/(?:token|api-key)/)[^/?&]+").unwrap(),
    query_token: regex::Regex::new(r"(?i)([?&](?:token|api[_-]?key|secret)=)[^&]+").unwrap(),
});

/// Redacts webhook/bot-token shapes embedded in a URL, leaving the rest
/// of the URL (host, path segments, unrelated query params) intact.
pub fn sanitize_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let p = &*URL_PATTERNS;
    let mut out = p.discord.replace_all(url, format!("${{1}}{REDACTED}")).into_owned();
    out = p.telegram.replace_all(&out, format!("${{1}}{REDACTED}${{2}}")).into_owned();
    out = p.path_token.replace_all(&out, format!("${{1}}{REDACTED}")).into_owned();
    out = p.query_token.replace_all(&out, format!("${{1}}{REDACTED}")).into_owned();
    out
}

/// Recursively redacts a JSON value. `field_name`, when given, takes
/// precedence: a sensitive field name redacts the whole value without
/// inspecting its contents.
pub fn sanitize_value(value: &Value, field_name: Option<&str>) -> Value {
    if let Some(name) = field_name {
        if is_sensitive_field(name) {
            return Value::String(REDACTED.to_string());
        }
    }
    match value {
        Value::String(s) => Value::String(sanitize_url(s)),
        Value::Array(items) => Value::Array(items.iter().map(|v| sanitize_value(v, None)).collect()),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), sanitize_value(v, Some(k)));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Formats an error as `<TypeName>: <sanitized message>`, matching the
/// exception-formatting rule in §4.13.
pub fn sanitize_exception(type_name: &str, message: &str) -> String {
    format!("{type_name}: {}", sanitize_url(message))
}

struct CorrelationIdExt(String);

/// Captures a `correlation_id` field recorded at span creation and
/// stores it in the span's extensions, so nested events inherit it
/// without re-stating it at every call site.
pub struct CorrelationLayer;

impl CorrelationLayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CorrelationLayer {
    fn default() -> Self {
        Self::new()
    }
}

struct StringVisitor(Option<String>);

impl Visit for StringVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "correlation_id" {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "correlation_id" && self.0.is_none() {
            self.0 = Some(format!("{value:?}").trim_matches('"').to_string());
        }
    }
}

impl<S> Layer<S> for CorrelationLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let mut visitor = StringVisitor(None);
        attrs.record(&mut visitor);
        if let (Some(correlation_id), Some(span)) = (visitor.0, ctx.span(id)) {
            span.extensions_mut().insert(CorrelationIdExt(correlation_id));
        }
    }
}

fn current_correlation_id<S>(ctx: &Context<'_, S>, event: &tracing::Event<'_>) -> String
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    for span in ctx.event_scope(event).into_iter().flatten() {
        if let Some(ext) = span.extensions().get::<CorrelationIdExt>() {
            return ext.0.clone();
        }
    }
    NO_CORRELATION.to_string()
}

#[derive(Default)]
struct FieldVisitor(Map<String, Value>);

impl Visit for FieldVisitor {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), Value::from(format!("{value:?}")));
    }
}

/// A `tracing_subscriber::Layer` that formats each event as one JSON
/// line, sanitizing every field (and the message) before it reaches
/// the sink. Intended to be the only layer writing events — place
/// [`CorrelationLayer`] above it so span extensions are populated by
/// the time an event fires.
pub struct SanitizingLayer<W> {
    writer: parking_lot::Mutex<W>,
}

impl<W: Write + Send + 'static> SanitizingLayer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: parking_lot::Mutex::new(writer) }
    }
}

impl<S, W> Layer<S> for SanitizingLayer<W>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: Write + Send + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let correlation_id = current_correlation_id(&ctx, event);
        let mut line = Map::new();
        line.insert("level".to_string(), Value::from(event.metadata().level().as_str()));
        line.insert("target".to_string(), Value::from(event.metadata().target()));
        line.insert("correlation_id".to_string(), Value::from(correlation_id));
        for (key, value) in visitor.0 {
            line.insert(key.clone(), sanitize_value(&value, Some(&key)));
        }

        if let Ok(text) = serde_json::to_string(&Value::Object(line)) {
            let mut writer = self.writer.lock();
            let _ = writeln!(writer, "{text}");
        }
    }
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
