//! HTML attribute assembly for form widgets.

use serde::Deserialize;
use std::collections::BTreeMap;

pub type Attrs = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    #[default]
    Text,
    Date,
    Time,
    DateTime,
    File,
}

impl WidgetKind {
    pub fn default_class_name(self) -> Option<&'static str> {
        match self {
            WidgetKind::Date => Some("date"),
            WidgetKind::Time => Some("time"),
            WidgetKind::DateTime => Some("datetime"),
            WidgetKind::Text | WidgetKind::File => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawWidget")]
pub struct Widget {
    pub kind: WidgetKind,
    pub attrs: Attrs,
    pub class_name: Option<String>,
    pub placeholder: Option<String>,
}

/// Widget as declared in a form document; the class name falls back to the
/// kind's default.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawWidget {
    #[serde(default)]
    kind: WidgetKind,

    #[serde(default)]
    attrs: Attrs,

    #[serde(default)]
    class_name: Option<String>,

    #[serde(default)]
    placeholder: Option<String>,
}

impl From<RawWidget> for Widget {
    fn from(raw: RawWidget) -> Self {
        Self {
            class_name: raw
                .class_name
                .or_else(|| raw.kind.default_class_name().map(str::to_string)),
            kind: raw.kind,
            attrs: raw.attrs,
            placeholder: raw.placeholder,
        }
    }
}

impl Widget {
    pub fn new(kind: WidgetKind) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
            class_name: kind.default_class_name().map(str::to_string),
            placeholder: None,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Attributes to render: widget attrs, then `overrides`, then `extra`,
    /// each layer replacing keys of the previous one. The widget class name
    /// is appended to `class` and the placeholder set last.
    pub fn build_attrs(&self, extra: Option<&Attrs>, overrides: Attrs) -> Attrs {
        let mut attrs = self.attrs.clone();
        attrs.extend(overrides);
        if let Some(extra) = extra {
            attrs.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(class_name) = &self.class_name {
            attrs = add_class_name(attrs, class_name);
        }
        if let Some(placeholder) = &self.placeholder {
            attrs.insert("placeholder".to_string(), placeholder.clone());
        }
        attrs
    }
}

/// Append `class_name` to the `class` attribute unless it is already there.
pub fn add_class_name(mut attrs: Attrs, class_name: &str) -> Attrs {
    let class = attrs.entry("class".to_string()).or_default();
    if !class.split_whitespace().any(|c| c == class_name) {
        if !class.is_empty() {
            class.push(' ');
        }
        class.push_str(class_name);
    }
    attrs
}
