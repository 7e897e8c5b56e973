use crate::inline::{InlineContext, InlineLayout};

/// Render an inline listing as a standalone HTML fragment.
///
/// Templates use `__NAME__` placeholders instead of `format!()` so the markup
/// can keep literal braces.
pub fn render_inline(ctx: &InlineContext, layout: InlineLayout) -> String {
    const TABULAR: &str = r#"<div class="inline-objects tabular __CLASS_NAMES__">
<table>
<thead>
<tr>__HEADERS__</tr>
</thead>
<tbody>
__ROWS__</tbody>
</table>
</div>
"#;

    const RESPONSIVE: &str = r#"<div class="inline-objects responsive __CLASS_NAMES__">
__ROWS__</div>
"#;

    let class_names = escape(&ctx.class_names.join(" "));
    match layout {
        InlineLayout::Tabular => {
            let headers: String = ctx
                .header_list
                .iter()
                .map(|(key, label)| {
                    format!("<th class=\"{}\">{}</th>", escape(key), escape(label))
                })
                .collect();

            let mut rows = String::new();
            for row in &ctx.data_list {
                rows.push_str(&format!("<tr class=\"{}\">", escape(&row.class_names.join(" "))));
                for (key, value) in &row.cells {
                    rows.push_str(&format!("<td class=\"{}\">{}</td>", escape(key), escape(value)));
                }
                rows.push_str("</tr>\n");
            }

            fill(
                TABULAR,
                &[
                    ("__CLASS_NAMES__", class_names.as_str()),
                    ("__HEADERS__", headers.as_str()),
                    ("__ROWS__", rows.as_str()),
                ],
            )
        }
        InlineLayout::Responsive => {
            let mut rows = String::new();
            for row in &ctx.data_list {
                rows.push_str(&format!("<dl class=\"{}\">\n", escape(&row.class_names.join(" "))));
                for ((key, value), (_, label)) in row.cells.iter().zip(&ctx.header_list) {
                    rows.push_str(&format!(
                        "<dt class=\"{key}\">{label}</dt><dd class=\"{key}\">{value}</dd>\n",
                        key = escape(key),
                        label = escape(label),
                        value = escape(value),
                    ));
                }
                rows.push_str("</dl>\n");
            }

            fill(
                RESPONSIVE,
                &[("__CLASS_NAMES__", class_names.as_str()), ("__ROWS__", rows.as_str())],
            )
        }
    }
}

/// Substitute template placeholders in a single left-to-right pass.
/// Substituted text is never scanned for placeholders again.
fn fill(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = slots
            .iter()
            .filter_map(|&(name, value)| rest.find(name).map(|at| (at, name, value)))
            .min_by_key(|&(at, _, _)| at);
        let Some((at, name, value)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + name.len()..];
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::InlineObjectsView;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn context() -> InlineContext {
        InlineObjectsView::new(
            "ContactInline",
            vec![("name".into(), "Name".into()), ("zip".into(), "ZIP".into())],
        )
        .context(&[json!({"name": "Tom & <Jerry>", "zip": "11000"})])
    }

    #[test]
    fn tabular_layout() {
        let html = render_inline(&context(), InlineLayout::Tabular);
        assert_eq!(
            html,
            concat!(
                "<div class=\"inline-objects tabular contactinline\">\n",
                "<table>\n<thead>\n",
                "<tr><th class=\"name\">Name</th><th class=\"zip\">ZIP</th></tr>\n",
                "</thead>\n<tbody>\n",
                "<tr class=\"\"><td class=\"name\">Tom &amp; &lt;Jerry&gt;</td><td class=\"zip\">11000</td></tr>\n",
                "</tbody>\n</table>\n</div>\n",
            )
        );
    }

    #[test]
    fn responsive_layout() {
        let html = render_inline(&context(), InlineLayout::Responsive);
        assert!(html.starts_with("<div class=\"inline-objects responsive contactinline\">\n"));
        assert!(html.contains("<dt class=\"zip\">ZIP</dt><dd class=\"zip\">11000</dd>"));
        assert!(!html.contains("<Jerry>"));
    }

    #[test]
    fn placeholder_text_in_data_is_not_expanded() {
        let ctx = InlineObjectsView::new(
            "__HEADERS__",
            vec![("note".into(), "__ROWS__".into())],
        )
        .context(&[json!({"note": "__HEADERS__ secret-row"})]);

        let html = render_inline(&ctx, InlineLayout::Tabular);
        assert_eq!(html.matches("secret-row").count(), 1);
        assert!(html.contains("<th class=\"note\">__ROWS__</th>"));
        assert!(html.contains("<td class=\"note\">__HEADERS__ secret-row</td>"));
        assert!(html.starts_with("<div class=\"inline-objects tabular __headers__\">"));

        let html = render_inline(&ctx, InlineLayout::Responsive);
        assert_eq!(html.matches("secret-row").count(), 1);
        assert!(html.contains("<dt class=\"note\">__ROWS__</dt>"));
    }

    #[test]
    fn fill_leaves_unknown_text_alone() {
        assert_eq!(fill("a __X__ b __Y__", &[("__Y__", "__X__"), ("__X__", "1")]), "a 1 b __X__");
        assert_eq!(fill("no slots", &[("__X__", "1")]), "no slots");
    }

    #[test]
    fn escapes_quotes() {
        assert_eq!(escape(r#"a"b'c"#), "a&quot;b&#x27;c");
    }
}
