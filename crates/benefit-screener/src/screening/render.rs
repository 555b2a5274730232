use super::catalog::BenefitRecord;
use std::fmt::Write as _;

pub const NO_BENEFITS_NOTICE: &str =
    "No matching benefits were found based on your answers. Try adjusting your responses or contact your local benefits office.";
const UNNAMED_BENEFIT: &str = "Unnamed Benefit";
const MISSING_DESCRIPTION: &str = "No description available.";
const LINK_TEXT: &str = "Learn More & Apply";

/// Output sink for matched records. Implementations own escaping of untrusted fields.
pub trait ResultRenderer {
    fn render(&self, matches: &[BenefitRecord]) -> String;
}

/// Markup cards suitable for embedding in the results section of a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCardRenderer;

impl HtmlCardRenderer {
    pub fn card(record: &BenefitRecord) -> String {
        let title = non_empty(record.service.as_deref()).unwrap_or(UNNAMED_BENEFIT);
        let description = non_empty(record.description.as_deref()).unwrap_or(MISSING_DESCRIPTION);
        let url = non_empty(record.url.as_deref()).unwrap_or("#");

        let mut html = String::from("<div class=\"benefit-card\">\n");
        writeln!(
            html,
            "  <div class=\"benefit-title\">{}</div>",
            escape_html(title)
        )
        .expect("title line");
        if let Some(department) = non_empty(record.department.as_deref()) {
            writeln!(
                html,
                "  <div class=\"benefit-department\">{}</div>",
                escape_html(department)
            )
            .expect("department line");
        }
        writeln!(
            html,
            "  <div class=\"benefit-description\">{}</div>",
            escape_html(description)
        )
        .expect("description line");
        writeln!(
            html,
            "  <a href=\"{}\" target=\"_blank\" class=\"benefit-link\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(url),
            escape_html(LINK_TEXT)
        )
        .expect("link line");
        html.push_str("</div>\n");
        html
    }
}

impl ResultRenderer for HtmlCardRenderer {
    fn render(&self, matches: &[BenefitRecord]) -> String {
        if matches.is_empty() {
            return format!(
                "<div class=\"no-benefits\">{}</div>\n",
                escape_html(NO_BENEFITS_NOTICE)
            );
        }

        matches.iter().map(Self::card).collect()
    }
}

/// Numbered listing for terminal output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ResultRenderer for TextRenderer {
    fn render(&self, matches: &[BenefitRecord]) -> String {
        if matches.is_empty() {
            return format!("{NO_BENEFITS_NOTICE}\n");
        }

        let mut out = String::new();
        for (index, record) in matches.iter().enumerate() {
            writeln!(out, "{}. {}", index + 1, record.display_name()).expect("numbered entry");
            if let Some(department) = non_empty(record.department.as_deref()) {
                writeln!(out, "   Department: {department}").expect("department entry");
            }
            let description =
                non_empty(record.description.as_deref()).unwrap_or(MISSING_DESCRIPTION);
            writeln!(out, "   {description}").expect("description entry");
            if let Some(url) = non_empty(record.url.as_deref()) {
                writeln!(out, "   {LINK_TEXT}: {url}").expect("link entry");
            }
        }
        out
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BenefitRecord {
        BenefitRecord {
            service: Some("Heat <Assist>".to_string()),
            description: Some("Help with \"winter\" bills & fuel".to_string()),
            url: Some("https://example.gov/heat?a=1&b='2'".to_string()),
            department: Some("Human Services".to_string()),
            ..BenefitRecord::default()
        }
    }

    #[test]
    fn cards_escape_untrusted_fields() {
        let html = HtmlCardRenderer.render(&[record()]);

        assert!(html.contains("Heat &lt;Assist&gt;"));
        assert!(html.contains("Help with &quot;winter&quot; bills &amp; fuel"));
        assert!(html.contains("href=\"https://example.gov/heat?a=1&amp;b=&#39;2&#39;\""));
        assert!(html.contains("Learn More &amp; Apply"));
        assert!(!html.contains("<Assist>"));
    }

    #[test]
    fn cards_fall_back_for_missing_fields() {
        let html = HtmlCardRenderer::card(&BenefitRecord::default());

        assert!(html.contains(UNNAMED_BENEFIT));
        assert!(html.contains(MISSING_DESCRIPTION));
        assert!(html.contains("href=\"#\""));
        assert!(!html.contains("benefit-department"));
    }

    #[test]
    fn empty_results_render_notice() {
        assert!(HtmlCardRenderer.render(&[]).contains("no-benefits"));
        assert_eq!(TextRenderer.render(&[]), format!("{NO_BENEFITS_NOTICE}\n"));
    }

    #[test]
    fn text_listing_is_numbered_in_order() {
        let second = BenefitRecord::named("Library Card");
        let text = TextRenderer.render(&[record(), second]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1. Heat <Assist>");
        assert_eq!(lines[1], "   Department: Human Services");
        assert!(text.contains("2. Library Card"));
        assert!(text.contains(MISSING_DESCRIPTION));
    }
}
