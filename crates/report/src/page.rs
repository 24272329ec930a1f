//! Print layout for the rendered PDF.
//!
//! Chromium's command-line PDF export has no page-size or margin flags, so
//! the layout is expressed as a print stylesheet injected into the HTML.

/// Page format and margins applied to the PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSetup {
    /// CSS page size keyword.
    pub format: String,
    /// CSS margin applied to all four sides.
    pub margin: String,
    /// Print background colours and images.
    pub print_background: bool,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            format: "A4".to_string(),
            margin: "20px".to_string(),
            print_background: true,
        }
    }
}

impl PageSetup {
    /// The `<style>` element that enforces this setup.
    pub fn style_element(&self) -> String {
        let mut css = format!(
            "@page {{ size: {}; margin: {}; }}",
            self.format, self.margin
        );
        if self.print_background {
            css.push_str(
                " html, body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }",
            );
        }
        format!("<style data-print-setup>{css}</style>")
    }
}

/// Insert the print stylesheet right after the opening `<head>` tag so that
/// it comes before the report's own styles. Documents without a `<head>`
/// get it prepended.
pub fn print_ready_html(html: &str, setup: &PageSetup) -> String {
    let style = setup.style_element();
    let lower = html.to_ascii_lowercase();

    let Some(start) = lower.find("<head") else {
        return format!("{style}\n{html}");
    };
    // `<header>` also starts with `<head`; only accept `<head>` or `<head ...>`.
    let after = &lower[start + 5..];
    if !(after.starts_with('>') || after.starts_with(char::is_whitespace)) {
        return format!("{style}\n{html}");
    }
    let Some(close) = after.find('>') else {
        return format!("{style}\n{html}");
    };
    let insert_at = start + 5 + close + 1;

    let mut out = String::with_capacity(html.len() + style.len() + 1);
    out.push_str(&html[..insert_at]);
    out.push('\n');
    out.push_str(&style);
    out.push_str(&html[insert_at..]);
    out
}
