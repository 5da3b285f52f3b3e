//! User-facing strings.

use serde::{Serialize, Deserialize};


/// User-facing strings. Templates use `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lang {
    pub prev_page_name: String,
    pub prev_page_lore: Vec<String>,
    pub next_page_name: String,
    pub next_page_lore: Vec<String>,
    /// Placeholders: `{base}`, `{page}`.
    pub title_page_number: String,
    /// Placeholders: `{base}`, `{count}`.
    pub title_page_count: String,
    /// Placeholders: `{base}`, `{page}`, `{count}`.
    pub title_page_number_and_count: String,
}

impl Default for Lang {
    fn default() -> Self {
        Lang {
            prev_page_name: "Previous page".into(),
            prev_page_lore: vec!["Click to go back a page".into()],
            next_page_name: "Next page".into(),
            next_page_lore: vec!["Click to go to the next page".into()],
            title_page_number: "{base} page {page}".into(),
            title_page_count: "{base} {count} pages".into(),
            title_page_number_and_count: "{base} {page}/{count}".into(),
        }
    }
}

impl Lang {
    /// Title of one page of a paginated GUI.
    pub fn page_title(
        &self,
        base: &str,
        page: u32,
        page_count: usize,
        show_number: bool,
        show_count: bool,
    ) -> String {
        let template = match (show_number, show_count) {
            (false, false) => return base.to_owned(),
            (true, false) => &self.title_page_number,
            (false, true) => &self.title_page_count,
            (true, true) => &self.title_page_number_and_count,
        };
        format_template(template, &[
            ("base", base),
            ("page", &page.to_string()),
            ("count", &page_count.to_string()),
        ])
    }
}

/// Substitute `{name}` placeholders. Unknown placeholders are left as-is.
pub fn format_template(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let substituted = after
            .find('}')
            .and_then(|end| {
                let name = &after[..end];
                args.iter()
                    .find(|&&(key, _)| key == name)
                    .map(|&(_, val)| (val, end))
            });
        match substituted {
            Some((val, end)) => {
                out.push_str(val);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}


#[test]
fn test_page_titles() {
    let lang = Lang::default();
    assert_eq!(lang.page_title("Shop", 1, 2, false, false), "Shop");
    assert_eq!(lang.page_title("Shop", 1, 2, true, false), "Shop page 1");
    assert_eq!(lang.page_title("Shop", 1, 2, false, true), "Shop 2 pages");
    assert_eq!(lang.page_title("Shop", 1, 2, true, true), "Shop 1/2");
}

#[test]
fn test_format_template_unknown_placeholder() {
    assert_eq!(format_template("{a} {b} {", &[("a", "x")]), "x {b} {");
}
