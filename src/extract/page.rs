//! Parsed view over a fetched product page

use std::cell::OnceCell;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

static SCRIPT_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\.(?:runParams|pageData)\s*=\s*(\{.+?\});").unwrap()
});

/// One fetched document. Holds a `scraper::Html`, so it must not be kept
/// across an `.await`.
pub struct Page<'a> {
    raw: &'a str,
    document: Html,
    products: OnceCell<Vec<Value>>,
}

impl<'a> Page<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            document: Html::parse_document(raw),
            products: OnceCell::new(),
        }
    }

    pub const fn raw(&self) -> &str {
        self.raw
    }

    /// Text of the first element matching `css` that has any. Text nodes
    /// are joined with spaces so list items stay apart.
    pub fn text_of(&self, css: &str) -> Option<String> {
        let selector = Selector::parse(css).ok()?;

        self.document
            .select(&selector)
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .find(|text| !text.trim().is_empty())
    }

    /// First non-empty `attr` among elements matching `css`
    pub fn attr_of(&self, css: &str, attr: &str) -> Option<String> {
        let selector = Selector::parse(css).ok()?;

        self.document
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Content of a `<meta>` tag keyed by `property`, `name` or `itemprop`
    pub fn meta(&self, key: &str) -> Option<String> {
        let selector = Selector::parse("meta").ok()?;

        self.document.select(&selector).find_map(|meta| {
            let value = meta.value();
            let matches = ["property", "name", "itemprop"]
                .iter()
                .filter_map(|attr| value.attr(attr))
                .any(|name| name.eq_ignore_ascii_case(key));
            if !matches {
                return None;
            }
            value
                .attr("content")
                .map(str::trim)
                .filter(|content| !content.is_empty())
                .map(str::to_string)
        })
    }

    pub fn title(&self) -> Option<String> {
        self.text_of("title")
    }

    /// JSON-LD objects typed as `Product`, including ones nested in `@graph`
    pub fn json_ld_products(&self) -> &[Value] {
        self.products.get_or_init(|| {
            let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
                return Vec::new();
            };

            let mut products = Vec::new();
            for script in self.document.select(&selector) {
                let text = script.text().collect::<String>();
                if let Ok(data) = serde_json::from_str::<Value>(text.trim()) {
                    collect_products(&data, &mut products);
                }
            }
            products
        })
    }

    /// Value stored under `key` in the `window.runParams` / `window.pageData`
    /// state blob some storefronts embed in a script tag
    pub fn script_state(&self, key: &str) -> Option<String> {
        let blob = SCRIPT_STATE.captures(self.raw)?.get(1)?.as_str();
        let pattern = format!(
            r#"(?i)"{}"\s*:\s*(?:"((?:[^"\\]|\\.)*)"|(-?\d+(?:\.\d+)?))"#,
            regex::escape(key)
        );
        let caps = Regex::new(&pattern).ok()?.captures(blob)?;

        let value = match caps.get(1) {
            // Decode JSON escapes such as \u05e9
            Some(quoted) => serde_json::from_str::<String>(&format!("\"{}\"", quoted.as_str()))
                .unwrap_or_else(|_| quoted.as_str().to_string()),
            None => caps.get(2)?.as_str().to_string(),
        };

        (!value.trim().is_empty()).then_some(value)
    }
}

fn is_product(object: &serde_json::Map<String, Value>) -> bool {
    match object.get("@type") {
        Some(Value::String(kind)) => kind == "Product" || kind == "ProductGroup",
        Some(Value::Array(kinds)) => kinds
            .iter()
            .any(|kind| kind.as_str() == Some("Product")),
        _ => false,
    }
}

fn collect_products(data: &Value, out: &mut Vec<Value>) {
    match data {
        Value::Array(items) => {
            for item in items {
                collect_products(item, out);
            }
        }
        Value::Object(object) => {
            if is_product(object) {
                out.push(data.clone());
            } else if let Some(graph) = object.get("@graph") {
                collect_products(graph, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <title>Smart Watch | eBay</title>
        <meta property="og:title" content="Smart Watch &amp; Band">
        <meta name="description" content="">
        <meta itemprop="price" content="45.99">
        <script type="application/ld+json">
          {"@context":"https://schema.org","@graph":[
            {"@type":"BreadcrumbList"},
            {"@type":"Product","name":"Graph Watch","offers":{"price":45.99}}
          ]}
        </script>
        <script>window.runParams = {"data":{"subject":"שעון","minAmount":{"value":12.5},"title":""}};</script>
        </head><body>
        <h1 class="title">  </h1><h1 class="title">Second heading</h1>
        <img id="main" data-src="" src="//img.example/a.jpg">
        </body></html>"#;

    #[test]
    fn reads_markup_landmarks() {
        let page = Page::parse(PAGE);
        assert_eq!(page.text_of("h1.title").as_deref(), Some("Second heading"));
        assert_eq!(page.attr_of("#main", "src").as_deref(), Some("//img.example/a.jpg"));
        assert_eq!(page.attr_of("#main", "data-src"), None);
        assert_eq!(page.title().as_deref(), Some("Smart Watch | eBay"));
    }

    #[test]
    fn reads_meta_by_any_key_attribute() {
        let page = Page::parse(PAGE);
        assert_eq!(page.meta("og:title").as_deref(), Some("Smart Watch & Band"));
        assert_eq!(page.meta("price").as_deref(), Some("45.99"));
        assert_eq!(page.meta("description"), None);
    }

    #[test]
    fn finds_products_inside_graph() {
        let page = Page::parse(PAGE);
        let products = page.json_ld_products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["name"], "Graph Watch");
    }

    #[test]
    fn reads_script_state_values() {
        let page = Page::parse(PAGE);
        assert_eq!(page.script_state("subject").as_deref(), Some("שעון"));
        assert_eq!(page.script_state("value").as_deref(), Some("12.5"));
        assert_eq!(page.script_state("title"), None);
        assert_eq!(page.script_state("missing"), None);
    }
}
