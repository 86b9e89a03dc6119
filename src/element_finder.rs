//! Locator building blocks: accessible-name matching and the page scripts
//! used to resolve role and text locators inside the browser.

use serde::Deserialize;
use serde_json::Value;

/// Attribute stamped on every element a locator resolves, so later clicks and
/// state queries can address the exact same node.
pub const REF_ATTRIBUTE: &str = "data-stock-watcher-ref";

/// An element resolved by a locator, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElementHandle {
    pub reference: String,
    #[serde(default)]
    pub name: String,
}

impl ElementHandle {
    pub fn selector(&self) -> String {
        format!("[{}=\"{}\"]", REF_ATTRIBUTE, self.reference)
    }
}

/// How an element's accessible name is compared against a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    /// Whole name equals the label after whitespace normalization.
    Exact(String),
    /// Name contains the needle, ignoring case.
    ContainsIgnoreCase(String),
}

impl NameMatch {
    pub fn exact(label: &str) -> Self {
        NameMatch::Exact(normalize_whitespace(label))
    }

    pub fn contains_ignore_case(needle: &str) -> Self {
        NameMatch::ContainsIgnoreCase(normalize_whitespace(needle).to_lowercase())
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = normalize_whitespace(name);
        match self {
            NameMatch::Exact(label) => name == *label,
            NameMatch::ContainsIgnoreCase(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// CSS selector covering elements that carry `role`, explicitly or implicitly.
pub fn role_selector(role: &str) -> String {
    match role {
        "button" => concat!(
            "button, [role=\"button\"], ",
            "input[type=\"button\"], input[type=\"submit\"], ",
            "input[type=\"reset\"], input[type=\"image\"]"
        )
        .to_string(),
        "link" => "a[href], [role=\"link\"]".to_string(),
        "checkbox" => "input[type=\"checkbox\"], [role=\"checkbox\"]".to_string(),
        "radio" => "input[type=\"radio\"], [role=\"radio\"]".to_string(),
        other => format!("[role=\"{}\"]", other.replace('"', "")),
    }
}

const HELPERS_JS: &str = r#"
  const refAttr = '__REF_ATTR__';
  window.__stockWatcherRef = window.__stockWatcherRef || 0;
  const tag = (el) => {
    if (!el.hasAttribute(refAttr)) {
      window.__stockWatcherRef += 1;
      el.setAttribute(refAttr, String(window.__stockWatcherRef));
    }
    return el.getAttribute(refAttr);
  };
  const squash = (s) => (s || '').replace(/\s+/g, ' ').trim();
  const accessibleName = (el) => {
    const label = squash(el.getAttribute('aria-label'));
    if (label) return label;
    const labelledBy = el.getAttribute('aria-labelledby');
    if (labelledBy) {
      const text = squash(labelledBy.split(/\s+/)
        .map((id) => document.getElementById(id))
        .filter(Boolean)
        .map((node) => node.textContent)
        .join(' '));
      if (text) return text;
    }
    if (el.tagName === 'INPUT') {
      return squash(el.value) || squash(el.getAttribute('alt')) || squash(el.title);
    }
    return squash(el.textContent) || squash(el.title);
  };
"#;

const ROLE_JS: &str = r#"
  const found = Array.from(document.querySelectorAll(__SELECTOR__));
  return JSON.stringify(found.map((el) => ({ reference: tag(el), name: accessibleName(el) })));
"#;

const TEXT_JS: &str = r#"
  const wanted = __TEXT__;
  const skip = ['SCRIPT', 'STYLE', 'NOSCRIPT', 'TEMPLATE'];
  const root = document.body || document.documentElement;
  const hits = Array.from(root.querySelectorAll('*'))
    .filter((el) => !skip.includes(el.tagName) && squash(el.textContent) === wanted)
    .filter((el) => !Array.from(el.children).some((child) => squash(child.textContent) === wanted));
  return JSON.stringify(hits.map((el) => ({ reference: tag(el), name: wanted })));
"#;

const DISABLED_JS: &str = r#"
  const el = document.querySelector(__SELECTOR__);
  if (!el) return JSON.stringify(null);
  const disabled = el.disabled === true
    || el.getAttribute('aria-disabled') === 'true'
    || el.closest('fieldset[disabled]') !== null;
  return JSON.stringify(disabled);
"#;

fn js_string(value: &str) -> String {
    Value::from(value).to_string()
}

fn wrap(body: &str) -> String {
    format!(
        "(() => {{{}{}}})()",
        HELPERS_JS.replace("__REF_ATTR__", REF_ATTRIBUTE),
        body
    )
}

/// Script returning a JSON array of `{reference, name}` for every element
/// matching `selector`, in document order.
pub fn role_candidates_script(selector: &str) -> String {
    wrap(&ROLE_JS.replace("__SELECTOR__", &js_string(selector)))
}

/// Script returning the innermost elements whose visible text equals `text`.
pub fn exact_text_script(text: &str) -> String {
    wrap(&TEXT_JS.replace("__TEXT__", &js_string(&normalize_whitespace(text))))
}

/// Script returning `true`/`false`, or `null` when the element is gone.
pub fn disabled_script(element: &ElementHandle) -> String {
    wrap(&DISABLED_JS.replace("__SELECTOR__", &js_string(&element.selector())))
}
