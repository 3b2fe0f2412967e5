//! PageDriver - Abstract Browser Automation Trait
//!
//! Page objects never touch the document directly: every query and action
//! goes through [`PageDriver`]. Two implementations ship with the crate:
//!
//! - `ChromiumDriver` (feature `browser`): CDP via chromiumoxide
//! - [`MockDriver`]: an in-memory screen model for unit and scenario tests
//!
//! Elements are addressed by `(selector, index)`, where `index` is the
//! position of the element in the driver's `query_all` result for that
//! selector. Nothing is cached between calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::locator::{AriaRole, Selector};
use crate::result::{PomError, PomResult};
use crate::wait::{url_path, UrlPattern};

/// Snapshot of one matched element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Position among the selector's matches (document order)
    pub index: usize,
    /// Lower-case tag name
    pub tag_name: String,
    /// Rendered text content
    pub text: Option<String>,
    /// Whether the element is rendered and not hidden
    pub visible: bool,
    /// Whether the element accepts input
    pub enabled: bool,
    /// Current value for inputs and selects
    pub value: Option<String>,
    /// Checked state for checkboxes
    pub checked: bool,
}

/// Abstract driver trait for browser automation
///
/// Implementations must be safe to share between page objects of one
/// scenario; all methods take `&self`.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to an absolute URL and wait for the load event
    async fn navigate(&self, url: &str) -> PomResult<()>;

    /// Current absolute URL
    async fn current_url(&self) -> PomResult<String>;

    /// Snapshot every element matching the selector, in document order
    async fn query_all(&self, selector: &Selector) -> PomResult<Vec<ElementHandle>>;

    /// Click the `index`-th match
    async fn click(&self, selector: &Selector, index: usize) -> PomResult<()>;

    /// Replace the value of the `index`-th match
    async fn fill(&self, selector: &Selector, index: usize, text: &str) -> PomResult<()>;

    /// Choose an option by value in the `index`-th match
    async fn select_option(&self, selector: &Selector, index: usize, value: &str)
        -> PomResult<()>;

    /// Tick the `index`-th match if it is an unchecked checkbox
    async fn check(&self, selector: &Selector, index: usize) -> PomResult<()>;

    /// Release the page
    async fn close(&self) -> PomResult<()>;
}

// ============================================================================
// Mock driver
// ============================================================================

/// Script run by the mock when an element is clicked
pub type MockScript = Arc<dyn Fn(&mut MockState) + Send + Sync>;

/// What happens when a mock element is clicked
#[derive(Clone)]
pub enum ClickEffect {
    /// Navigate to a route on the same origin
    Navigate(String),
    /// Make the elements with this key visible
    Reveal(String),
    /// Arbitrary state change (validation, conditional navigation, ...)
    Script(MockScript),
}

impl fmt::Debug for ClickEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigate(route) => f.debug_tuple("Navigate").field(route).finish(),
            Self::Reveal(key) => f.debug_tuple("Reveal").field(key).finish(),
            Self::Script(_) => f.write_str("Script(..)"),
        }
    }
}

/// One element of a mock screen
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Lower-case tag
    pub tag: String,
    /// `id` attribute
    pub id: Option<String>,
    /// Extra CSS selectors this element answers to verbatim
    pub css: Vec<String>,
    /// Explicit ARIA role (otherwise implied by the tag)
    pub role: Option<AriaRole>,
    /// Text content
    pub text: String,
    /// Other attributes
    pub attributes: Vec<(String, String)>,
    /// Rendered and not hidden
    pub visible: bool,
    /// Accepts input
    pub enabled: bool,
    /// Input value
    pub value: String,
    /// Allowed option values (selects)
    pub options: Vec<String>,
    /// Checkbox state
    pub checked: bool,
    /// Click behavior
    pub on_click: Option<ClickEffect>,
}

impl MockElement {
    /// Visible, enabled element with this tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            id: None,
            css: Vec::new(),
            role: None,
            text: String::new(),
            attributes: Vec::new(),
            visible: true,
            enabled: true,
            value: String::new(),
            options: Vec::new(),
            checked: false,
            on_click: None,
        }
    }

    /// Set the id
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Answer to an extra CSS selector
    #[must_use]
    pub fn css(mut self, selector: impl Into<String>) -> Self {
        self.css.push(selector.into());
        self
    }

    /// Set an explicit role
    #[must_use]
    pub const fn role(mut self, role: AriaRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Set the text content
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Start hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Start disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Allowed option values
    #[must_use]
    pub fn options(mut self, values: &[&str]) -> Self {
        self.options = values.iter().map(|v| (*v).to_string()).collect();
        self
    }

    /// Click behavior
    #[must_use]
    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click = Some(effect);
        self
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        if name == "id" {
            return self.id.as_deref();
        }
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` names this element (id, `#id`, or one of its CSS aliases)
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.id.as_deref() == Some(key)
            || self.id.as_deref().is_some_and(|id| key.strip_prefix('#') == Some(id))
            || self.css.iter().any(|c| c == key)
    }

    fn implicit_role(&self) -> Option<AriaRole> {
        if self.role.is_some() {
            return self.role;
        }
        match self.tag.as_str() {
            "button" => Some(AriaRole::Button),
            "a" => Some(AriaRole::Link),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(AriaRole::Heading),
            "textarea" => Some(AriaRole::Textbox),
            "select" => Some(AriaRole::Combobox),
            "dialog" | "mat-dialog-container" => Some(AriaRole::Dialog),
            "input" => match self.attribute("type") {
                Some("checkbox") => Some(AriaRole::Checkbox),
                Some("submit" | "button" | "reset") => Some(AriaRole::Button),
                _ => Some(AriaRole::Textbox),
            },
            _ => None,
        }
    }

    fn heading_level(&self) -> Option<u8> {
        self.tag
            .strip_prefix('h')
            .and_then(|n| n.parse::<u8>().ok())
            .or_else(|| self.attribute("aria-level").and_then(|l| l.parse().ok()))
    }

    fn accessible_name(&self) -> String {
        self.attribute("aria-label")
            .map_or_else(|| normalize(&self.text), normalize)
    }

    /// Whether this element matches the selector
    #[must_use]
    pub fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Css(css) => {
                let css: &str = css;
                css == self.tag || self.has_key(css)
            }
            Selector::Text(text) => normalize(&self.text).contains(&normalize(text)),
            Selector::Role { role, name, level } => {
                self.implicit_role() == Some(*role)
                    && name
                        .as_deref()
                        .map_or(true, |n| self.accessible_name() == normalize(n))
                    && level.map_or(true, |l| self.heading_level() == Some(l))
            }
            Selector::Attribute { name, value } => self.attribute(name) == Some(&**value),
        }
    }

    fn handle(&self, index: usize) -> ElementHandle {
        let has_value = matches!(self.tag.as_str(), "input" | "select" | "textarea");
        ElementHandle {
            index,
            tag_name: self.tag.clone(),
            text: Some(self.text.clone()),
            visible: self.visible,
            enabled: self.enabled,
            value: has_value.then(|| self.value.clone()),
            checked: self.checked,
        }
    }

    fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.css.first().cloned())
            .unwrap_or_else(|| self.tag.clone())
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A route template of the mock application
#[derive(Debug, Clone)]
pub struct MockScreen {
    /// Name used to look the template up (usually its route)
    pub route: String,
    /// URLs served by this template
    pub pattern: UrlPattern,
    /// Elements instantiated on navigation
    pub elements: Vec<MockElement>,
}

/// Mutable state of the mock browser page
#[derive(Debug)]
pub struct MockState {
    url: String,
    screens: Vec<MockScreen>,
    elements: Vec<MockElement>,
    history: Vec<String>,
}

impl MockState {
    /// Navigate to an absolute URL or a same-origin route and instantiate its template
    pub fn navigate(&mut self, target: &str) {
        let url = if target.contains("://") {
            target.to_string()
        } else {
            let origin = origin_of(&self.url);
            format!("{origin}{target}")
        };
        self.elements = self
            .screens
            .iter()
            .find(|s| s.pattern.matches(&url))
            .map(|s| s.elements.clone())
            .unwrap_or_default();
        self.url = url;
    }

    fn element(&self, key: &str) -> Option<&MockElement> {
        self.elements.iter().find(|e| e.has_key(key))
    }

    /// Current value of a live input (empty when missing)
    #[must_use]
    pub fn value_of(&self, key: &str) -> &str {
        self.element(key).map_or("", |e| e.value.as_str())
    }

    /// Whether a live checkbox is ticked
    #[must_use]
    pub fn is_checked(&self, key: &str) -> bool {
        self.element(key).is_some_and(|e| e.checked)
    }

    /// Make every live element with this key visible
    pub fn reveal(&mut self, key: &str) {
        for element in self.elements.iter_mut().filter(|e| e.has_key(key)) {
            element.visible = true;
        }
    }

    /// Template by route name, to change what later navigations render
    pub fn screen_mut(&mut self, route: &str) -> Option<&mut MockScreen> {
        self.screens.iter_mut().find(|s| s.route == route)
    }

    fn nth_match(&mut self, selector: &Selector, index: usize) -> PomResult<&mut MockElement> {
        self.elements
            .iter_mut()
            .filter(|e| e.matches(selector))
            .nth(index)
            .ok_or_else(|| PomError::driver(format!("no element {index} for {selector}")))
    }
}

fn origin_of(url: &str) -> &str {
    match url.find("://") {
        Some(idx) => {
            let after = idx + 3;
            url[after..].find('/').map_or(url, |slash| &url[..after + slash])
        }
        None => "",
    }
}

/// Mock driver for unit testing
#[derive(Debug)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Empty application on `about:blank`
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                url: "about:blank".to_string(),
                screens: Vec::new(),
                elements: Vec::new(),
                history: Vec::new(),
            }),
        }
    }

    /// Add a screen served at an exact path
    #[must_use]
    pub fn with_screen(self, route: &str, elements: Vec<MockElement>) -> Self {
        self.with_screen_pattern(route, UrlPattern::path(route), elements)
    }

    /// Add a screen served for every URL matching `pattern`
    #[must_use]
    pub fn with_screen_pattern(
        mut self,
        route: &str,
        pattern: UrlPattern,
        elements: Vec<MockElement>,
    ) -> Self {
        self.state.get_mut().screens.push(MockScreen {
            route: route.to_string(),
            pattern,
            elements,
        });
        self
    }

    /// Recorded calls (`navigate:..`, `click:..`, `fill:key=value`, ...)
    pub async fn history(&self) -> Vec<String> {
        self.state.lock().await.history.clone()
    }

    /// Check if a call with this prefix was recorded
    pub async fn was_called(&self, prefix: &str) -> bool {
        self.state
            .lock()
            .await
            .history
            .iter()
            .any(|c| c.starts_with(prefix))
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&self, url: &str) -> PomResult<()> {
        let mut state = self.state.lock().await;
        state.history.push(format!("navigate:{}", url_path(url)));
        state.navigate(url);
        Ok(())
    }

    async fn current_url(&self) -> PomResult<String> {
        Ok(self.state.lock().await.url.clone())
    }

    async fn query_all(&self, selector: &Selector) -> PomResult<Vec<ElementHandle>> {
        let state = self.state.lock().await;
        Ok(state
            .elements
            .iter()
            .filter(|e| e.matches(selector))
            .enumerate()
            .map(|(i, e)| e.handle(i))
            .collect())
    }

    async fn click(&self, selector: &Selector, index: usize) -> PomResult<()> {
        let mut state = self.state.lock().await;
        let element = state.nth_match(selector, index)?;
        if !element.visible || !element.enabled {
            return Err(PomError::driver("element is not clickable"));
        }
        let label = element.label();
        let effect = element.on_click.clone();
        state.history.push(format!("click:{label}"));
        match effect {
            Some(ClickEffect::Navigate(route)) => state.navigate(&route),
            Some(ClickEffect::Reveal(key)) => state.reveal(&key),
            Some(ClickEffect::Script(script)) => script(&mut *state),
            None => {}
        }
        Ok(())
    }

    async fn fill(&self, selector: &Selector, index: usize, text: &str) -> PomResult<()> {
        let mut state = self.state.lock().await;
        let element = state.nth_match(selector, index)?;
        let fillable = element.tag == "textarea"
            || (element.tag == "input" && element.attribute("type") != Some("checkbox"));
        if !fillable {
            return Err(PomError::driver(format!(
                "<{}> is not an input or textarea",
                element.tag
            )));
        }
        element.value = text.to_string();
        let label = element.label();
        state.history.push(format!("fill:{label}={text}"));
        Ok(())
    }

    async fn select_option(
        &self,
        selector: &Selector,
        index: usize,
        value: &str,
    ) -> PomResult<()> {
        let mut state = self.state.lock().await;
        let element = state.nth_match(selector, index)?;
        if element.tag != "select" {
            return Err(PomError::driver(format!("<{}> is not a select", element.tag)));
        }
        if !element.options.iter().any(|o| o == value) {
            return Err(PomError::driver(format!("no option with value {value:?}")));
        }
        element.value = value.to_string();
        let label = element.label();
        state.history.push(format!("select:{label}={value}"));
        Ok(())
    }

    async fn check(&self, selector: &Selector, index: usize) -> PomResult<()> {
        let mut state = self.state.lock().await;
        let element = state.nth_match(selector, index)?;
        if element.attribute("type") != Some("checkbox") {
            return Err(PomError::driver("element is not a checkbox"));
        }
        element.checked = true;
        let label = element.label();
        state.history.push(format!("check:{label}"));
        Ok(())
    }

    async fn close(&self) -> PomResult<()> {
        self.state.lock().await.history.push("close".to_string());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod element_tests {
        use super::*;

        #[test]
        fn test_css_matching() {
            let el = MockElement::new("a").id("viewAccounts").css("div.card-header a");
            assert!(el.matches(&Selector::css("#viewAccounts")));
            assert!(el.matches(&Selector::css("div.card-header a")));
            assert!(el.matches(&Selector::css("a")));
            assert!(!el.matches(&Selector::css("#other")));
        }

        #[test]
        fn test_role_name_is_not_a_substring_match() {
            let link = MockElement::new("a").attr("href", "#").text("Apply For A Loan");
            assert!(link.matches(&Selector::role(AriaRole::Link, "apply for a loan")));
            assert!(!link.matches(&Selector::role(AriaRole::Link, "Apply")));
        }

        #[test]
        fn test_role_matching_uses_tag() {
            let heading = MockElement::new("h5").text("  Loan   Center ");
            assert!(heading.matches(&Selector::heading("Loan Center", 5)));
            assert!(!heading.matches(&Selector::heading("Loan Center", 3)));

            let submit = MockElement::new("input").attr("type", "submit").attr("aria-label", "Sign In");
            assert!(submit.matches(&Selector::role(AriaRole::Button, "sign in")));
        }

        #[test]
        fn test_text_matching_is_substring() {
            let el = MockElement::new("span").text("Error: login failed");
            assert!(el.matches(&Selector::text("login failed")));
            assert!(!el.matches(&Selector::text("success")));
        }

        #[test]
        fn test_attribute_matching() {
            let el = MockElement::new("a").attr("href", "/password-request");
            assert!(el.matches(&Selector::attribute("href", "/password-request")));
            assert!(MockElement::new("input")
                .id("email")
                .matches(&Selector::attribute("id", "email")));
        }

        #[test]
        fn test_handle_value_only_for_controls() {
            assert!(MockElement::new("div").handle(0).value.is_none());
            assert_eq!(
                MockElement::new("input").handle(3).value.as_deref(),
                Some("")
            );
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_origin_of() {
            assert_eq!(origin_of("https://uibank.uipath.com/accounts"), "https://uibank.uipath.com");
            assert_eq!(origin_of("https://uibank.uipath.com"), "https://uibank.uipath.com");
            assert_eq!(origin_of("about:blank"), "");
        }
    }

    mod driver_tests {
        use super::*;

        fn driver() -> MockDriver {
            MockDriver::new()
                .with_screen(
                    "/",
                    vec![
                        MockElement::new("input").id("username"),
                        MockElement::new("span").id("error").text("login failed").hidden(),
                        MockElement::new("button")
                            .text("Sign In")
                            .on_click(ClickEffect::Script(Arc::new(|state: &mut MockState| {
                                if state.value_of("username") == "ok" {
                                    state.navigate("/accounts");
                                } else {
                                    state.reveal("error");
                                }
                            }))),
                    ],
                )
                .with_screen("/accounts", vec![MockElement::new("h3").text("Welcome!")])
        }

        #[tokio::test]
        async fn test_navigate_instantiates_template() {
            let d = driver();
            assert_eq!(d.current_url().await.unwrap(), "about:blank");
            d.navigate("https://bank.test/").await.unwrap();
            let found = d.query_all(&Selector::css("#username")).await.unwrap();
            assert_eq!(found.len(), 1);
            assert!(d.was_called("navigate:/").await);
        }

        #[tokio::test]
        async fn test_unknown_route_is_empty_document() {
            let d = driver();
            d.navigate("https://bank.test/nowhere").await.unwrap();
            assert!(d.query_all(&Selector::css("h3")).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_script_navigation() {
            let d = driver();
            d.navigate("https://bank.test/").await.unwrap();
            d.fill(&Selector::css("#username"), 0, "ok").await.unwrap();
            d.click(&Selector::role(AriaRole::Button, "Sign In"), 0)
                .await
                .unwrap();
            assert_eq!(d.current_url().await.unwrap(), "https://bank.test/accounts");
        }

        #[tokio::test]
        async fn test_script_reveal() {
            let d = driver();
            d.navigate("https://bank.test/").await.unwrap();
            d.click(&Selector::text("Sign In"), 0).await.unwrap();
            let error = d.query_all(&Selector::css("#error")).await.unwrap();
            assert!(error[0].visible);
            assert!(d.current_url().await.unwrap().ends_with('/'));
        }

        #[tokio::test]
        async fn test_hidden_element_not_clickable() {
            let d = driver();
            d.navigate("https://bank.test/").await.unwrap();
            let err = d.click(&Selector::css("#error"), 0).await.unwrap_err();
            assert!(matches!(err, PomError::Driver { .. }));
        }

        #[tokio::test]
        async fn test_fill_rejects_non_inputs() {
            let d = driver();
            d.navigate("https://bank.test/").await.unwrap();
            assert!(d.fill(&Selector::css("#error"), 0, "x").await.is_err());
            assert!(d.check(&Selector::css("#username"), 0).await.is_err());
        }

        #[tokio::test]
        async fn test_history_records_order() {
            let d = driver();
            d.navigate("https://bank.test/").await.unwrap();
            d.fill(&Selector::css("#username"), 0, "a").await.unwrap();
            d.close().await.unwrap();
            assert_eq!(d.history().await, vec!["navigate:/", "fill:username=a", "close"]);
        }
    }
}
