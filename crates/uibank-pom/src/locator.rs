//! Locator abstraction for element selection and interaction.
//!
//! # Design
//!
//! - **Registry entries**: every page declares its elements as const
//!   [`LocatorSpec`]s (name + [`Selector`] + [`Disambiguation`]).
//! - **Lazy resolution**: a [`Locator`] is a spec bound to a [`Session`]; it
//!   queries the live document on every call and never caches elements.
//! - **Bounded auto-wait**: actions and `text_content` wait up to the
//!   session's action timeout, then fail with `ElementNotFound`.
//! - **Explicit multi-match policy**: strict by default; `FirstMatch` and
//!   `TextScope` are opt-in per registry entry.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::driver::ElementHandle;
use crate::result::{PomError, PomResult};
use crate::session::Session;
use crate::wait::{poll_for, WaitOptions};

/// ARIA roles understood by role selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    /// `button`, `input[type=submit]`, ...
    Button,
    /// `a[href]`
    Link,
    /// `h1`..`h6`
    Heading,
    /// `input[type=checkbox]`
    Checkbox,
    /// text inputs and textareas
    Textbox,
    /// `select`
    Combobox,
    /// dialogs
    Dialog,
}

impl AriaRole {
    /// Role name as used in ARIA markup
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Link => "link",
            Self::Heading => "heading",
            Self::Checkbox => "checkbox",
            Self::Textbox => "textbox",
            Self::Combobox => "combobox",
            Self::Dialog => "dialog",
        }
    }

    /// CSS selector for elements carrying this role implicitly or explicitly
    #[must_use]
    pub const fn implicit_css(&self) -> &'static str {
        match self {
            Self::Button => {
                "button, input[type=button], input[type=submit], input[type=reset], [role=button]"
            }
            Self::Link => "a[href], [role=link]",
            Self::Heading => "h1, h2, h3, h4, h5, h6, [role=heading]",
            Self::Checkbox => "input[type=checkbox], [role=checkbox]",
            Self::Textbox => {
                "input:not([type]), input[type=text], input[type=email], input[type=password], \
                 input[type=tel], input[type=number], textarea, [role=textbox]"
            }
            Self::Combobox => "select, [role=combobox]",
            Self::Dialog => "dialog, [role=dialog], mat-dialog-container",
        }
    }
}

impl fmt::Display for AriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution strategy for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., "#username", "div.card-header a")
    Css(Cow<'static, str>),
    /// Smallest elements whose visible text contains this value (case-insensitive)
    Text(Cow<'static, str>),
    /// Elements with an ARIA role, optionally filtered by accessible name and heading level
    ///
    /// The name is compared whole, like Playwright's `getByRole` with
    /// `exact: true`; its default substring match is not offered. A role
    /// selector named "Apply" therefore never matches "Apply For A Loan".
    Role {
        /// Role to match
        role: AriaRole,
        /// Accessible name (exact, whitespace-normalized, case-insensitive)
        name: Option<Cow<'static, str>>,
        /// Heading level (headings only)
        level: Option<u8>,
    },
    /// Elements whose attribute equals a value
    Attribute {
        /// Attribute name
        name: Cow<'static, str>,
        /// Attribute value
        value: Cow<'static, str>,
    },
}

impl Selector {
    /// CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self::Css(Cow::Borrowed(selector))
    }

    /// Text selector
    #[must_use]
    pub const fn text(text: &'static str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }

    /// Role selector with an accessible name
    #[must_use]
    pub const fn role(role: AriaRole, name: &'static str) -> Self {
        Self::Role {
            role,
            name: Some(Cow::Borrowed(name)),
            level: None,
        }
    }

    /// Heading selector with name and level
    #[must_use]
    pub const fn heading(name: &'static str, level: u8) -> Self {
        Self::Role {
            role: AriaRole::Heading,
            name: Some(Cow::Borrowed(name)),
            level: Some(level),
        }
    }

    /// Attribute selector
    #[must_use]
    pub const fn attribute(name: &'static str, value: &'static str) -> Self {
        Self::Attribute {
            name: Cow::Borrowed(name),
            value: Cow::Borrowed(value),
        }
    }

    /// Text selector built at runtime (e.g. from a generated account name)
    #[must_use]
    pub fn text_owned(text: impl Into<String>) -> Self {
        Self::Text(Cow::Owned(text.into()))
    }

    /// CSS selector built at runtime
    #[must_use]
    pub fn css_owned(selector: impl Into<String>) -> Self {
        Self::Css(Cow::Owned(selector.into()))
    }

    /// Convert to a JavaScript expression evaluating to an array of matching elements
    /// in document order.
    #[must_use]
    pub fn to_js(&self) -> String {
        match self {
            Self::Css(css) => format!("Array.from(document.querySelectorAll({}))", js_str(css)),
            Self::Text(text) => format!(
                "(() => {{ const norm = s => (s || '').replace(/\\s+/g, ' ').trim().toLowerCase(); \
                 const needle = norm({}); \
                 return Array.from(document.querySelectorAll('body *')) \
                 .filter(el => !['SCRIPT', 'STYLE', 'NOSCRIPT'].includes(el.tagName)) \
                 .filter(el => norm(el.textContent).includes(needle)) \
                 .filter(el => !Array.from(el.children).some(c => norm(c.textContent).includes(needle))); }})()",
                js_str(text)
            ),
            Self::Role { role, name, level } => {
                let name_js = name.as_deref().map_or_else(|| "null".to_string(), js_str);
                let level_js = level.map_or_else(|| "null".to_string(), |l| l.to_string());
                format!(
                    "(() => {{ const norm = s => (s || '').replace(/\\s+/g, ' ').trim().toLowerCase(); \
                     const name = {name_js}; const level = {level_js}; \
                     return Array.from(document.querySelectorAll({css})) \
                     .filter(el => name === null || norm(el.getAttribute('aria-label') || el.textContent || el.value) === norm(name)) \
                     .filter(el => level === null || el.tagName === 'H' + level || el.getAttribute('aria-level') === String(level)); }})()",
                    css = js_str(role.implicit_css()),
                )
            }
            Self::Attribute { name, value } => format!(
                "Array.from(document.querySelectorAll('[' + CSS.escape({}) + '=' + JSON.stringify({}) + ']'))",
                js_str(name),
                js_str(value)
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css={css}"),
            Self::Text(text) => write!(f, "text={text:?}"),
            Self::Role { role, name, level } => {
                write!(f, "role={role}")?;
                if let Some(name) = name {
                    write!(f, "[name={name:?}]")?;
                }
                if let Some(level) = level {
                    write!(f, "[level={level}]")?;
                }
                Ok(())
            }
            Self::Attribute { name, value } => write!(f, "[{name}={value:?}]"),
        }
    }
}

fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// What to do when a selector matches more than one element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Disambiguation {
    /// More than one match is an `ElementAmbiguous` failure
    #[default]
    RequireUnique,
    /// The first match in document order wins
    FirstMatch,
    /// Keep only matches whose text contains this value, then take the first
    TextScope(Cow<'static, str>),
}

impl Disambiguation {
    /// Narrow the raw matches to the candidates this policy considers
    #[must_use]
    pub fn candidates(&self, matches: Vec<ElementHandle>) -> Vec<ElementHandle> {
        match self {
            Self::TextScope(text) => {
                let needle = text.to_lowercase();
                matches
                    .into_iter()
                    .filter(|el| {
                        el.text
                            .as_deref()
                            .is_some_and(|t| t.to_lowercase().contains(&needle))
                    })
                    .collect()
            }
            Self::RequireUnique | Self::FirstMatch => matches,
        }
    }

    /// Pick the target among the candidates
    pub fn pick(
        &self,
        locator: &str,
        mut candidates: Vec<ElementHandle>,
    ) -> PomResult<Option<ElementHandle>> {
        match self {
            Self::RequireUnique if candidates.len() > 1 => Err(PomError::ElementAmbiguous {
                locator: locator.to_string(),
                count: candidates.len(),
            }),
            _ if candidates.is_empty() => Ok(None),
            _ => Ok(Some(candidates.swap_remove(0))),
        }
    }
}

/// A named entry of a page's locator registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorSpec {
    /// Semantic element name
    pub name: &'static str,
    /// How to find it
    pub selector: Selector,
    /// Multi-match policy
    pub disambiguation: Disambiguation,
}

impl LocatorSpec {
    /// Strict registry entry
    #[must_use]
    pub const fn new(name: &'static str, selector: Selector) -> Self {
        Self::with(name, selector, Disambiguation::RequireUnique)
    }

    /// Registry entry where the first match in document order wins
    #[must_use]
    pub const fn first_match(name: &'static str, selector: Selector) -> Self {
        Self::with(name, selector, Disambiguation::FirstMatch)
    }

    /// Registry entry narrowed by visible text
    #[must_use]
    pub const fn scoped(name: &'static str, selector: Selector, text: &'static str) -> Self {
        Self::with(name, selector, Disambiguation::TextScope(Cow::Borrowed(text)))
    }

    /// Registry entry with an explicit policy
    #[must_use]
    pub const fn with(
        name: &'static str,
        selector: Selector,
        disambiguation: Disambiguation,
    ) -> Self {
        Self {
            name,
            selector,
            disambiguation,
        }
    }
}

/// Element state a locator can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// At least one candidate exists
    Attached,
    /// The picked candidate is visible
    Visible,
    /// No candidate, or the picked candidate is hidden
    Hidden,
}

/// A registry entry bound to a live session.
#[derive(Debug, Clone)]
pub struct Locator {
    session: Session,
    name: Cow<'static, str>,
    selector: Selector,
    disambiguation: Disambiguation,
    timeout_ms: Option<u64>,
}

impl Locator {
    /// Bind a registry entry to a session
    #[must_use]
    pub fn bind(spec: &LocatorSpec, session: &Session) -> Self {
        Self {
            session: session.clone(),
            name: Cow::Borrowed(spec.name),
            selector: spec.selector.clone(),
            disambiguation: spec.disambiguation.clone(),
            timeout_ms: None,
        }
    }

    /// Ad-hoc locator (e.g. for runtime-generated text)
    #[must_use]
    pub fn adhoc(
        session: &Session,
        name: impl Into<String>,
        selector: Selector,
        disambiguation: Disambiguation,
    ) -> Self {
        Self {
            session: session.clone(),
            name: Cow::Owned(name.into()),
            selector,
            disambiguation,
            timeout_ms: None,
        }
    }

    /// Override the session's action timeout for this locator
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Semantic name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Multi-match policy
    #[must_use]
    pub const fn disambiguation(&self) -> &Disambiguation {
        &self.disambiguation
    }

    /// Human-readable description used in errors and logs
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, self.selector)
    }

    /// Effective wait options
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        let timeouts = self.session.timeouts();
        WaitOptions::new()
            .with_timeout(self.timeout_ms.unwrap_or(timeouts.action_ms))
            .with_poll_interval(timeouts.poll_ms)
    }

    /// Query once and narrow by policy, without waiting
    async fn candidates(&self) -> PomResult<Vec<ElementHandle>> {
        let matches = self.session.driver().query_all(&self.selector).await?;
        Ok(self.disambiguation.candidates(matches))
    }

    /// Query once and pick the target, without waiting
    async fn pick_now(&self) -> PomResult<Option<ElementHandle>> {
        let candidates = self.candidates().await?;
        self.disambiguation.pick(&self.describe(), candidates)
    }

    /// Wait for a target that satisfies `ready`
    async fn resolve_where(
        &self,
        ready: impl Fn(&ElementHandle) -> bool,
    ) -> PomResult<ElementHandle> {
        let options = self.wait_options();
        let description = self.describe();
        let ready = &ready;
        poll_for(&options, &description, || async move {
            Ok::<_, PomError>(self.pick_now().await?.filter(|el| ready(el)))
        })
        .await
        .map(|(el, _)| el)
        .map_err(|e| match e {
            PomError::Timeout { ms } => PomError::ElementNotFound {
                locator: self.describe(),
                timeout_ms: ms,
            },
            other => other,
        })
    }

    /// Resolve to exactly one element, waiting up to the action timeout
    pub async fn resolve(&self) -> PomResult<ElementHandle> {
        self.resolve_where(|_| true).await
    }

    /// Resolve to a visible, enabled element ready for input
    async fn actionable(&self, action: &str) -> PomResult<ElementHandle> {
        let element = self.resolve_where(|el| el.visible).await?;
        if !element.enabled {
            return Err(self.action_failed(action, "element is disabled"));
        }
        Ok(element)
    }

    fn action_failed(&self, action: &str, message: impl Into<String>) -> PomError {
        PomError::ActionFailed {
            locator: self.describe(),
            action: action.to_string(),
            message: message.into(),
        }
    }

    fn lift_driver_error(&self, action: &str, err: PomError) -> PomError {
        match err {
            PomError::Driver { message } => self.action_failed(action, message),
            other => other,
        }
    }

    /// Click the element
    pub async fn click(&self) -> PomResult<()> {
        let element = self.actionable("click").await?;
        tracing::debug!(locator = %self.describe(), "click");
        self.session
            .driver()
            .click(&self.selector, element.index)
            .await
            .map_err(|e| self.lift_driver_error("click", e))
    }

    /// Replace the element's value with `text`
    pub async fn fill(&self, text: &str) -> PomResult<()> {
        let element = self.actionable("fill").await?;
        tracing::debug!(locator = %self.describe(), len = text.len(), "fill");
        self.session
            .driver()
            .fill(&self.selector, element.index, text)
            .await
            .map_err(|e| self.lift_driver_error("fill", e))
    }

    /// Choose the option with this value in a select element
    pub async fn select_option(&self, value: &str) -> PomResult<()> {
        let element = self.actionable("select_option").await?;
        tracing::debug!(locator = %self.describe(), value, "select_option");
        self.session
            .driver()
            .select_option(&self.selector, element.index, value)
            .await
            .map_err(|e| self.lift_driver_error("select_option", e))
    }

    /// Tick a checkbox (no-op if already checked)
    pub async fn check(&self) -> PomResult<()> {
        let element = self.actionable("check").await?;
        tracing::debug!(locator = %self.describe(), "check");
        self.session
            .driver()
            .check(&self.selector, element.index)
            .await
            .map_err(|e| self.lift_driver_error("check", e))
    }

    /// Text content of the element, waiting up to the action timeout
    pub async fn text_content(&self) -> PomResult<String> {
        Ok(self.resolve().await?.text.unwrap_or_default())
    }

    /// Current value of an input or select, waiting up to the action timeout
    pub async fn input_value(&self) -> PomResult<String> {
        Ok(self.resolve().await?.value.unwrap_or_default())
    }

    /// Whether the target is visible right now; `false` when nothing matches
    pub async fn is_visible(&self) -> PomResult<bool> {
        Ok(self.pick_now().await?.is_some_and(|el| el.visible))
    }

    /// The element this locator points at right now, without waiting
    pub async fn peek(&self) -> PomResult<Option<ElementHandle>> {
        self.pick_now().await
    }

    /// Number of candidates right now
    pub async fn count(&self) -> PomResult<usize> {
        Ok(self.candidates().await?.len())
    }

    /// Text of every candidate right now; empty when nothing matches
    pub async fn all_text_contents(&self) -> PomResult<Vec<String>> {
        Ok(self
            .candidates()
            .await?
            .into_iter()
            .map(|el| el.text.unwrap_or_default())
            .collect())
    }

    /// Wait until the element reaches `state`
    pub async fn wait_for(&self, state: WaitState) -> PomResult<()> {
        match state {
            WaitState::Attached => self.resolve().await.map(|_| ()),
            WaitState::Visible => self.resolve_where(|el| el.visible).await.map(|_| ()),
            WaitState::Hidden => {
                let options = self.wait_options();
                let description = format!("{} hidden", self.describe());
                crate::wait::wait_until(&options, &description, || async {
                    Ok::<_, PomError>(!self.is_visible().await?)
                })
                .await
                .map(|_| ())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::session::{Session, Timeouts};
    use std::sync::Arc;

    fn session_with(elements: Vec<MockElement>) -> Session {
        let driver = MockDriver::new().with_screen("/", elements);
        Session::new(Arc::new(driver), "https://bank.test")
            .with_timeouts(Timeouts::new(60, 1_000, 5))
    }

    async fn opened(elements: Vec<MockElement>) -> Session {
        let session = session_with(elements);
        session.goto("/").await.unwrap();
        session
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let js = Selector::css("#username").to_js();
            assert!(js.contains("querySelectorAll"));
            assert!(js.contains("\"#username\""));
        }

        #[test]
        fn test_text_query_escapes() {
            let js = Selector::text("You've been \"approved\"").to_js();
            assert!(js.contains("textContent"));
            assert!(js.contains("\\\"approved\\\""));
        }

        #[test]
        fn test_role_query_includes_name_and_level() {
            let js = Selector::heading("Welcome!", 3).to_js();
            assert!(js.contains("h1, h2"));
            assert!(js.contains("\"Welcome!\""));
            assert!(js.contains("const level = 3"));
        }

        #[test]
        fn test_role_without_name() {
            let js = Selector::Role {
                role: AriaRole::Dialog,
                name: None,
                level: None,
            }
            .to_js();
            assert!(js.contains("const name = null"));
        }

        #[test]
        fn test_attribute_query() {
            let js = Selector::attribute("href", "/register-account").to_js();
            assert!(js.contains("CSS.escape(\"href\")"));
            assert!(js.contains("/register-account"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("#x").to_string(), "css=#x");
            assert_eq!(
                Selector::heading("Loan Center", 5).to_string(),
                "role=heading[name=\"Loan Center\"][level=5]"
            );
        }
    }

    mod disambiguation_tests {
        use super::*;

        fn handle(index: usize, text: &str) -> ElementHandle {
            ElementHandle {
                index,
                tag_name: "a".into(),
                text: Some(text.into()),
                visible: true,
                enabled: true,
                value: None,
                checked: false,
            }
        }

        #[test]
        fn test_require_unique_rejects_multiple() {
            let err = Disambiguation::RequireUnique
                .pick("x", vec![handle(0, "a"), handle(1, "b")])
                .unwrap_err();
            assert!(matches!(err, PomError::ElementAmbiguous { count: 2, .. }));
        }

        #[test]
        fn test_first_match_takes_first() {
            let picked = Disambiguation::FirstMatch
                .pick("x", vec![handle(0, "a"), handle(1, "b")])
                .unwrap()
                .unwrap();
            assert_eq!(picked.index, 0);
        }

        #[test]
        fn test_text_scope_narrows_and_keeps_index() {
            let policy = Disambiguation::TextScope(Cow::Borrowed("loan status"));
            let candidates =
                policy.candidates(vec![handle(0, "Apply For A Loan"), handle(1, "Loan Status")]);
            assert_eq!(candidates.len(), 1);
            let picked = policy.pick("x", candidates).unwrap().unwrap();
            assert_eq!(picked.index, 1);
        }

        #[test]
        fn test_empty_is_none() {
            assert!(Disambiguation::RequireUnique
                .pick("x", vec![])
                .unwrap()
                .is_none());
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_const_builders() {
            const SPEC: LocatorSpec =
                LocatorSpec::scoped("loan", Selector::css("#applyForLoan"), "Loan");
            assert_eq!(SPEC.name, "loan");
            assert!(matches!(SPEC.disambiguation, Disambiguation::TextScope(_)));
            const FIRST: LocatorSpec = LocatorSpec::first_match("back", Selector::css("a"));
            assert_eq!(FIRST.disambiguation, Disambiguation::FirstMatch);
            assert_eq!(
                LocatorSpec::new("x", Selector::css("x")).disambiguation,
                Disambiguation::RequireUnique
            );
        }
    }

    mod bound_locator_tests {
        use super::*;

        #[tokio::test]
        async fn test_text_content_resolves() {
            let session = opened(vec![MockElement::new("h3").text("Welcome!")]).await;
            let loc = Locator::bind(&LocatorSpec::new("w", Selector::heading("Welcome!", 3)), &session);
            assert_eq!(loc.text_content().await.unwrap(), "Welcome!");
        }

        #[tokio::test]
        async fn test_missing_element_times_out_as_not_found() {
            let session = opened(vec![]).await;
            let loc = Locator::bind(&LocatorSpec::new("missing", Selector::css("#nope")), &session);
            let err = loc.text_content().await.unwrap_err();
            assert!(matches!(err, PomError::ElementNotFound { timeout_ms: 60, .. }));
        }

        #[tokio::test]
        async fn test_queries_tolerate_zero_matches() {
            let session = opened(vec![]).await;
            let loc = Locator::bind(&LocatorSpec::new("rows", Selector::css(".row")), &session);
            assert!(!loc.is_visible().await.unwrap());
            assert_eq!(loc.count().await.unwrap(), 0);
            assert!(loc.all_text_contents().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_strict_locator_is_ambiguous() {
            let session = opened(vec![
                MockElement::new("a").id("applyForLoan").text("Apply For A Loan"),
                MockElement::new("a").id("applyForLoan").text("Loan Status"),
            ])
            .await;
            let loc = Locator::bind(&LocatorSpec::new("loan", Selector::css("#applyForLoan")), &session);
            assert!(matches!(
                loc.click().await.unwrap_err(),
                PomError::ElementAmbiguous { count: 2, .. }
            ));
        }

        #[tokio::test]
        async fn test_disabled_control_is_action_failed() {
            let session = opened(vec![MockElement::new("button").text("Apply").disabled()]).await;
            let loc = Locator::bind(
                &LocatorSpec::new("apply", Selector::role(AriaRole::Button, "Apply")),
                &session,
            );
            let err = loc.click().await.unwrap_err();
            assert!(matches!(err, PomError::ActionFailed { .. }));
        }

        #[tokio::test]
        async fn test_fill_and_read_back() {
            let session = opened(vec![MockElement::new("input").id("username")]).await;
            let loc = Locator::bind(&LocatorSpec::new("u", Selector::css("#username")), &session);
            loc.fill("jdoe").await.unwrap();
            assert_eq!(loc.input_value().await.unwrap(), "jdoe");
        }

        #[tokio::test]
        async fn test_unknown_option_is_action_failed() {
            let session = opened(vec![MockElement::new("select")
                .id("typeOfAccount")
                .options(&["checking", "savings"])])
            .await;
            let loc = Locator::bind(&LocatorSpec::new("t", Selector::css("#typeOfAccount")), &session);
            loc.select_option("savings").await.unwrap();
            let err = loc.select_option("brokerage").await.unwrap_err();
            assert!(matches!(err, PomError::ActionFailed { .. }));
        }

        #[tokio::test]
        async fn test_wait_for_hidden() {
            let session = opened(vec![MockElement::new("div").css("mat-dialog-content").hidden()]).await;
            let loc = Locator::bind(
                &LocatorSpec::new("dialog", Selector::css("mat-dialog-content")),
                &session,
            );
            loc.wait_for(WaitState::Hidden).await.unwrap();
            assert!(matches!(
                loc.wait_for(WaitState::Visible).await.unwrap_err(),
                PomError::ElementNotFound { .. }
            ));
            loc.wait_for(WaitState::Attached).await.unwrap();
        }
    }
}
