//! Fluent builder for browser automation scenarios.
//!
//! A scenario is a list of steps (click, fill, wait, ...) the API replays in
//! the rendering browser before returning the page. Steps serialize to the
//! API's JSON shape, e.g. `{"click": {"selector": "#go"}}` or `{"wait": 500}`,
//! and are sent base64 encoded as the `js_scenario` parameter.
//!
//! ```ignore
//! let steps = ScenarioBuilder::new()
//!     .fill("input[name=username]", "user123")
//!     .fill_with("input[name=password]", "hunter2", FillOptions { clear: true })
//!     .click("button[type='submit']")
//!     .wait_for_navigation_with(WaitForNavigationOptions { timeout: 5000 })
//!     .wait_for_selector("#dashboard")
//!     .build()?;
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Serialize};

use crate::error::ScrapflyError;

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// One scenario step, serialized as `{"<action>": <params>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStep {
    Click(ClickParams),
    Fill(FillParams),
    /// Pause, in milliseconds.
    Wait(u64),
    Execute(ExecuteParams),
    WaitForNavigation(WaitForNavigationParams),
    WaitForSelector(WaitForSelectorParams),
    Scroll(ScrollParams),
    Condition(ConditionParams),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClickParams {
    pub selector: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ignore_if_not_visible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillParams {
    pub selector: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub clear: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteParams {
    pub script: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitForNavigationParams {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u64,
}

/// Element state to wait for or test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorState {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitForSelectorParams {
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SelectorState>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollParams {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub element: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub selector: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub infinite: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub click_selector: String,
}

/// What to do when a condition step matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionAction {
    Continue,
    ExitSuccess,
    ExitFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector_state: Option<SelectorState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ConditionAction>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOptions {
    /// Skip the step when the element is not visible.
    pub ignore_if_not_visible: bool,
    /// Click every matching element.
    pub multiple: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillOptions {
    /// Clear the field before typing.
    pub clear: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitForNavigationOptions {
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitForSelectorOptions {
    pub state: Option<SelectorState>,
    pub timeout: u64,
}

/// Options for a scroll step. With no options the page scrolls to the bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollOptions {
    /// Container to scroll instead of the page body.
    pub element: String,
    /// Element to scroll to; `"bottom"` is accepted.
    pub selector: String,
    /// Number of infinite-scroll iterations.
    pub infinite: u64,
    /// Element to click after each scroll ("load more" buttons).
    pub click_selector: String,
}

/// Accumulates scenario steps.
///
/// The first invalid step latches an error; later calls are ignored and
/// [`build`](Self::build) reports it.
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    steps: Vec<ScenarioStep>,
    error: Option<String>,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps added so far.
    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    fn push(mut self, step: Result<ScenarioStep, String>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match step {
            Ok(step) => self.steps.push(step),
            Err(e) => self.error = Some(e),
        }
        self
    }

    pub fn click(self, selector: impl Into<String>) -> Self {
        self.click_with(selector, ClickOptions::default())
    }

    pub fn click_with(self, selector: impl Into<String>, opts: ClickOptions) -> Self {
        let step = require("click", selector.into()).map(|selector| {
            ScenarioStep::Click(ClickParams {
                selector,
                ignore_if_not_visible: opts.ignore_if_not_visible,
                multiple: opts.multiple,
            })
        });
        self.push(step)
    }

    pub fn fill(self, selector: impl Into<String>, value: impl Into<String>) -> Self {
        self.fill_with(selector, value, FillOptions::default())
    }

    pub fn fill_with(
        self,
        selector: impl Into<String>,
        value: impl Into<String>,
        opts: FillOptions,
    ) -> Self {
        let value = value.into();
        let step = require("fill", selector.into()).map(|selector| {
            ScenarioStep::Fill(FillParams {
                selector,
                value,
                clear: opts.clear,
            })
        });
        self.push(step)
    }

    /// Pause for `milliseconds`.
    pub fn wait(self, milliseconds: u64) -> Self {
        self.push(Ok(ScenarioStep::Wait(milliseconds)))
    }

    /// Run a JavaScript snippet in the page.
    pub fn execute(self, script: impl Into<String>) -> Self {
        self.execute_with(script, ExecuteOptions::default())
    }

    pub fn execute_with(self, script: impl Into<String>, opts: ExecuteOptions) -> Self {
        let step = require("execute", script.into()).map(|script| {
            ScenarioStep::Execute(ExecuteParams {
                script,
                timeout: opts.timeout,
            })
        });
        self.push(step)
    }

    pub fn wait_for_navigation(self) -> Self {
        self.wait_for_navigation_with(WaitForNavigationOptions::default())
    }

    pub fn wait_for_navigation_with(self, opts: WaitForNavigationOptions) -> Self {
        self.push(Ok(ScenarioStep::WaitForNavigation(WaitForNavigationParams {
            timeout: opts.timeout,
        })))
    }

    pub fn wait_for_selector(self, selector: impl Into<String>) -> Self {
        self.wait_for_selector_with(selector, WaitForSelectorOptions::default())
    }

    pub fn wait_for_selector_with(
        self,
        selector: impl Into<String>,
        opts: WaitForSelectorOptions,
    ) -> Self {
        let step = require("wait_for_selector", selector.into()).map(|selector| {
            ScenarioStep::WaitForSelector(WaitForSelectorParams {
                selector,
                state: opts.state,
                timeout: opts.timeout,
            })
        });
        self.push(step)
    }

    /// Scroll to the bottom of the page.
    pub fn scroll(self) -> Self {
        self.scroll_with(ScrollOptions::default())
    }

    pub fn scroll_with(self, opts: ScrollOptions) -> Self {
        self.push(Ok(ScenarioStep::Scroll(ScrollParams {
            element: opts.element,
            selector: opts.selector,
            infinite: opts.infinite,
            click_selector: opts.click_selector,
        })))
    }

    /// Branch on the HTTP status code of the page.
    pub fn condition_on_status_code(self, status_code: u16, action: ConditionAction) -> Self {
        self.push(Ok(ScenarioStep::Condition(ConditionParams {
            status_code: Some(status_code),
            action: Some(action),
            ..ConditionParams::default()
        })))
    }

    /// Branch on the presence or absence of an element.
    pub fn condition_on_selector(
        self,
        selector: impl Into<String>,
        state: SelectorState,
        action: ConditionAction,
    ) -> Self {
        let step = require("condition", selector.into()).map(|selector| {
            ScenarioStep::Condition(ConditionParams {
                selector,
                selector_state: Some(state),
                action: Some(action),
                ..ConditionParams::default()
            })
        });
        self.push(step)
    }

    /// Finish the scenario. An empty scenario is valid and yields `None`.
    pub fn build(self) -> Result<Option<Vec<ScenarioStep>>, ScrapflyError> {
        if let Some(e) = self.error {
            return Err(ScrapflyError::scrape_config(format!("invalid js scenario: {e}")));
        }
        if self.steps.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.steps))
    }
}

fn require(action: &str, value: String) -> Result<String, String> {
    if value.trim().is_empty() {
        Err(format!("{action} step requires a non-empty value"))
    } else {
        Ok(value)
    }
}

/// Encode steps as the `js_scenario` query parameter (URL-safe base64 JSON).
pub fn encode_scenario(steps: &[ScenarioStep]) -> Result<String, ScrapflyError> {
    let json = serde_json::to_vec(steps)
        .map_err(|e| ScrapflyError::scrape_config(format!("failed to serialize js scenario: {e}")))?;
    Ok(URL_SAFE.encode(json))
}

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod tests;
