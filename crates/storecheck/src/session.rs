//! One browser session driving one scenario run.
//!
//! The session owns its driver, so two runs never share browser state.
//! Locators resolve lazily and strictly: an action polls until its locator
//! matches exactly one visible element, fails immediately when it matches
//! several, and times out when it matches none.

use crate::config::TimeoutConfig;
use crate::driver::{BrowserDriver, ElementHandle};
use crate::expect::Expectation;
use crate::locator::{ElementState, Locator};
use crate::result::{StorecheckError, StorecheckResult};
use crate::wait::{Deadline, LoadState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Lifecycle of a scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "reason", rename_all = "snake_case")]
pub enum ScenarioPhase {
    /// Session opened, nothing issued yet
    NotStarted,
    /// Loading a page
    Navigating,
    /// Clicking, filling, reading
    Interacting,
    /// Checking expectations
    Asserting,
    /// All expectations held
    Passed,
    /// Aborted with a reason
    Failed(String),
}

impl ScenarioPhase {
    /// Whether the run has finished
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed(_))
    }

    /// Short name without the failure reason
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Navigating => "navigating",
            Self::Interacting => "interacting",
            Self::Asserting => "asserting",
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for ScenarioPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            other => f.write_str(other.name()),
        }
    }
}

/// A browser session bound to one scenario run
#[derive(Debug)]
pub struct Session<D: BrowserDriver> {
    id: Uuid,
    scenario: String,
    driver: D,
    timeouts: TimeoutConfig,
    phase: ScenarioPhase,
    /// Last phase before a terminal one, for reporting
    last_active: ScenarioPhase,
    /// Locators that have matched at least one element in this session
    seen: HashSet<String>,
}

impl<D: BrowserDriver> Session<D> {
    /// Wrap a freshly opened driver
    pub fn new(driver: D, scenario: impl Into<String>, timeouts: TimeoutConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            scenario: scenario.into(),
            driver,
            timeouts,
            phase: ScenarioPhase::NotStarted,
            last_active: ScenarioPhase::NotStarted,
            seen: HashSet::new(),
        }
    }

    /// Session identifier used in logs
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Scenario run name
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> &ScenarioPhase {
        &self.phase
    }

    /// Phase the run was in when it last did work
    #[must_use]
    pub const fn last_active_phase(&self) -> &ScenarioPhase {
        &self.last_active
    }

    /// Configured timeouts
    #[must_use]
    pub const fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    /// Underlying driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Move to `phase`, logging the transition
    pub fn enter(&mut self, phase: ScenarioPhase) {
        if self.phase == phase || self.phase.is_terminal() {
            return;
        }
        tracing::debug!(
            session = %self.id,
            scenario = %self.scenario,
            from = self.phase.name(),
            to = phase.name(),
            "phase transition"
        );
        if !phase.is_terminal() {
            self.last_active = phase.clone();
        }
        self.phase = phase;
    }

    /// Navigate and wait for `wait_until`, bounded by the navigation timeout
    ///
    /// # Errors
    ///
    /// Returns the driver's navigation error, or a timeout
    pub async fn navigate(&mut self, url: &str, wait_until: LoadState) -> StorecheckResult<()> {
        self.enter(ScenarioPhase::Navigating);
        tracing::debug!(session = %self.id, url, wait_until = %wait_until, "navigate");
        let timeout = self.timeouts.navigation();
        match tokio::time::timeout(timeout, self.driver.navigate(url, wait_until)).await {
            Ok(result) => result,
            Err(_) => Err(StorecheckError::timeout(
                format!("navigation to {url} ({wait_until})"),
                duration_ms(timeout),
            )),
        }
    }

    /// All current matches, without waiting. Scoping locators must match at
    /// most one element.
    ///
    /// # Errors
    ///
    /// Returns a strict-mode violation if a scoping locator is ambiguous
    pub async fn query(&mut self, locator: &Locator) -> StorecheckResult<Vec<ElementHandle>> {
        let mut scope: Option<ElementHandle> = None;
        let mut prefix: Option<Locator> = None;
        let chain = locator.chain();
        let last = chain.len() - 1;
        for (depth, selector) in chain.into_iter().enumerate() {
            let matches = self.driver.query_all(scope.as_ref(), selector).await?;
            let current = match prefix.take() {
                Some(parent) => parent.locator(selector.clone()),
                None => Locator::from_selector(selector.clone()),
            };
            if !matches.is_empty() {
                self.seen.insert(current.to_string());
            }
            if depth == last {
                return Ok(matches);
            }
            match matches.len() {
                0 => return Ok(Vec::new()),
                1 => scope = matches.into_iter().next(),
                count => {
                    return Err(StorecheckError::StrictModeViolation {
                        locator: current.to_string(),
                        count,
                    })
                }
            }
            prefix = Some(current);
        }
        Ok(Vec::new())
    }

    /// The single current match, if any
    ///
    /// # Errors
    ///
    /// Returns a strict-mode violation if more than one element matches
    pub async fn query_one(&mut self, locator: &Locator) -> StorecheckResult<Option<ElementHandle>> {
        let mut matches = self.query(locator).await?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(StorecheckError::StrictModeViolation {
                locator: locator.to_string(),
                count,
            }),
        }
    }

    /// Whether `locator` has matched at least one element in this session
    #[must_use]
    pub fn has_seen(&self, locator: &Locator) -> bool {
        self.seen.contains(&locator.to_string())
    }

    /// Wait until `locator` matches exactly one element, and until it is
    /// visible when `visible` is set.
    async fn resolve(&mut self, locator: &Locator, visible: bool) -> StorecheckResult<ElementHandle> {
        let deadline = Deadline::after(self.timeouts.action(), self.timeouts.poll_interval());
        loop {
            if let Some(handle) = self.query_one(locator).await? {
                if !visible || self.driver.is_visible(&handle).await? {
                    return Ok(handle);
                }
            }
            if deadline.expired() {
                let state = if visible {
                    ElementState::Visible
                } else {
                    ElementState::Attached
                };
                return Err(StorecheckError::timeout(
                    format!("{locator} to be {state}"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.tick().await;
        }
    }

    /// Click the element `locator` resolves to
    ///
    /// # Errors
    ///
    /// Returns error if the element never becomes actionable or the click fails
    pub async fn click(&mut self, locator: &Locator) -> StorecheckResult<()> {
        self.enter(ScenarioPhase::Interacting);
        let handle = self.resolve(locator, true).await?;
        tracing::debug!(session = %self.id, locator = %locator, "click");
        self.driver.click(&handle).await
    }

    /// Replace the value of the input `locator` resolves to
    ///
    /// # Errors
    ///
    /// Returns error if the element never becomes actionable or the fill fails
    pub async fn fill(&mut self, locator: &Locator, text: &str) -> StorecheckResult<()> {
        self.enter(ScenarioPhase::Interacting);
        let handle = self.resolve(locator, true).await?;
        tracing::debug!(session = %self.id, locator = %locator, len = text.len(), "fill");
        self.driver.fill(&handle, text).await
    }

    /// Current value of the input `locator` resolves to
    ///
    /// # Errors
    ///
    /// Returns error if the element is never attached
    pub async fn input_value(&mut self, locator: &Locator) -> StorecheckResult<String> {
        self.enter(ScenarioPhase::Interacting);
        let handle = self.resolve(locator, false).await?;
        self.driver.input_value(&handle).await
    }

    /// Bounded wait until any match of `locator` reaches `state`
    /// (for [`ElementState::Hidden`]: until no match is visible).
    ///
    /// # Errors
    ///
    /// Returns a timeout naming the locator, state and duration
    pub async fn wait_for(
        &mut self,
        locator: &Locator,
        state: ElementState,
        timeout: Duration,
    ) -> StorecheckResult<()> {
        let deadline = Deadline::after(timeout, self.timeouts.poll_interval());
        loop {
            if self.check_state(locator, state).await? {
                tracing::debug!(
                    session = %self.id,
                    locator = %locator,
                    state = %state,
                    elapsed_ms = duration_ms(deadline.elapsed()),
                    "wait satisfied"
                );
                return Ok(());
            }
            if deadline.expired() {
                return Err(StorecheckError::timeout(
                    format!("{locator} to be {state}"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.tick().await;
        }
    }

    /// Bounded wait until `locator` matches at least `count` elements
    ///
    /// # Errors
    ///
    /// Returns a timeout naming the locator and the count
    pub async fn wait_for_count_at_least(
        &mut self,
        locator: &Locator,
        count: usize,
        timeout: Duration,
    ) -> StorecheckResult<usize> {
        let deadline = Deadline::after(timeout, self.timeouts.poll_interval());
        loop {
            let found = self.query(locator).await?.len();
            if found >= count {
                tracing::debug!(session = %self.id, locator = %locator, found, "count reached");
                return Ok(found);
            }
            if deadline.expired() {
                return Err(StorecheckError::timeout(
                    format!("at least {count} match(es) for {locator} (found {found})"),
                    deadline.timeout_ms(),
                ));
            }
            deadline.tick().await;
        }
    }

    /// Evaluate `state` once
    pub(crate) async fn check_state(
        &mut self,
        locator: &Locator,
        state: ElementState,
    ) -> StorecheckResult<bool> {
        let matches = self.query(locator).await?;
        match state {
            ElementState::Attached => Ok(!matches.is_empty()),
            ElementState::Visible => {
                for handle in &matches {
                    if self.driver.is_visible(handle).await? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ElementState::Hidden => {
                for handle in &matches {
                    if self.driver.is_visible(handle).await? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Start a retrying expectation on `locator`
    pub fn expect(&mut self, locator: &Locator) -> Expectation<'_, D> {
        let timeout = self.timeouts.expect();
        Expectation::new(self, locator.clone(), timeout)
    }

    /// Capture a PNG of the current page
    ///
    /// # Errors
    ///
    /// Returns the driver's screenshot error
    pub async fn screenshot(&mut self) -> StorecheckResult<Vec<u8>> {
        self.driver.screenshot().await
    }

    /// Close the browser
    ///
    /// # Errors
    ///
    /// Returns the driver's close error
    pub async fn close(mut self) -> StorecheckResult<()> {
        tracing::debug!(session = %self.id, scenario = %self.scenario, "close session");
        self.driver.close().await
    }
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedStorefront;

    const ROOT: &str = "https://jupiter.example";

    fn session() -> Session<SimulatedStorefront> {
        Session::new(
            SimulatedStorefront::new(ROOT),
            "unit",
            TimeoutConfig::simulated(),
        )
    }

    mod phase_tests {
        use super::*;

        #[test]
        fn test_terminal_phases() {
            assert!(ScenarioPhase::Passed.is_terminal());
            assert!(ScenarioPhase::Failed("x".into()).is_terminal());
            assert!(!ScenarioPhase::Asserting.is_terminal());
        }

        #[test]
        fn test_terminal_phase_is_sticky() {
            let mut s = session();
            s.enter(ScenarioPhase::Interacting);
            s.enter(ScenarioPhase::Failed("boom".into()));
            s.enter(ScenarioPhase::Asserting);
            assert_eq!(s.phase(), &ScenarioPhase::Failed("boom".into()));
            assert_eq!(s.last_active_phase(), &ScenarioPhase::Interacting);
        }

        #[test]
        fn test_display() {
            assert_eq!(ScenarioPhase::Failed("timeout".into()).to_string(), "failed: timeout");
            assert_eq!(ScenarioPhase::NotStarted.to_string(), "not_started");
        }
    }

    mod resolution_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigate_enters_navigating() {
            let mut s = session();
            s.navigate(ROOT, LoadState::Load).await.unwrap();
            assert_eq!(s.phase(), &ScenarioPhase::Navigating);
        }

        #[tokio::test]
        async fn test_click_times_out_when_nothing_matches() {
            let mut s = session();
            s.navigate(ROOT, LoadState::Load).await.unwrap();
            let err = s.click(&Locator::new("#no-such-thing")).await.unwrap_err();
            match err {
                StorecheckError::Timeout { condition, ms } => {
                    assert!(condition.contains("#no-such-thing"));
                    assert_eq!(ms, 200);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_ambiguous_locator_is_strict_violation() {
            let mut s = session();
            s.navigate(&format!("{ROOT}/#/shop"), LoadState::DomContentLoaded)
                .await
                .unwrap();
            let err = s.click(&Locator::new("li.product")).await.unwrap_err();
            assert!(matches!(err, StorecheckError::StrictModeViolation { .. }));
        }

        #[tokio::test]
        async fn test_nested_locator_resolves_inside_parent() {
            let mut s = session();
            s.navigate(&format!("{ROOT}/#/shop"), LoadState::DomContentLoaded)
                .await
                .unwrap();
            let product = Locator::from_selector(crate::Selector::has_child(
                "li.product",
                "h4",
                "Fluffy Bunny",
            ));
            let buy = product.locator("text=Buy");
            assert_eq!(s.query(&buy).await.unwrap().len(), 1);
            assert!(s.has_seen(&buy));
            assert!(s.has_seen(&product));
        }

        #[tokio::test]
        async fn test_wait_for_attached_and_hidden() {
            let mut s = session();
            s.navigate(ROOT, LoadState::Load).await.unwrap();
            s.click(&Locator::new("text=Contact")).await.unwrap();
            let err_locator = Locator::new("#forename-err");
            s.wait_for(&err_locator, ElementState::Hidden, Duration::from_millis(50))
                .await
                .unwrap();
            let err = s
                .wait_for(&err_locator, ElementState::Visible, Duration::from_millis(20))
                .await
                .unwrap_err();
            assert!(err.to_string().contains("#forename-err to be visible"));
        }

        #[tokio::test]
        async fn test_fill_and_read_back() {
            let mut s = session();
            s.navigate(ROOT, LoadState::Load).await.unwrap();
            s.click(&Locator::new("text=Contact")).await.unwrap();
            let forename = Locator::new("#forename");
            s.fill(&forename, "Alice").await.unwrap();
            assert_eq!(s.input_value(&forename).await.unwrap(), "Alice");
            assert_eq!(s.phase(), &ScenarioPhase::Interacting);
        }
    }
}
