//! Scenario behaviour against the simulated storefront, with and without
//! injected defects.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use storecheck::{
    cart_accumulation, successful_submission, validation_then_correction, BuyStep, CartPlan,
    FailureKind, Faults, FormField, Locator, Scenario, ScenarioKind, ScenarioRunner, Session,
    SimulatedFactory, SimulatedStorefront, StorecheckError, SuiteConfig, TestStatus,
    TimeoutConfig,
};

const ROOT: &str = "https://jupiter.example";

fn config() -> SuiteConfig {
    let mut config = SuiteConfig::default();
    config.site.base_url = ROOT.to_string();
    config.timeouts = TimeoutConfig::simulated();
    config
}

fn session(faults: Faults) -> Session<SimulatedStorefront> {
    Session::new(
        SimulatedStorefront::with_faults(ROOT, faults),
        "integration",
        TimeoutConfig::simulated(),
    )
}

// ============================================================================
// Whole suite
// ============================================================================

#[tokio::test]
async fn test_full_suite_passes_on_healthy_storefront() {
    let config = config();
    let scenarios = Scenario::all(&config);
    let runner = ScenarioRunner::new(SimulatedFactory::new(ROOT), config);
    let report = runner.run(&scenarios).await;
    for entry in report.results() {
        assert_eq!(entry.status, TestStatus::Passed, "{}: {:?}", entry.name, entry.failure);
    }
    assert_eq!(report.total_count(), 7);
    assert!(report.summary().ends_with("7/7 passed (100.0%)"));
}

#[tokio::test]
async fn test_submission_runs_are_independent_entries() {
    let mut config = config();
    config.runner.submission_runs = 3;
    config.runner.workers = 3;
    let scenarios = Scenario::filtered(&config, Some("successful-submission"));
    let runner = ScenarioRunner::new(SimulatedFactory::new(ROOT), config);
    let report = runner.run(&scenarios).await;
    let names: Vec<&str> = report.results().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "contact/successful-submission/run-1",
            "contact/successful-submission/run-2",
            "contact/successful-submission/run-3",
        ]
    );
    assert!(report.all_passed());
}

// ============================================================================
// Scenario A: validation then correction
// ============================================================================

#[tokio::test]
async fn test_validation_passes_and_leaves_fields_filled() {
    let config = config();
    let mut s = session(Faults::default());
    validation_then_correction(&mut s, &config).await.unwrap();
    assert_eq!(s.input_value(&Locator::new("#forename")).await.unwrap(), "Alice");
    assert_eq!(
        s.input_value(&Locator::new("#message")).await.unwrap(),
        "Hello, this is a test message."
    );
}

#[tokio::test]
async fn test_wrong_error_text_is_exact_mismatch() {
    let faults = Faults {
        error_text: Some((FormField::Email, "Email is required.".into())),
        ..Faults::default()
    };
    let err = validation_then_correction(&mut session(faults), &config())
        .await
        .unwrap_err();
    match err {
        StorecheckError::AssertionFailed {
            locator,
            expected,
            actual,
        } => {
            assert_eq!(locator, "css=#email-err");
            assert_eq!(expected, "text \"Email is required\"");
            assert_eq!(actual, "\"Email is required.\"");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_errors_that_stay_visible_fail_hidden_check() {
    let faults = Faults {
        sticky_errors: true,
        ..Faults::default()
    };
    let err = validation_then_correction(&mut session(faults), &config())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Assertion);
    assert!(err.to_string().contains("#forename-err"));
    assert!(err.to_string().contains("got visible"));
}

#[tokio::test]
async fn test_resubmitting_empty_form_shows_same_errors() {
    let mut s = session(Faults::default());
    s.navigate(ROOT, storecheck::LoadState::Load).await.unwrap();
    s.click(&Locator::new("text=Contact")).await.unwrap();
    for _ in 0..2 {
        s.click(&Locator::new("text=Submit")).await.unwrap();
        for field in FormField::ALL {
            let error = Locator::new(&field.error_selector());
            s.expect(&error).to_be_visible().await.unwrap();
            s.expect(&error)
                .to_have_text(field.required_message())
                .await
                .unwrap();
        }
    }
}

// ============================================================================
// Scenario B: successful submission
// ============================================================================

#[tokio::test]
async fn test_acknowledgement_waits_for_slow_response() {
    let faults = Faults {
        success_delay_polls: 50,
        ..Faults::default()
    };
    successful_submission(&mut session(faults), &config())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wrong_name_in_acknowledgement_fails() {
    let faults = Faults {
        acknowledge_as: Some("Bob".into()),
        ..Faults::default()
    };
    let err = successful_submission(&mut session(faults), &config())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Assertion);
    assert!(err.to_string().contains("Thanks Bob"));
}

#[tokio::test]
async fn test_missing_acknowledgement_times_out() {
    let faults = Faults {
        never_acknowledge: true,
        ..Faults::default()
    };
    let err = successful_submission(&mut session(faults), &config())
        .await
        .unwrap_err();
    match err {
        StorecheckError::Timeout { condition, ms } => {
            assert!(condition.contains(".alert-success"));
            assert_eq!(ms, 500);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Scenario C: cart accumulation
// ============================================================================

#[tokio::test]
async fn test_default_plan_yields_two_five_three() {
    let mut s = session(Faults::default());
    cart_accumulation(&mut s, &config()).await.unwrap();
    let store = s.driver_mut();
    assert_eq!(store.cart_quantity("Stuffed Frog"), 2);
    assert_eq!(store.cart_quantity("Fluffy Bunny"), 5);
    assert_eq!(store.cart_quantity("Valentine Bear"), 3);
    assert!(store.actions().iter().any(|a| a.ends_with("DOMContentLoaded")));
}

#[tokio::test]
async fn test_lost_click_is_quantity_mismatch() {
    let faults = Faults {
        dropped_buy_clicks: 1,
        ..Faults::default()
    };
    let err = cart_accumulation(&mut session(faults), &config())
        .await
        .unwrap_err();
    match err {
        StorecheckError::AssertionFailed {
            locator,
            expected,
            actual,
        } => {
            assert!(locator.contains("Stuffed Frog"));
            assert_eq!(expected, "quantity 2");
            assert_eq!(actual, "quantity 1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_numeric_quantity_is_parse_failure() {
    let faults = Faults {
        garbled_quantity: Some("Fluffy Bunny".into()),
        ..Faults::default()
    };
    let err = cart_accumulation(&mut session(faults), &config())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Parse);
    assert_eq!(
        err.to_string(),
        "Quantity is not a number for product: Fluffy Bunny. Got: \"NaN\""
    );
}

#[tokio::test]
async fn test_duplicate_title_is_strict_violation() {
    let faults = Faults {
        duplicate_product: Some("Valentine Bear".into()),
        ..Faults::default()
    };
    let err = cart_accumulation(&mut session(faults), &config())
        .await
        .unwrap_err();
    match err {
        StorecheckError::StrictModeViolation { locator, count } => {
            assert!(locator.contains("Valentine Bear"));
            assert_eq!(count, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_empty_listing_times_out() {
    let faults = Faults {
        empty_listing: true,
        ..Faults::default()
    };
    let err = cart_accumulation(&mut session(faults), &config())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Timeout);
    assert!(err.to_string().contains("li.product"));
}

#[tokio::test]
async fn test_repeated_product_steps_accumulate() {
    let mut config = config();
    config.cart.plan = CartPlan::new(vec![
        BuyStep::new("Fluffy Bunny", 2),
        BuyStep::new("Teddy Bear", 1),
        BuyStep::new("Fluffy Bunny", 3),
    ]);
    let mut s = session(Faults::default());
    cart_accumulation(&mut s, &config).await.unwrap();
    assert_eq!(s.driver_mut().cart_quantity("Fluffy Bunny"), 5);
}

#[tokio::test]
async fn test_runner_classifies_failures() {
    let mut config = config();
    config.runner.submission_runs = 1;
    let faults = Faults {
        garbled_quantity: Some("Stuffed Frog".into()),
        never_acknowledge: true,
        ..Faults::default()
    };
    let scenarios = Scenario::all(&config);
    let runner = ScenarioRunner::new(SimulatedFactory::new(ROOT).with_faults(faults), config);
    let report = runner.run(&scenarios).await;
    let kinds: Vec<Option<FailureKind>> = report
        .results()
        .iter()
        .map(|r| r.failure.as_ref().map(|f| f.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![None, Some(FailureKind::Timeout), Some(FailureKind::Parse)]
    );
    assert_eq!(
        report.results()[2].failure.as_ref().unwrap().phase,
        "interacting"
    );
    assert_eq!(
        Scenario::new(ScenarioKind::CartAccumulation).name,
        report.results()[2].name
    );
}
