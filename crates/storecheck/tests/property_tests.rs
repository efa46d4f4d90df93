//! Property tests over the simulated storefront: error visibility follows
//! field emptiness, and cart totals are independent of buy order.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use storecheck::{
    cart_accumulation, BrowserDriver, BuyStep, CartPlan, FormField, LoadState, Locator, Session,
    SimulatedStorefront, SuiteConfig, TimeoutConfig,
};

const ROOT: &str = "https://jupiter.example";
const PRODUCTS: [&str; 3] = ["Stuffed Frog", "Fluffy Bunny", "Valentine Bear"];

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(future)
}

fn session() -> Session<SimulatedStorefront> {
    Session::new(SimulatedStorefront::new(ROOT), "property", TimeoutConfig::simulated())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// After a submission, an error indicator is visible exactly for the
    /// fields left empty, however often the form is submitted.
    #[test]
    fn prop_error_visible_iff_field_empty(
        filled in proptest::array::uniform3(any::<bool>()),
        submits in 1usize..3,
    ) {
        // A fully valid submission replaces the form with the acknowledgement.
        prop_assume!(!filled.iter().all(|f| *f));
        let visible = block_on(async {
            let mut s = session();
            s.navigate(ROOT, LoadState::Load).await.unwrap();
            s.click(&Locator::new("text=Contact")).await.unwrap();
            for (field, fill) in FormField::ALL.into_iter().zip(filled) {
                if fill {
                    s.fill(&Locator::new(&field.input_selector()), "x").await.unwrap();
                }
            }
            for _ in 0..submits {
                s.click(&Locator::new("text=Submit")).await.unwrap();
            }
            let mut visible = Vec::new();
            for field in FormField::ALL {
                let handle = s
                    .query_one(&Locator::new(&field.error_selector()))
                    .await
                    .unwrap()
                    .expect("error indicator attached after submit");
                visible.push(s.driver_mut().is_visible(&handle).await.unwrap());
            }
            visible
        });
        for (shown, fill) in visible.into_iter().zip(filled) {
            prop_assert_eq!(shown, !fill);
        }
    }

    /// The cart shows, per product, the total of its buy steps in any order.
    #[test]
    fn prop_cart_totals_independent_of_interleaving(
        steps in proptest::collection::vec((0usize..3, 0u32..4), 1..6),
    ) {
        let plan = CartPlan::new(
            steps.iter().map(|(i, n)| BuyStep::new(PRODUCTS[*i], *n)).collect(),
        );
        let mut config = SuiteConfig::default();
        config.site.base_url = ROOT.to_string();
        config.timeouts = TimeoutConfig::simulated();
        config.cart.plan = plan.clone();

        let quantities = block_on(async {
            let mut s = session();
            cart_accumulation(&mut s, &config).await.unwrap();
            PRODUCTS.map(|p| s.driver_mut().cart_quantity(p))
        });
        for (product, quantity) in PRODUCTS.iter().zip(quantities) {
            let expected: u32 = steps
                .iter()
                .filter(|(i, _)| PRODUCTS[*i] == *product)
                .map(|(_, n)| n)
                .sum();
            prop_assert_eq!(quantity, expected);
        }
        prop_assert_eq!(
            plan.expected_items().unwrap().iter().map(|i| i.quantity).sum::<u32>(),
            steps.iter().map(|(_, n)| n).sum::<u32>()
        );
    }
}
