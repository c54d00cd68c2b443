//! # Receipts Testing
//!
//! Testing utilities shared by the workspace crates:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`assertions`]: effect checks for scenarios or hand-driven reducers
//! - [`init_test_tracing`]: log capture for tests
//!
//! ## Example
//!
//! ```ignore
//! use receipts_testing::ReducerTest;
//!
//! ReducerTest::new(ReceiptReducer::default())
//!     .with_env(ReceiptEnvironment::failing())
//!     .given_state(ReceiptState::default())
//!     .when_action(ReceiptAction::DismissErrorAlert.into())
//!     .then_state(|state| assert!(!state.is_error_presented()))
//!     .then_no_effects()
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Install a `tracing` subscriber that writes through the test harness.
///
/// The filter comes from `RUST_LOG` and defaults to `debug` for the workspace
/// crates. Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "receipts=debug,receipts_runtime=debug,receipts_core=debug".into()
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
