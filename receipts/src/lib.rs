//! # Receipts
//!
//! A receipt list backed by a remote HTTP service, driven by a small set of
//! user actions.
//!
//! The [`ReceiptViewModel`] owns the feature state (receipt list, last error,
//! alert visibility). Every dispatched [`ReceiptAction`] is observed twice:
//!
//! - the [`AnalyticsReducer`](reducer::AnalyticsReducer) forwards the action's
//!   description to the [`AnalyticsClient`] port
//! - the [`ReceiptReducer`](reducer::ReceiptReducer) calls the [`ReceiptClient`]
//!   port and folds the result back into state
//!
//! Both ports come in `live`, `mock` and `failing` flavours, selected when the
//! [`ReceiptEnvironment`] is built.
//!
//! ## Example
//!
//! ```no_run
//! use receipts::{ReceiptAction, ReceiptRequest, ReceiptViewModel};
//!
//! # async fn example() -> Result<(), receipts_runtime::StoreError> {
//! let view_model = ReceiptViewModel::preview();
//!
//! view_model.dispatch(ReceiptAction::FetchReceipts).await.wait().await?;
//! view_model
//!     .dispatch(ReceiptAction::CreateReceipt(ReceiptRequest::new("Lunch")))
//!     .await
//!     .wait()
//!     .await?;
//!
//! for receipt in view_model.receipts().await {
//!     println!("{}: {}", receipt.id, receipt.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod analytics;
pub mod client;
pub mod config;
pub mod environment;
pub mod error;
pub mod models;
pub mod reducer;
pub mod state;
pub mod view_model;

pub use action::{ReceiptAction, ReceiptEvent};
pub use analytics::{AnalyticsClient, FailingAnalyticsClient, LiveAnalyticsClient, MockAnalyticsClient};
pub use client::{FailingReceiptClient, LiveReceiptClient, MockReceiptClient, ReceiptClient};
pub use config::{ClientConfig, StaleFetchPolicy, ViewModelConfig};
pub use environment::ReceiptEnvironment;
pub use error::{ConfigError, ReceiptError};
pub use models::{Receipt, ReceiptRequest};
pub use state::ReceiptState;
pub use view_model::ReceiptViewModel;
