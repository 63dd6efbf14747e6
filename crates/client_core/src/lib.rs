//! Client-side data fetching and view state for the fleet dashboard.

pub mod api;
pub mod controller;
pub mod error;
pub mod view;

pub use api::{ApiClient, EntityApi, DEFAULT_API_BASE_URL};
pub use controller::{DispatchOutcome, ListController, Operation, ViewEvent};
pub use error::FetchError;
pub use view::{ListView, ViewState};
