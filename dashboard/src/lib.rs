//! Headless CRM dashboard
//!
//! One view-model per screen (leads, demo requests, callbacks, consultations,
//! email, WhatsApp) over mock data sources, plus the table and form contracts
//! a front end renders from.

pub mod assistant;
pub mod config;
pub mod context;
pub mod error;
pub mod form;
pub mod pagination;
pub mod query;
pub mod retry;
pub mod screens;
pub mod seed;
pub mod source;
pub mod store;
pub mod table;
pub mod validation;
pub mod view_model;

pub use config::DashboardConfig;
pub use context::AppContext;
pub use error::{DashboardError, DashboardResult, ErrorNotice, FieldErrors};
pub use form::{EntityForm, FormOverlay};
pub use query::{SortDirection, StatusTab};
pub use screens::{Dashboard, Screen, ScreenKind, Sources};
pub use table::{TableIntent, TableView};
pub use view_model::{ViewModel, ViewSettings};

#[cfg(test)]
mod tests;
