//! Module for client-side services built on top of the API client.
//!
//! This module holds the logic screens apply to what the API returns:
//! ordering and trimming report and alert feeds, classifying severities, and
//! polling the alert feed in the background.

pub mod alert_poller;
pub mod data_aggregator;

pub use alert_poller::{AlertPoller, AlertSource, SessionAlertSource};
pub use data_aggregator::*;
