//! Empties every configured account into one partner account and confirms the
//! resulting offers, then accepts gifts sent to the monitoring account.
pub mod config;
mod confirmer;
mod error;
mod liquidator;
pub mod pacing;
mod registry;
mod service;
mod session;
#[cfg(test)]
mod testing;
mod triage;

pub use config::Config;
pub use confirmer::{ApprovalReport, Approver};
pub use error::Error;
pub use liquidator::{Liquidation, Liquidator};
pub use pacing::{IntervalPacer, Pace, Pacer};
pub use registry::SessionRegistry;
pub use service::{RunReport, Workflow};
pub use session::{login, Session, SessionManager};
pub use triage::{classify, Triage, TriageReport, Verdict};

pub type Result<T> = std::result::Result<T, Error>;
