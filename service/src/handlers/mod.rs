//! API handlers.

pub mod accounts;
pub mod health;
pub mod ledger;
pub mod mailbox;
pub mod purchases;
pub mod webhooks;
