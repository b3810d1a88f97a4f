//! Data models for PG Tracker

mod activity;
mod guest;
mod payment;
mod principal;
mod room;

pub use activity::*;
pub use guest::*;
pub use payment::*;
pub use principal::*;
pub use room::*;
