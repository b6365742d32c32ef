//! Tracked-change text editing.
//!
//! [`document_model`] keeps text as characters tagged plain, added or
//! deleted, with a derived bracket overlay. [`controller`] turns editing
//! events into document operations and owns undo. [`view`] draws the result
//! in a terminal.

pub mod config;
pub mod controller;
pub mod document_model;
pub mod logging;
pub mod view;
