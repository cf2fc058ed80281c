//! A smooth, minimalistic to-do list.
//!
//! [`store::TaskStore`] owns an ordered list of [`model::Task`]s and mirrors
//! it, as one JSON array, to a key of a [`storage::Slots`] backend after every
//! change. [`view::select`] filters the list for display, and
//! [`interface`] turns the store's [`store::Event`]s into terminal output.

pub mod cli;
pub mod config;
pub mod interface;
pub mod model;
pub mod storage;
pub mod store;
pub mod view;
