//! Client for the JARVIS machine-learning prediction backend.
//!
//! The crate is split into a pure view-model layer (`catalog`, `forms`,
//! `format`, `voice`, `face`, `app`) and two renderers over it: the
//! terminal CLI (`cli`) and the embedded browser dashboard (`web`). All
//! backend traffic goes through the [`api::Backend`] trait.

pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod face;
pub mod format;
pub mod forms;
pub mod logging;
pub mod media;
pub mod voice;
pub mod web;
