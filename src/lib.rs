//! Machine inventory API built around the [`maybe::Maybe`] optional-value toolkit

pub mod cli;
pub mod config;
pub mod contracts;
pub mod domain;
pub mod db;
pub mod gate;
pub mod maybe;
pub mod provider;
pub mod tech;

pub use maybe::{Maybe, absent, lift, when, when_with};
