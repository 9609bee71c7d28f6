//! Run a single command inside a Python virtualenv.
//!
//! vex finds a virtualenv by name (or takes one by path), builds the
//! environment its `activate` script would have produced, and runs one
//! command in it. Nothing in the calling shell changes.
//!
//! The public API is organised into a few layers:
//!
//! - **[`config`]**: parse `.vexrc` and find the virtualenvs directory
//! - **[`resolve`]** and **[`activate`]**: pick the virtualenv, command and
//!   child environment
//! - **[`exec`]**, **[`make`]** and **[`remove`]**: the side effects
//! - **[`commands`]**: top-level orchestration behind the command line
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod activate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod environ;
pub mod error;
pub mod exec;
pub mod logging;
pub mod make;
pub mod platform;
pub mod remove;
pub mod resolve;
pub mod shell_config;
