//! Build-frontend support for legacy `setup.py` distributions.
//!
//! This crate only synthesizes argument vectors; spawning the interpreter,
//! capturing its output, and interpreting exit codes belong to the caller.

pub use crate::setup_py::{develop_args, egg_info_args, install_args, shim_args};

mod setup_py;
