#![cfg_attr(not(test), forbid(unsafe_code))]

//! Wire models and configuration shared by the Console client, CLI and web front end.

pub mod config;
pub mod models;
