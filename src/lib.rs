#![allow(clippy::too_many_arguments, clippy::type_complexity)]

pub mod error;
pub mod validation;
pub mod model;
pub mod db;
pub mod engine;
pub mod ops;
pub mod queries;
pub mod notify;
pub mod migrate;
pub mod cli;
