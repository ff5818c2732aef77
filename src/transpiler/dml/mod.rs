//! DML (Data Manipulation Language) SQL generation.
//!
//! This module contains functions for generating SELECT, INSERT, UPDATE and
//! DELETE statements.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;
