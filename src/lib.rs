//! Reads the header and schema page of a SQLite database file.

pub mod db;
