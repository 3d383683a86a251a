//! cardcat — card spreadsheets to a Cockatrice card database
//!
//! This crate reads custom card definitions from CSV exports or spreadsheet
//! ranges into typed [`Card`] records, and writes them out as a Cockatrice
//! (version 4) XML card database. Mana costs such as `3WUBRG` are parsed into
//! a structured [`Cost`] so the exporter can derive colors, converted mana
//! cost and the canonical cost string.
//!
//! Basic example (no-run):
//!
//! ```rust,no_run
//! use cardcat::{ExportOptions, all_cards, export_catalog};
//! use std::path::Path;
//!
//! let cards = all_cards()?;
//! let options = ExportOptions::new("SBA", "Sandbox Alpha", "2024-05-01");
//! export_catalog(Path::new("SBA.xml"), cards.values(), &options)?;
//! # Ok::<(), cardcat::CatalogError>(())
//! ```

pub mod config;
pub mod cost;
pub mod error;
pub mod export;
pub mod ingest;
pub mod model;
pub mod rarity;

pub use crate::config::*;
pub use crate::cost::{Color, Cost};
pub use crate::error::*;
pub use crate::export::{CardRecord, export_catalog, project_cards, table_row, write_catalog};
pub use crate::ingest::{
    CardMap, RangeSource, RowFormat, all_cards, parse_csv_dir, parse_csv_file, parse_csv_reader,
    parse_row, parse_sheet, parse_sheet_rows,
};
pub use crate::model::*;
pub use crate::rarity::*;
