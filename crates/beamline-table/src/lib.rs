//! Tabulated material data for Beamline components.
//!
//! A table is a text file whose leading `#` lines form a free-text header
//! (possibly embedding `name: value` metadata), followed by rows of
//! numbers whose first column is strictly increasing. Components load
//! tables once at initialization and look values up per event through
//! [`Table::value_at`] and [`Table::value_at_column`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
mod header;
pub mod table;

pub use error::TableError;
pub use table::Table;
