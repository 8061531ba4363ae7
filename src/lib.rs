//! Parse election poll CSV files and summarise them.
//!
//! ```no_run
//! use poll_reader::{config::Settings, table::PollTable};
//!
//! let table = PollTable::from_file(&Settings::from_env(), "polling_data.csv")?;
//! println!("{}", table.highest_polling_candidate()?);
//! # Ok::<(), poll_reader::error::PollError>(())
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod parser;
pub mod stats;
pub mod table;

pub use error::PollError;
pub use table::PollTable;
