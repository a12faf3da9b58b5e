//! Children in Need (CIN) counts and rates per local authority, 2009–2019:
//! load, clean, reshape per region and summarise.

pub mod aggregate;
pub mod cli;
pub mod coerce;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod partition;
pub mod pipeline;
pub mod pivot;
pub mod reports;
pub mod reshape;
pub mod schema;
pub mod table;
pub mod types;
pub mod util;

pub use error::{PipelineError, Result};
