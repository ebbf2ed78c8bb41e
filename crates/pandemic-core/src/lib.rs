//! Country and daily-record types shared by the API, the loader and the
//! dashboard, plus the [`store::PandemicStore`] trait they talk through.
//!
//! No HTTP or database code lives here.

pub mod country;
pub mod error;
pub mod patch;
pub mod record;
pub mod store;

pub use error::{Error, Result};
