#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod activity;
mod body_metric;
mod composition;
mod error;
mod estimation;
mod exercise;
mod goal;
mod metabolism;
mod preferences;
mod records;
mod service;
mod summary;
mod training_load;

pub use activity::*;
pub use body_metric::*;
pub use composition::*;
pub use error::*;
pub use estimation::*;
pub use exercise::*;
pub use goal::*;
pub use metabolism::*;
pub use preferences::*;
pub use records::*;
pub use service::*;
pub use summary::*;
pub use training_load::*;
