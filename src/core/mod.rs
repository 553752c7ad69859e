pub mod etl;
pub mod export;
pub mod flatten;
pub mod pipeline;
pub mod resolve;

pub use crate::domain::model::{SeriesEntry, Table, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
