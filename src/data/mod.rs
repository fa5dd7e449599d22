//! Data module - CSV loading and column extraction

mod loader;
mod processor;

pub use loader::{overview, ColumnInfo, DataLoader, DatasetOverview, ValueKind};
pub use processor::{CrossTab, DataProcessor, ProcessorError};
