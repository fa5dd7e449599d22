//! Stats module - box-plot summaries, binning and word counts

mod calculator;
mod words;

pub use calculator::{BoxStats, HistogramBin, StatsCalculator};
pub use words::{word_frequencies, WordCount};
