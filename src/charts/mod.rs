//! Charts module - chart selection, data building and rendering

mod builder;
mod plotter;
mod renderer;
mod selector;

pub use builder::{ChartBuilder, ChartData, ChartPayload, PieSlice};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use selector::{
    select_bivariate, select_univariate, univariate_candidates, BivariateSelection, ChartKind,
    NOT_APPLICABLE_MESSAGE,
};
