//! Chart Selector Module
//! Picks chart kinds for one or two columns from their value kinds.
//!
//! Univariate:
//! - the free-text name column always becomes a word cloud
//! - small-cardinality columns (survival, class, sex, port) become pie charts
//! - everything else becomes a histogram
//!
//! Bivariate, by `(kind(a), kind(b))`:
//! - numeric/numeric: scatter + line, x=a, y=b
//! - categorical/categorical: cross-tab heatmap
//! - categorical/numeric: box + bar, x=a, y=b
//! - numeric/categorical: box + bar, x=b, y=a
//! - anything else: not applicable

use crate::config::SelectorConfig;
use crate::data::{ColumnInfo, ValueKind};
use std::fmt;

/// Message shown when no chart fits a column pair.
pub const NOT_APPLICABLE_MESSAGE: &str =
    "Bivariate analysis is not possible for the selected columns.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    WordCloud,
    Pie,
    Histogram,
    Scatter,
    Line,
    Box,
    Bar,
    Heatmap,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::WordCloud => "Word cloud",
            ChartKind::Pie => "Pie chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::Scatter => "Scatter plot",
            ChartKind::Line => "Line plot",
            ChartKind::Box => "Box plot",
            ChartKind::Bar => "Bar plot",
            ChartKind::Heatmap => "Heatmap",
        };
        f.write_str(name)
    }
}

/// How raw column values are reduced before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Raw (x, y) pairs.
    None,
    /// Occurrences per distinct value.
    ValueCounts,
    /// Histogram bins over numeric values, counts for text.
    Bins,
    /// Quartiles of y per x category.
    Quartiles,
    /// Sum of y per x category.
    Sum,
    /// Co-occurrence counts of x and y.
    CrossTab,
    /// Word counts over concatenated text.
    WordFrequency,
}

/// A chart to draw: kind, axis columns and aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub x: String,
    pub y: Option<String>,
    pub aggregation: Aggregation,
    pub title: String,
}

impl ChartRequest {
    fn univariate(kind: ChartKind, column: &str, aggregation: Aggregation, title: String) -> Self {
        Self {
            kind,
            x: column.to_string(),
            y: None,
            aggregation,
            title,
        }
    }

    fn bivariate(kind: ChartKind, x: &str, y: &str, aggregation: Aggregation, title: String) -> Self {
        Self {
            kind,
            x: x.to_string(),
            y: Some(y.to_string()),
            aggregation,
            title,
        }
    }
}

/// Result of bivariate selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BivariateSelection {
    Charts(Vec<ChartRequest>),
    NotApplicable,
}

impl BivariateSelection {
    pub fn charts(&self) -> &[ChartRequest] {
        match self {
            BivariateSelection::Charts(charts) => charts,
            BivariateSelection::NotApplicable => &[],
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, BivariateSelection::Charts(_))
    }
}

/// Columns offered in the univariate picker, dataset order preserved.
pub fn univariate_candidates<'a>(
    columns: &'a [ColumnInfo],
    config: &SelectorConfig,
) -> Vec<&'a ColumnInfo> {
    columns
        .iter()
        .filter(|c| !config.is_excluded(&c.name))
        .collect()
}

/// Pick the chart for a single column.
pub fn select_univariate(column: &ColumnInfo, config: &SelectorConfig) -> ChartRequest {
    let name = column.name.as_str();

    if config.is_name_column(name) {
        ChartRequest::univariate(
            ChartKind::WordCloud,
            name,
            Aggregation::WordFrequency,
            format!("{name} Word Cloud"),
        )
    } else if config.is_pie_column(name) {
        ChartRequest::univariate(
            ChartKind::Pie,
            name,
            Aggregation::ValueCounts,
            format!("{name} Distribution"),
        )
    } else {
        ChartRequest::univariate(
            ChartKind::Histogram,
            name,
            Aggregation::Bins,
            format!("Histogram of {name}"),
        )
    }
}

/// Pick the charts for a column pair.
pub fn select_bivariate(a: &ColumnInfo, b: &ColumnInfo) -> BivariateSelection {
    match (a.kind, b.kind) {
        (ValueKind::Numeric, ValueKind::Numeric) => {
            BivariateSelection::Charts(relationship_charts(&a.name, &b.name))
        }
        (ValueKind::Categorical, ValueKind::Categorical) => {
            BivariateSelection::Charts(vec![ChartRequest::bivariate(
                ChartKind::Heatmap,
                &a.name,
                &b.name,
                Aggregation::CrossTab,
                format!("Heatmap between {} and {}", a.name, b.name),
            )])
        }
        (ValueKind::Categorical, ValueKind::Numeric) => {
            BivariateSelection::Charts(grouped_charts(&a.name, &b.name))
        }
        // Axes swap so the category stays on x.
        (ValueKind::Numeric, ValueKind::Categorical) => {
            BivariateSelection::Charts(grouped_charts(&b.name, &a.name))
        }
        _ => BivariateSelection::NotApplicable,
    }
}

fn relationship_charts(x: &str, y: &str) -> Vec<ChartRequest> {
    vec![
        ChartRequest::bivariate(
            ChartKind::Scatter,
            x,
            y,
            Aggregation::None,
            format!("Scatter plot between {x} and {y}"),
        ),
        ChartRequest::bivariate(
            ChartKind::Line,
            x,
            y,
            Aggregation::None,
            format!("Line plot between {x} and {y}"),
        ),
    ]
}

fn grouped_charts(category: &str, value: &str) -> Vec<ChartRequest> {
    vec![
        ChartRequest::bivariate(
            ChartKind::Box,
            category,
            value,
            Aggregation::Quartiles,
            format!("Box plot of {value} by {category}"),
        ),
        ChartRequest::bivariate(
            ChartKind::Bar,
            category,
            value,
            Aggregation::Sum,
            format!("Bar plot of {value} by {category}"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(name: &str) -> ColumnInfo {
        ColumnInfo::new(name, ValueKind::Numeric)
    }

    fn categorical(name: &str) -> ColumnInfo {
        ColumnInfo::new(name, ValueKind::Categorical)
    }

    fn kinds(selection: &BivariateSelection) -> Vec<ChartKind> {
        selection.charts().iter().map(|c| c.kind).collect()
    }

    #[test]
    fn numeric_columns_get_histograms() {
        let config = SelectorConfig::default();
        for name in ["Age", "Fare", "SibSp", "Parch", "PassengerId"] {
            let request = select_univariate(&numeric(name), &config);
            assert_eq!(request.kind, ChartKind::Histogram, "{name}");
            assert_eq!(request.aggregation, Aggregation::Bins);
            assert_eq!(request.x, name);
            assert_eq!(request.y, None);
        }
    }

    #[test]
    fn small_cardinality_columns_get_pies() {
        let config = SelectorConfig::default();
        for col in [
            numeric("Survived"),
            numeric("Pclass"),
            categorical("Sex"),
            categorical("Embarked"),
        ] {
            let request = select_univariate(&col, &config);
            assert_eq!(request.kind, ChartKind::Pie, "{}", col.name);
            assert_eq!(request.aggregation, Aggregation::ValueCounts);
            assert_eq!(request.title, format!("{} Distribution", col.name));
        }
    }

    #[test]
    fn name_column_is_always_a_word_cloud() {
        let config = SelectorConfig::default();
        for kind in [ValueKind::Categorical, ValueKind::Numeric, ValueKind::Other] {
            let request = select_univariate(&ColumnInfo::new("Name", kind), &config);
            assert_eq!(request.kind, ChartKind::WordCloud);
            assert_eq!(request.aggregation, Aggregation::WordFrequency);
        }
    }

    #[test]
    fn categorical_column_outside_pie_set_gets_histogram() {
        let config = SelectorConfig::default();
        let request = select_univariate(&categorical("Ticket"), &config);
        assert_eq!(request.kind, ChartKind::Histogram);
    }

    #[test]
    fn numeric_pair_gets_scatter_and_line() {
        let selection = select_bivariate(&numeric("Age"), &numeric("Fare"));
        assert_eq!(kinds(&selection), vec![ChartKind::Scatter, ChartKind::Line]);
        for request in selection.charts() {
            assert_eq!(request.x, "Age");
            assert_eq!(request.y.as_deref(), Some("Fare"));
        }
        assert_eq!(
            selection.charts()[0].title,
            "Scatter plot between Age and Fare"
        );
    }

    #[test]
    fn categorical_pair_gets_heatmap() {
        let selection = select_bivariate(&categorical("Sex"), &categorical("Embarked"));
        assert_eq!(kinds(&selection), vec![ChartKind::Heatmap]);
        let request = &selection.charts()[0];
        assert_eq!(request.aggregation, Aggregation::CrossTab);
        assert_eq!(request.x, "Sex");
        assert_eq!(request.y.as_deref(), Some("Embarked"));
    }

    #[test]
    fn mixed_pair_keeps_category_on_x() {
        let forward = select_bivariate(&categorical("Sex"), &numeric("Age"));
        assert_eq!(kinds(&forward), vec![ChartKind::Box, ChartKind::Bar]);
        for request in forward.charts() {
            assert_eq!(request.x, "Sex");
            assert_eq!(request.y.as_deref(), Some("Age"));
        }
        assert_eq!(forward.charts()[0].title, "Box plot of Age by Sex");

        let swapped = select_bivariate(&numeric("Age"), &categorical("Sex"));
        assert_eq!(kinds(&swapped), vec![ChartKind::Box, ChartKind::Bar]);
        for request in swapped.charts() {
            assert_eq!(request.x, "Sex");
            assert_eq!(request.y.as_deref(), Some("Age"));
        }
        assert_eq!(swapped.charts()[1].aggregation, Aggregation::Sum);
    }

    #[test]
    fn unsupported_kinds_are_not_applicable() {
        let flag = ColumnInfo::new("IsAdult", ValueKind::Other);
        for other in [numeric("Age"), categorical("Sex"), flag.clone()] {
            let selection = select_bivariate(&flag, &other);
            assert_eq!(selection, BivariateSelection::NotApplicable);
            assert!(!selection.is_applicable());
            assert!(selection.charts().is_empty());
            assert_eq!(select_bivariate(&other, &flag), BivariateSelection::NotApplicable);
        }
    }

    #[test]
    fn supported_kind_pairs_are_total() {
        let cols = [numeric("Age"), categorical("Sex")];
        for a in &cols {
            for b in &cols {
                assert!(select_bivariate(a, b).is_applicable());
            }
        }
    }

    #[test]
    fn excluded_columns_are_not_candidates() {
        let config = SelectorConfig::default();
        let columns = vec![
            numeric("PassengerId"),
            numeric("Survived"),
            categorical("Name"),
            numeric("Parch"),
            categorical("Ticket"),
            numeric("Fare"),
            categorical("Cabin"),
        ];
        let names: Vec<&str> = univariate_candidates(&columns, &config)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Survived", "Name", "Fare"]);
    }
}
