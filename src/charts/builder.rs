//! Chart Builder Module
//! Materializes chart requests against the loaded DataFrame.

use crate::charts::selector::{ChartKind, ChartRequest};
use crate::data::{CrossTab, DataProcessor, ProcessorError, ValueKind};
use crate::stats::{word_frequencies, BoxStats, HistogramBin, StatsCalculator, WordCount};
use polars::prelude::*;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("{0} needs a y column")]
    MissingYColumn(ChartKind),
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

/// Histogram contents: numeric bins or text value counts.
#[derive(Debug, Clone, PartialEq)]
pub enum HistogramData {
    Bins(Vec<HistogramBin>),
    Counts(Vec<(String, usize)>),
}

/// Box summary for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBox {
    pub group: String,
    pub stats: BoxStats,
}

/// Drawable payload of a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPayload {
    WordCloud(Vec<WordCount>),
    Pie(Vec<PieSlice>),
    Histogram(HistogramData),
    /// Scatter and line share the same (x, y) pairs.
    Points(Vec<(f64, f64)>),
    Box(Vec<GroupBox>),
    Bar(Vec<(String, f64)>),
    Heatmap(CrossTab),
}

/// A chart request together with its data.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub request: ChartRequest,
    pub payload: ChartPayload,
}

impl ChartData {
    pub fn title(&self) -> &str {
        &self.request.title
    }
}

/// Builds chart data from requests.
pub struct ChartBuilder;

impl ChartBuilder {
    pub fn build(
        df: &DataFrame,
        request: &ChartRequest,
        max_cloud_words: usize,
    ) -> Result<ChartData, BuildError> {
        log::debug!("building {} for {:?}", request.kind, request.title);
        let x = request.x.as_str();

        let payload = match request.kind {
            ChartKind::WordCloud => {
                let texts = DataProcessor::text_values(df, x)?;
                ChartPayload::WordCloud(word_frequencies(&texts, max_cloud_words))
            }
            ChartKind::Pie => ChartPayload::Pie(
                DataProcessor::value_counts(df, x)?
                    .into_iter()
                    .map(|(label, count)| PieSlice { label, count })
                    .collect(),
            ),
            ChartKind::Histogram => ChartPayload::Histogram(Self::histogram(df, x)?),
            ChartKind::Scatter | ChartKind::Line => {
                let y = Self::y_column(request)?;
                ChartPayload::Points(DataProcessor::numeric_pairs(df, x, y)?)
            }
            ChartKind::Box => {
                let y = Self::y_column(request)?;
                let groups = DataProcessor::grouped_values(df, x, y)?;
                ChartPayload::Box(
                    groups
                        .par_iter()
                        .map(|(group, values)| GroupBox {
                            group: group.clone(),
                            stats: StatsCalculator::box_stats(values),
                        })
                        .collect(),
                )
            }
            ChartKind::Bar => {
                let y = Self::y_column(request)?;
                ChartPayload::Bar(
                    DataProcessor::grouped_values(df, x, y)?
                        .into_iter()
                        .map(|(group, values)| (group, values.iter().sum()))
                        .collect(),
                )
            }
            ChartKind::Heatmap => {
                let y = Self::y_column(request)?;
                ChartPayload::Heatmap(DataProcessor::crosstab(df, x, y)?)
            }
        };

        Ok(ChartData {
            request: request.clone(),
            payload,
        })
    }

    /// Build every request, stopping at the first failure.
    pub fn build_all(
        df: &DataFrame,
        requests: &[ChartRequest],
        max_cloud_words: usize,
    ) -> Result<Vec<ChartData>, BuildError> {
        requests
            .iter()
            .map(|request| Self::build(df, request, max_cloud_words))
            .collect()
    }

    fn y_column(request: &ChartRequest) -> Result<&str, BuildError> {
        request
            .y
            .as_deref()
            .ok_or(BuildError::MissingYColumn(request.kind))
    }

    fn histogram(df: &DataFrame, column: &str) -> Result<HistogramData, BuildError> {
        let kind = df
            .column(column)
            .map(|c| ValueKind::from_dtype(c.dtype()))
            .map_err(|_| ProcessorError::ColumnNotFound(column.to_string()))?;

        if kind == ValueKind::Numeric {
            let values = DataProcessor::numeric_values(df, column)?;
            Ok(HistogramData::Bins(StatsCalculator::histogram_bins(&values)))
        } else {
            Ok(HistogramData::Counts(DataProcessor::value_counts(df, column)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::selector::{select_bivariate, select_univariate};
    use crate::config::SelectorConfig;
    use crate::data::ColumnInfo;

    fn titanic() -> DataFrame {
        df!(
            "Survived" => [0i64, 1, 1, 1, 0, 0],
            "Pclass" => [3i64, 1, 3, 1, 3, 2],
            "Name" => [
                "Braund, Mr. Owen Harris",
                "Cumings, Mrs. John Bradley",
                "Heikkinen, Miss. Laina",
                "Futrelle, Mrs. Jacques Heath",
                "Allen, Mr. William Henry",
                "Moran, Mr. James",
            ],
            "Sex" => ["male", "female", "female", "female", "male", "male"],
            "Age" => [Some(22.0), Some(38.0), Some(26.0), Some(35.0), Some(35.0), None],
            "Fare" => [7.25, 71.28, 7.92, 53.1, 8.05, 8.46],
            "Embarked" => ["S", "C", "S", "S", "S", "Q"]
        )
        .unwrap()
    }

    fn column(df: &DataFrame, name: &str) -> ColumnInfo {
        ColumnInfo::new(name, ValueKind::from_dtype(df.column(name).unwrap().dtype()))
    }

    fn univariate(df: &DataFrame, name: &str) -> ChartData {
        let request = select_univariate(&column(df, name), &SelectorConfig::default());
        ChartBuilder::build(df, &request, 200).unwrap()
    }

    #[test]
    fn pie_slices_match_distinct_values() {
        let df = titanic();
        for (name, distinct) in [("Survived", 2), ("Pclass", 3), ("Sex", 2), ("Embarked", 3)] {
            let data = univariate(&df, name);
            assert_eq!(data.request.kind, ChartKind::Pie);
            let ChartPayload::Pie(slices) = &data.payload else {
                panic!("{name} is not a pie");
            };
            assert_eq!(slices.len(), distinct, "{name}");
        }
    }

    #[test]
    fn sex_pie_has_two_slices() {
        let data = univariate(&titanic(), "Sex");
        assert_eq!(
            data.payload,
            ChartPayload::Pie(vec![
                PieSlice { label: "female".to_string(), count: 3 },
                PieSlice { label: "male".to_string(), count: 3 },
            ])
        );
    }

    #[test]
    fn numeric_histogram_counts_non_null_rows() {
        let data = univariate(&titanic(), "Age");
        match data.payload {
            ChartPayload::Histogram(HistogramData::Bins(bins)) => {
                assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
            }
            other => panic!("expected bins, got {other:?}"),
        }
    }

    #[test]
    fn categorical_histogram_counts_labels() {
        let df = titanic();
        let config = SelectorConfig {
            pie_columns: vec!["Sex".to_string()],
            ..SelectorConfig::default()
        };
        let request = select_univariate(&column(&df, "Embarked"), &config);
        assert_eq!(request.kind, ChartKind::Histogram);

        match ChartBuilder::build(&df, &request, 200).unwrap().payload {
            ChartPayload::Histogram(HistogramData::Counts(counts)) => assert_eq!(
                counts,
                vec![
                    ("S".to_string(), 4),
                    ("C".to_string(), 1),
                    ("Q".to_string(), 1),
                ]
            ),
            other => panic!("expected counts, got {other:?}"),
        }
    }

    #[test]
    fn name_column_builds_word_counts() {
        let data = univariate(&titanic(), "Name");
        match data.payload {
            ChartPayload::WordCloud(words) => {
                assert_eq!(words[0].word, "Mr");
                assert_eq!(words[0].count, 3);
            }
            other => panic!("expected word cloud, got {other:?}"),
        }
    }

    #[test]
    fn sex_by_age_builds_box_and_bar() {
        let df = titanic();
        let selection = select_bivariate(&column(&df, "Sex"), &column(&df, "Age"));
        let charts = ChartBuilder::build_all(&df, selection.charts(), 200).unwrap();
        assert_eq!(charts.len(), 2);

        match &charts[0].payload {
            ChartPayload::Box(groups) => {
                let names: Vec<&str> = groups.iter().map(|g| g.group.as_str()).collect();
                assert_eq!(names, vec!["male", "female"]);
                assert_eq!(groups[0].stats.count, 2);
                assert_eq!(groups[1].stats.median, 35.0);
            }
            other => panic!("expected box, got {other:?}"),
        }

        match &charts[1].payload {
            ChartPayload::Bar(sums) => {
                assert_eq!(sums[0], ("male".to_string(), 57.0));
                assert_eq!(sums[1], ("female".to_string(), 99.0));
            }
            other => panic!("expected bar, got {other:?}"),
        }
    }

    #[test]
    fn heatmap_dimensions_follow_distinct_values() {
        let df = titanic();
        let selection = select_bivariate(&column(&df, "Sex"), &column(&df, "Embarked"));
        let charts = ChartBuilder::build_all(&df, selection.charts(), 200).unwrap();
        match &charts[0].payload {
            ChartPayload::Heatmap(tab) => {
                assert_eq!(tab.dimensions(), (2, 3));
                let total: usize = tab.counts.iter().flatten().sum();
                assert_eq!(total, 6);
            }
            other => panic!("expected heatmap, got {other:?}"),
        }
    }

    #[test]
    fn scatter_and_line_share_points() {
        let df = titanic();
        let selection = select_bivariate(&column(&df, "Age"), &column(&df, "Fare"));
        let charts = ChartBuilder::build_all(&df, selection.charts(), 200).unwrap();
        assert_eq!(charts[0].payload, charts[1].payload);
        match &charts[0].payload {
            ChartPayload::Points(points) => {
                assert_eq!(points.len(), 5);
                assert_eq!(points[0], (22.0, 7.25));
            }
            other => panic!("expected points, got {other:?}"),
        }
    }

    #[test]
    fn unknown_column_fails() {
        let df = titanic();
        let request = select_univariate(
            &crate::data::ColumnInfo::new("Cabin", ValueKind::Categorical),
            &SelectorConfig::default(),
        );
        assert!(matches!(
            ChartBuilder::build(&df, &request, 200),
            Err(BuildError::Processor(ProcessorError::ColumnNotFound(_)))
        ));
    }
}
