//! Data Processor Module
//! Extracts the raw series each chart needs: counts, pairs, groups, cross-tabs.

use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

/// Co-occurrence counts between two categorical columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// counts[row][col]
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn dimensions(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    pub fn max_count(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Stateless helpers over a loaded DataFrame.
pub struct DataProcessor;

impl DataProcessor {
    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::ColumnNotFound(name.to_string()))
    }

    /// Cell values rendered as labels, `None` for nulls.
    pub fn cell_labels(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ProcessorError> {
        let column = Self::column(df, name)?;
        let mut labels = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let val = column.get(i)?;
            if val.is_null() {
                labels.push(None);
            } else {
                let label = match val.get_str() {
                    Some(text) => text.to_string(),
                    None => val.to_string(),
                };
                labels.push(Some(label));
            }
        }
        Ok(labels)
    }

    /// Cell values cast to f64, `None` for nulls, NaN and non-castable cells.
    pub fn cell_numbers(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let column = Self::column(df, name)?;
        let value_f64 = column.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;
        Ok(value_ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Value counts sorted by count descending, then label. Nulls are dropped.
    pub fn value_counts(df: &DataFrame, name: &str) -> Result<Vec<(String, usize)>, ProcessorError> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for label in Self::cell_labels(df, name)?.into_iter().flatten() {
            *counts.entry(label).or_default() += 1;
        }

        let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }

    /// Non-null numeric values of one column.
    pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, ProcessorError> {
        Ok(Self::cell_numbers(df, name)?.into_iter().flatten().collect())
    }

    /// Non-null text values of one column.
    pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<String>, ProcessorError> {
        Ok(Self::cell_labels(df, name)?.into_iter().flatten().collect())
    }

    /// Rows where both columns hold a number, in row order.
    pub fn numeric_pairs(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
    ) -> Result<Vec<(f64, f64)>, ProcessorError> {
        let xs = Self::cell_numbers(df, x_col)?;
        let ys = Self::cell_numbers(df, y_col)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| Some((x?, y?)))
            .collect())
    }

    /// Numeric values grouped by category label, groups in first-appearance order.
    pub fn grouped_values(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> Result<Vec<(String, Vec<f64>)>, ProcessorError> {
        let groups = Self::cell_labels(df, group_col)?;
        let values = Self::cell_numbers(df, value_col)?;

        let mut order: Vec<String> = Vec::new();
        let mut by_group: HashMap<String, Vec<f64>> = HashMap::new();

        for (g, v) in groups.into_iter().zip(values) {
            if let (Some(g), Some(v)) = (g, v) {
                if !by_group.contains_key(&g) {
                    order.push(g.clone());
                }
                by_group.entry(g).or_default().push(v);
            }
        }

        Ok(order
            .into_iter()
            .map(|g| {
                let values = by_group.remove(&g).unwrap_or_default();
                (g, values)
            })
            .collect())
    }

    /// Cross-tabulate two columns over rows where both are non-null.
    pub fn crosstab(df: &DataFrame, row_col: &str, col_col: &str) -> Result<CrossTab, ProcessorError> {
        let pairs: Vec<(String, String)> = Self::cell_labels(df, row_col)?
            .into_iter()
            .zip(Self::cell_labels(df, col_col)?)
            .filter_map(|(a, b)| Some((a?, b?)))
            .collect();

        let row_labels: Vec<String> = pairs
            .iter()
            .map(|(a, _)| a.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let col_labels: Vec<String> = pairs
            .iter()
            .map(|(_, b)| b.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts = vec![vec![0usize; col_labels.len()]; row_labels.len()];
        {
            let row_index: HashMap<&str, usize> = row_labels
                .iter()
                .enumerate()
                .map(|(i, l)| (l.as_str(), i))
                .collect();
            let col_index: HashMap<&str, usize> = col_labels
                .iter()
                .enumerate()
                .map(|(i, l)| (l.as_str(), i))
                .collect();

            for (a, b) in &pairs {
                counts[row_index[a.as_str()]][col_index[b.as_str()]] += 1;
            }
        }

        Ok(CrossTab {
            row_labels,
            col_labels,
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passengers() -> DataFrame {
        df!(
            "Sex" => ["male", "female", "female", "male", "male"],
            "Embarked" => [Some("S"), Some("C"), Some("S"), None, Some("Q")],
            "Survived" => [0i64, 1, 1, 0, 0],
            "Age" => [Some(22.0), Some(38.0), None, Some(35.0), Some(54.0)],
            "Fare" => [7.25, 71.28, 7.92, 8.05, 51.86]
        )
        .unwrap()
    }

    #[test]
    fn value_counts_sorted_and_null_free() {
        let df = passengers();
        assert_eq!(
            DataProcessor::value_counts(&df, "Sex").unwrap(),
            vec![("male".to_string(), 3), ("female".to_string(), 2)]
        );

        let embarked = DataProcessor::value_counts(&df, "Embarked").unwrap();
        assert_eq!(embarked[0], ("S".to_string(), 2));
        assert_eq!(embarked.iter().map(|(_, n)| n).sum::<usize>(), 4);

        let survived = DataProcessor::value_counts(&df, "Survived").unwrap();
        assert_eq!(survived, vec![("0".to_string(), 3), ("1".to_string(), 2)]);
    }

    #[test]
    fn text_keeps_embedded_quotes() {
        let df = df!(
            "Name" => [
                "Johnston, Miss. Catherine Helen \"Carrie\"",
                "\"Plain\" start",
            ],
            "Pclass" => [3i64, 1]
        )
        .unwrap();

        assert_eq!(
            DataProcessor::text_values(&df, "Name").unwrap(),
            vec![
                "Johnston, Miss. Catherine Helen \"Carrie\"".to_string(),
                "\"Plain\" start".to_string(),
            ]
        );
        assert_eq!(
            DataProcessor::cell_labels(&df, "Pclass").unwrap(),
            vec![Some("3".to_string()), Some("1".to_string())]
        );
    }

    #[test]
    fn numeric_pairs_skip_nulls_and_keep_order() {
        let df = passengers();
        let pairs = DataProcessor::numeric_pairs(&df, "Age", "Fare").unwrap();
        assert_eq!(
            pairs,
            vec![(22.0, 7.25), (38.0, 71.28), (35.0, 8.05), (54.0, 51.86)]
        );
    }

    #[test]
    fn grouped_values_follow_first_appearance() {
        let df = passengers();
        let groups = DataProcessor::grouped_values(&df, "Sex", "Age").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "male");
        assert_eq!(groups[0].1, vec![22.0, 35.0, 54.0]);
        assert_eq!(groups[1].0, "female");
        assert_eq!(groups[1].1, vec![38.0]);
    }

    #[test]
    fn crosstab_counts_pairs() {
        let df = passengers();
        let tab = DataProcessor::crosstab(&df, "Sex", "Embarked").unwrap();
        assert_eq!(tab.row_labels, vec!["female", "male"]);
        assert_eq!(tab.col_labels, vec!["C", "Q", "S"]);
        assert_eq!(tab.counts, vec![vec![1, 0, 1], vec![0, 1, 1]]);
        assert_eq!(tab.dimensions(), (2, 3));
        assert_eq!(tab.max_count(), 1);
    }

    #[test]
    fn unknown_column_is_reported() {
        let df = passengers();
        match DataProcessor::value_counts(&df, "Cabin") {
            Err(ProcessorError::ColumnNotFound(name)) => assert_eq!(name, "Cabin"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
