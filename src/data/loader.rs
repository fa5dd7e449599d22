//! CSV Data Loader Module
//! Handles CSV file loading, column classification and the dataset overview.

use polars::prelude::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Value classification used by chart selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Numeric,
    Categorical,
    /// Neither numeric nor text (booleans, dates, ...).
    Other,
}

impl ValueKind {
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ValueKind::Numeric,
            DataType::String | DataType::Categorical(..) | DataType::Enum(..) => {
                ValueKind::Categorical
            }
            _ => ValueKind::Other,
        }
    }
}

/// A column name paired with its value kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ValueKind,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Shape, dtypes and null counts of the loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetOverview {
    pub row_count: usize,
    pub column_count: usize,
    /// (column, dtype label)
    pub dtypes: Vec<(String, String)>,
    /// (column, null count)
    pub null_counts: Vec<(String, usize)>,
}

/// Read a CSV file into a DataFrame.
pub fn read_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
    // Use lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(file_path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;
    Ok(df)
}

/// Column names and kinds in dataset order.
pub fn column_infos(df: &DataFrame) -> Vec<ColumnInfo> {
    df.get_columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name().to_string(), ValueKind::from_dtype(col.dtype())))
        .collect()
}

/// Compute shape, dtypes and per-column null counts.
pub fn overview(df: &DataFrame) -> DatasetOverview {
    let columns = df.get_columns();

    let null_counts: Vec<(String, usize)> = columns
        .par_iter()
        .map(|col| (col.name().to_string(), col.null_count()))
        .collect();

    let dtypes = columns
        .iter()
        .map(|col| (col.name().to_string(), col.dtype().to_string()))
        .collect();

    DatasetOverview {
        row_count: df.height(),
        column_count: df.width(),
        dtypes,
        null_counts,
    }
}

/// Holds the loaded dataset for the session.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let df = read_csv(file_path)?;
        self.set_dataframe(df, file_path.to_path_buf());
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get column names and kinds from the loaded DataFrame.
    pub fn get_columns(&self) -> Vec<ColumnInfo> {
        self.df.as_ref().map(column_infos).unwrap_or_default()
    }

    /// Look up a single column by name.
    pub fn get_column(&self, name: &str) -> Option<ColumnInfo> {
        self.get_columns().into_iter().find(|c| c.name == name)
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: PathBuf) {
        log::info!(
            "dataset {} ready: {} rows x {} columns",
            file_path.display(),
            df.height(),
            df.width()
        );
        self.df = Some(df);
        self.file_path = Some(file_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
PassengerId,Survived,Pclass,Name,Sex,Age,Fare,Embarked
1,0,3,\"Braund, Mr. Owen Harris\",male,22,7.25,S
2,1,1,\"Cumings, Mrs. John Bradley\",female,38,71.2833,C
3,1,3,\"Heikkinen, Miss. Laina\",female,,7.925,S
4,0,3,\"Allen, Mr. William Henry\",male,35,8.05,
";

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_classifies_columns() {
        let file = sample_file();
        let mut loader = DataLoader::new();
        loader.load_csv(file.path()).unwrap();

        assert_eq!(loader.get_row_count(), 4);
        assert_eq!(loader.get_file_path().unwrap(), file.path());

        let kinds: Vec<(String, ValueKind)> = loader
            .get_columns()
            .into_iter()
            .map(|c| (c.name, c.kind))
            .collect();
        assert_eq!(kinds[0], ("PassengerId".to_string(), ValueKind::Numeric));
        assert_eq!(kinds[3], ("Name".to_string(), ValueKind::Categorical));
        assert_eq!(kinds[4], ("Sex".to_string(), ValueKind::Categorical));
        assert_eq!(kinds[5], ("Age".to_string(), ValueKind::Numeric));
        assert_eq!(kinds[6], ("Fare".to_string(), ValueKind::Numeric));
    }

    #[test]
    fn overview_reports_shape_and_nulls() {
        let file = sample_file();
        let df = read_csv(file.path()).unwrap();
        let ov = overview(&df);

        assert_eq!(ov.row_count, 4);
        assert_eq!(ov.column_count, 8);
        assert_eq!(ov.dtypes.len(), 8);

        let nulls = |name: &str| {
            ov.null_counts
                .iter()
                .find(|(c, _)| c == name)
                .map(|(_, n)| *n)
                .unwrap()
        };
        assert_eq!(nulls("Age"), 1);
        assert_eq!(nulls("Embarked"), 1);
        assert_eq!(nulls("Sex"), 0);
    }

    #[test]
    fn boolean_columns_are_other() {
        assert_eq!(ValueKind::from_dtype(&DataType::Boolean), ValueKind::Other);
        assert_eq!(ValueKind::from_dtype(&DataType::Int64), ValueKind::Numeric);
        assert_eq!(ValueKind::from_dtype(&DataType::String), ValueKind::Categorical);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut loader = DataLoader::new();
        assert!(loader
            .load_csv(Path::new("/nonexistent/titanic.csv"))
            .is_err());
        assert!(loader.get_dataframe().is_none());
    }
}
