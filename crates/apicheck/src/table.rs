//! Step data tables as handed over by a Gherkin runner.

use thiserror::Error;

/// Errors raised when a data table does not have the shape a step needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TableError {
    /// Raised when a step reads the header row of an empty table.
    #[error("data table requires a header row")]
    MissingHeader,
    /// Raised when a row contains more or fewer cells than expected.
    #[error("data table row {row_number} has {actual} cells but expected {expected}")]
    UnevenRow {
        /// 1-based index of the row that failed.
        row_number: usize,
        /// Number of cells required for each row.
        expected: usize,
        /// Number of cells present in the offending row.
        actual: usize,
    },
}

/// A data table attached to a step.
///
/// # Examples
/// ```
/// use apicheck::StepTable;
///
/// let table = StepTable::from_rows([["id", "7"], ["name", "lamp"]]);
/// let pairs = table.rows_hash().unwrap();
/// assert_eq!(pairs, [("id", "7"), ("name", "lamp")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTable {
    rows: Vec<Vec<String>>,
}

impl StepTable {
    /// Wrap the raw rows of a data table.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a table from any nested collection of cell texts.
    #[must_use]
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// All rows, including any header.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Read a two-column table as ordered `(key, value)` pairs.
    ///
    /// # Errors
    /// Returns [`TableError::UnevenRow`] when a row does not hold exactly two
    /// cells.
    pub fn rows_hash(&self) -> Result<Vec<(&str, &str)>, TableError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| match row.as_slice() {
                [key, value] => Ok((key.as_str(), value.as_str())),
                other => Err(TableError::UnevenRow {
                    row_number: index + 1,
                    expected: 2,
                    actual: other.len(),
                }),
            })
            .collect()
    }

    /// The first row, typically a list of column names.
    ///
    /// # Errors
    /// Returns [`TableError::MissingHeader`] when the table is empty.
    pub fn first_row(&self) -> Result<&[String], TableError> {
        self.rows
            .first()
            .map(Vec::as_slice)
            .ok_or(TableError::MissingHeader)
    }
}

impl From<Vec<Vec<String>>> for StepTable {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn rows_hash_keeps_row_order() {
        let table = StepTable::from_rows([["b", "2"], ["a", "1"]]);
        assert_eq!(table.rows_hash(), Ok(vec![("b", "2"), ("a", "1")]));
    }

    #[rstest]
    #[case(vec![vec!["k"]], 1, 1)]
    #[case(vec![vec!["k", "v"], vec!["a", "b", "c"]], 2, 3)]
    fn rows_hash_rejects_uneven_rows(
        #[case] rows: Vec<Vec<&str>>,
        #[case] row_number: usize,
        #[case] actual: usize,
    ) {
        let table = StepTable::from_rows(rows);
        assert_eq!(
            table.rows_hash(),
            Err(TableError::UnevenRow {
                row_number,
                expected: 2,
                actual,
            })
        );
    }

    #[test]
    fn first_row_requires_a_row() {
        assert_eq!(StepTable::default().first_row(), Err(TableError::MissingHeader));
        let table = StepTable::from(vec![vec!["id".to_owned(), "name".to_owned()]]);
        assert_eq!(table.first_row().map(<[String]>::len), Ok(2));
    }

    #[test]
    fn uneven_row_message_names_row_and_counts() {
        let err = TableError::UnevenRow {
            row_number: 3,
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "data table row 3 has 1 cells but expected 2");
    }
}
