use crate::{error::Result, Real};
use getset::CopyGetters;
use ndarray::{Array1, Array2};
use std::{fmt::Write as _, iter, path::Path};

/// The results table stores the population vector row by row, one row per
/// recorded time step. Columns follow the state schema order.
///
/// The table can also grow column-wise. Missing values of a new column are
/// either zeros or a copy of the last value.
#[derive(Clone, Debug, Default, PartialEq, CopyGetters)]
pub struct ResultsTable {
    #[getset(get_copy = "pub")]
    nrows: usize,
    #[getset(get_copy = "pub")]
    ncols: usize,
    buffer: Vec<Real>,
}

impl ResultsTable {
    pub fn new(ncols: usize) -> Self {
        ResultsTable {
            ncols,
            nrows: 0,
            buffer: vec![],
        }
    }

    /// Empty table with room for `nrows` rows.
    pub fn with_capacity(ncols: usize, nrows: usize) -> Self {
        ResultsTable {
            ncols,
            nrows: 0,
            buffer: Vec::with_capacity(ncols * nrows),
        }
    }

    #[inline(always)]
    fn _idx(&self, i: usize, j: usize) -> usize {
        i * self.ncols + j
    }

    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    /// Get the j-th component at the i-th row.
    pub fn get(&self, i: usize, j: usize) -> Option<Real> {
        if i >= self.nrows || j >= self.ncols {
            return None;
        }
        self.buffer.get(self._idx(i, j)).copied()
    }

    /// Append a row. Panics if the row length does not match the number of
    /// columns.
    pub fn push_row(&mut self, row: &[Real]) {
        assert_eq!(row.len(), self.ncols, "row length must match the table");
        self.buffer.extend_from_slice(row);
        self.nrows += 1;
    }

    /// Return the i-th row.
    pub fn row(&self, i: usize) -> Option<&[Real]> {
        if i >= self.nrows {
            return None;
        }
        let k = self._idx(i, 0);
        Some(&self.buffer[k..k + self.ncols])
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Real]> {
        // chunks() panics on zero-sized chunks
        self.buffer.chunks(self.ncols.max(1)).take(self.nrows)
    }

    /// Return the j-th column.
    pub fn col(&self, j: usize) -> Option<Vec<Real>> {
        if j >= self.ncols {
            return None;
        }
        Some((0..self.nrows).map(|i| self.buffer[self._idx(i, j)]).collect())
    }

    /// Return the last row or a vector of zeros.
    pub fn tip(&self) -> Vec<Real> {
        match self.nrows.checked_sub(1).and_then(|i| self.row(i)) {
            Some(row) => row.to_vec(),
            None => vec![0.0; self.ncols],
        }
    }

    /// Dot product of each row with the given indicator (or weight) vector.
    pub fn aggregate(&self, indicator: &Array1<Real>) -> Vec<Real> {
        assert_eq!(indicator.len(), self.ncols, "indicator length must match the table");
        self.rows()
            .map(|row| row.iter().zip(indicator).map(|(x, w)| x * w).sum::<Real>())
            .collect()
    }

    /// Copy the table into a (nrows, ncols) matrix.
    pub fn to_array(&self) -> Array2<Real> {
        Array2::from_shape_vec((self.nrows, self.ncols), self.buffer.clone())
            .unwrap_or_else(|_| Array2::zeros((self.nrows, self.ncols)))
    }

    /// Build a table from columns of equal length. Shorter columns are padded
    /// with zeros.
    pub fn from_columns(columns: &[Vec<Real>]) -> Self {
        let nrows = columns.iter().map(|c| c.len()).max().unwrap_or(0);
        let mut table = ResultsTable::new(0);
        table.nrows = nrows;
        for col in columns {
            table.add_column(col.iter().copied(), false);
        }
        table
    }

    /// Add new column to the table from iterator.
    ///
    /// Column can be larger or smaller than the number of rows. In the latter
    /// case, fill with the last value if bfill=true or with zeros otherwise.
    pub fn add_column(&mut self, data: impl Iterator<Item = Real>, bfill: bool) -> &mut Self {
        let col = {
            let mut buf: Vec<Real> = data.take(self.nrows).collect();
            let elem = if bfill {
                buf.last().copied().unwrap_or(0.0)
            } else {
                0.0
            };
            let n = self.nrows - buf.len();
            buf.extend(iter::repeat(elem).take(n));
            buf
        };

        let mut buffer = Vec::with_capacity(self.nrows * (self.ncols + 1));
        for (i, x) in col.into_iter().enumerate() {
            let k = self._idx(i, 0);
            buffer.extend_from_slice(&self.buffer[k..k + self.ncols]);
            buffer.push(x);
        }
        self.ncols += 1;
        self.buffer = buffer;
        self
    }

    /// Add a new column to a copy of the table.
    ///
    /// `bfill` has the same meaning as in add_column().
    pub fn with_column(&self, data: impl Iterator<Item = Real>, bfill: bool) -> Self {
        let mut new = self.clone();
        new.add_column(data, bfill);
        new
    }

    /// Render the table as CSV data with the given header line.
    pub fn render_csv(&self, head: &str, sep: char) -> String {
        let mut data = head.to_string();
        for row in self.rows() {
            data.push('\n');
            for (j, x) in row.iter().enumerate() {
                if j != 0 {
                    data.push(sep);
                }
                let _ = write!(data, "{}", x);
            }
        }
        data
    }

    /// Write the table to a CSV file.
    pub fn write_csv<S: AsRef<str>>(&self, path: impl AsRef<Path>, header: &[S]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(header.iter().map(|h| h.as_ref()))?;
        for row in self.rows() {
            wtr.write_record(row.iter().map(|x| x.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl From<Vec<Real>> for ResultsTable {
    fn from(data: Vec<Real>) -> Self {
        ResultsTable {
            ncols: 1,
            nrows: data.len(),
            buffer: data,
        }
    }
}
