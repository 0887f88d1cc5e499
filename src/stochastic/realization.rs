use std::fmt;

use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::Axis;
use prettytable::format;
use prettytable::Cell;
use prettytable::Row;
use prettytable::Table;

use crate::grid::RegularGrid;

/// One sample path: row `n` holds the value at `grid.value(n)`, one column
/// per component.
#[derive(Debug, Clone, PartialEq)]
pub struct Realization {
  grid: RegularGrid,
  values: Array2<f64>,
}

impl Realization {
  pub(crate) fn new(grid: RegularGrid, values: Array2<f64>) -> Self {
    debug_assert_eq!(values.nrows(), grid.count());
    Self { grid, values }
  }

  pub fn grid(&self) -> &RegularGrid {
    &self.grid
  }

  /// `count × dimension` values.
  pub fn values(&self) -> &Array2<f64> {
    &self.values
  }

  pub fn into_values(self) -> Array2<f64> {
    self.values
  }

  pub fn len(&self) -> usize {
    self.values.nrows()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn dimension(&self) -> usize {
    self.values.ncols()
  }

  /// Path of component `j`.
  pub fn component(&self, j: usize) -> ArrayView1<'_, f64> {
    self.values.index_axis(Axis(1), j)
  }

  /// `(t_n, X(t_n))` pairs in grid order.
  pub fn iter(&self) -> impl Iterator<Item = (f64, ArrayView1<'_, f64>)> + '_ {
    self.grid.iter().zip(self.values.outer_iter())
  }

  pub fn to_table(&self) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let mut titles = vec![Cell::new("t")];
    titles.extend((0..self.dimension()).map(|j| Cell::new(&format!("x{j}"))));
    table.set_titles(Row::new(titles));

    for (t, row) in self.iter() {
      let mut cells = vec![Cell::new(&format!("{t:.6}"))];
      cells.extend(row.iter().map(|x| Cell::new(&format!("{x:.6}"))));
      table.add_row(Row::new(cells));
    }
    table
  }
}

impl fmt::Display for Realization {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.to_table())
  }
}
