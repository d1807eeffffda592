use crate::domain::error::MatrixError;

/// Partially filled `[node][order]` matrix of evaluator results
///
/// Cells start empty and are written at most once. An empty cell is
/// "not yet computed" and is never confused with a real value; the
/// aggregator treats whatever is still empty at the end as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMatrix {
    rows: usize,
    orders: usize,
    cells: Vec<Option<f64>>,
}

impl ResultMatrix {
    /// Creates an all-empty matrix with `rows` nodes and `orders` order indices
    pub fn new(rows: usize, orders: usize) -> Self {
        Self {
            rows,
            orders,
            cells: vec![None; rows * orders],
        }
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn orders(&self) -> usize {
        self.orders
    }

    fn index(&self, row: usize, order: usize) -> Result<usize, MatrixError> {
        if row >= self.rows || order >= self.orders {
            return Err(MatrixError::OutOfBounds {
                row,
                order,
                rows: self.rows,
                orders: self.orders,
            });
        }
        Ok(row * self.orders + order)
    }

    pub fn get(&self, row: usize, order: usize) -> Option<f64> {
        self.index(row, order).ok().and_then(|i| self.cells[i])
    }

    /// Writes a real value into an empty cell
    pub fn set(&mut self, row: usize, order: usize, value: f64) -> Result<(), MatrixError> {
        let i = self.index(row, order)?;
        if self.cells[i].is_some() {
            return Err(MatrixError::AlreadyWritten { row, order });
        }
        self.cells[i] = Some(value);
        Ok(())
    }

    /// All cells of one row, empty ones included
    pub fn row(&self, row: usize) -> &[Option<f64>] {
        let start = row * self.orders;
        &self.cells[start..start + self.orders]
    }

    /// Values from order 0 up to (excluding) the first empty cell
    pub fn written_prefix(&self, row: usize) -> Vec<f64> {
        self.row(row).iter().map_while(|cell| *cell).collect()
    }

    /// Number of written cells in a row, gaps included
    pub fn written_count(&self, row: usize) -> usize {
        self.row(row).iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_row_complete(&self, row: usize) -> bool {
        self.row(row).iter().all(Option::is_some)
    }
}
