//! # Linalg functions
//!
//! Dense row-major matrix used as backing storage for tableaus, together with the
//! elementary row operations the pivot operator is built from.
//!

/// Values with an absolute value below `EPSILON` are snapped to exact zero after every row operation.
pub const EPSILON: f64 = 1e-6;

/// Creates an identity matrix based on the input size `n`
pub fn identity_matrix(n: usize) -> Matrix {
    let mut t: Vec<f64> = Vec::with_capacity(n*n);
    for r in 0..n {
        for i in 0..n {
            if r == i {
                t.push(1.);
            } else {
                t.push(0.);
            }
        }
    }
    Matrix { val: t, ncols: n, nrows: n}
}

/// Snaps `value` to zero if it is closer to zero than [EPSILON].
pub fn snap(value: f64) -> f64 {
    if value.abs() < EPSILON {
        0.0
    } else {
        value
    }
}

/// Data structure for matrix
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    /// `Vec` holding the values of the matrix. Note that `val.len()` must be equal to the product of `ncols` and `nrows`.
    pub val: Vec<f64>,
    /// Number of columns of the matrix
    pub ncols: usize,
    /// Number of rows of the matrix
    pub nrows: usize
}

/// Calculates the dot product between two matrices
///
/// # Example:
///
/// ```
/// use tableaurs::linalg::{dot, Matrix};
/// let a = Matrix { val: vec![1., 1., 1., 0.], ncols: 2, nrows: 2 };
/// let x = Matrix { val: vec![2., 2.], ncols: 1, nrows: 2 };
/// assert_eq!(dot(&a, &x).val, vec![4., 2.]);
/// ```
pub fn dot(mat1: &Matrix, mat2: &Matrix) -> Matrix{
    if !(mat1.ncols == mat2.nrows){
        panic!("Dimensions does not match, cannot calculate the dot product between matrices of shapes ({},{}) and ({},{})", mat1.nrows, mat1.ncols, mat2.nrows, mat2.ncols);
    }
    let mut result: Vec<f64> = Vec::with_capacity(mat1.nrows*mat2.ncols);
    for i in 0..mat1.nrows {
        for j in 0..mat2.ncols {
            result.push(mat1.row(i).iter().zip(mat2.val.iter().skip(j).step_by(mat2.ncols)).map(|(x, y)| x * y).sum());
        }
    }
    Matrix {
        val: result,
        ncols: mat2.ncols,
        nrows: mat1.nrows
    }
}

/// Transpose the input Matrix and returns the result as a new Matrix
///
/// # Example:
///
/// ```
/// use tableaurs::linalg::Matrix;
/// use tableaurs::linalg::transpose;
/// let res = transpose(&Matrix{val: vec![1., 2., 3., 4., 5., 6.], ncols: 3, nrows: 2});
/// assert_eq!(res.val, vec![1., 4., 2., 5., 3., 6.]);
/// assert_eq!((res.nrows, res.ncols), (3, 2));
/// ```
pub fn transpose(mat: &Matrix) -> Matrix{
    let mut result = Vec::with_capacity(mat.val.len());
    for i in 0..mat.ncols{
        for j in 0..mat.nrows{
            result.push(mat.val[j*mat.ncols + i])
        }
    }
    Matrix{val: result, nrows: mat.ncols, ncols: mat.nrows}
}

/// Inserts the columns of `block` into `mat` so that the first inserted column gets index `at`.
/// Both matrices must have the same number of rows. A new matrix is returned.
///
/// # Example:
///
/// ```
/// use tableaurs::linalg::{identity_matrix, insert_columns, Matrix};
/// let m = Matrix { val: vec![1., 2., 3., 4.], ncols: 2, nrows: 2 };
/// let res = insert_columns(&m, 1, &identity_matrix(2));
/// assert_eq!(res.val, vec![1., 1., 0., 2., 3., 0., 1., 4.]);
/// assert_eq!(res.ncols, 4);
/// ```
pub fn insert_columns(mat: &Matrix, at: usize, block: &Matrix) -> Matrix {
    if !(mat.nrows == block.nrows && at <= mat.ncols) {
        panic!("Dimensions does not match, cannot insert a block of shape ({},{}) at column {} of a matrix of shape ({},{})", block.nrows, block.ncols, at, mat.nrows, mat.ncols);
    }
    let ncols = mat.ncols + block.ncols;
    let mut result: Vec<f64> = Vec::with_capacity(mat.nrows*ncols);
    for i in 0..mat.nrows {
        let row = mat.row(i);
        result.extend_from_slice(&row[..at]);
        result.extend_from_slice(block.row(i));
        result.extend_from_slice(&row[at..]);
    }
    Matrix { val: result, ncols, nrows: mat.nrows }
}

impl Matrix {
    /// Creates a matrix of shape (`nrows`, `ncols`) filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Matrix {
        Matrix { val: vec![0.0; nrows*ncols], ncols, nrows }
    }
    /// Stacks equally long rows into a matrix. Returns `None` if the rows differ in length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Matrix> {
        let ncols = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != ncols) {
            return None;
        }
        Some(Matrix { val: rows.concat(), ncols, nrows: rows.len() })
    }
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.val[i*self.ncols + j]
    }
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.val[i*self.ncols + j] = value;
    }
    pub fn row(&self, i: usize) -> &[f64] {
        &self.val[i*self.ncols..(i+1)*self.ncols]
    }
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.val[i*self.ncols..(i+1)*self.ncols]
    }
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.val.iter().skip(j).step_by(self.ncols).copied().collect()
    }
    /// Returns the sub matrix made of the columns in `range`.
    pub fn get_columns(&self, range: std::ops::Range<usize>) -> Matrix {
        let mut result = Vec::with_capacity(self.nrows*range.len());
        for i in 0..self.nrows {
            result.extend_from_slice(&self.row(i)[range.clone()]);
        }
        Matrix { val: result, ncols: range.len(), nrows: self.nrows }
    }
    /// Multiplies row `i` by `scalar` and snaps the result.
    pub fn scale_row(&mut self, i: usize, scalar: f64) {
        for v in self.row_mut(i) {
            *v = snap(*v * scalar);
        }
    }
    /// Negates row `i`.
    pub fn negate_row(&mut self, i: usize) {
        self.scale_row(i, -1.0)
    }
    /// Replaces row `target` with `row_target + scalar * row_source` and snaps the result.
    ///
    /// # Example:
    ///
    /// ```
    /// use tableaurs::linalg::Matrix;
    /// let mut m = Matrix { val: vec![1., 2., 3., 4., 5., 6.], ncols: 3, nrows: 2 };
    /// m.add_scaled_row(1, 0, -4.0);
    /// assert_eq!(m.row(1), &[0., -3., -6.]);
    /// ```
    pub fn add_scaled_row(&mut self, target: usize, source: usize, scalar: f64) {
        assert!(scalar.is_finite(), "row operation with non-finite scalar {}", scalar);
        if target == source {
            return self.scale_row(target, 1.0 + scalar);
        }
        let ncols = self.ncols;
        for j in 0..ncols {
            let v = self.val[target*ncols + j] + scalar * self.val[source*ncols + j];
            self.val[target*ncols + j] = snap(v);
        }
    }
    /// See [dot]
    pub fn dot(&self, mat2: &Matrix) -> Matrix{
        dot(self, mat2)
    }
    /// See [transpose]
    pub fn transpose(&self) -> Matrix{
        transpose(self)
    }
    /// See [insert_columns]
    pub fn insert_columns(&self, at: usize, block: &Matrix) -> Matrix {
        insert_columns(self, at, block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_dot_product() {
        let m1 = Matrix {
            val: vec![1.0,2.0,3.0,4.0,5.0,6.0],
            ncols: 2,
            nrows: 3,
        };
        let m2 = Matrix {
            val: vec![7.0,8.0,9.0,10.0],
            ncols: 2,
            nrows: 2,
        };
        assert_eq!(m1.dot(&m2).val, Matrix{val: vec![25.0, 28.0, 57.0, 64.0, 89.0, 100.0], ncols: 2, nrows: 3}.val);
    }

    #[test]
    fn test_row_operations_snap_noise() {
        let mut m = Matrix::from_rows(&[vec![1.0, 0.1 + 0.2], vec![1.0, 0.3]]).expect("equal rows");
        m.add_scaled_row(1, 0, -1.0);
        assert_eq!(m.row(1), &[0.0, 0.0]);
        assert!(m.get(1, 1).is_sign_positive());
        m.negate_row(1);
        assert!(m.get(1, 0).is_sign_positive());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![1.0]]).is_none());
        assert_eq!(Matrix::from_rows(&[]).map(|m| m.nrows), Some(0));
    }

    #[test]
    fn test_columns() {
        let m = Matrix { val: vec![1., 2., 3., 4., 5., 6.], ncols: 3, nrows: 2 };
        assert_eq!(m.column(1), vec![2., 5.]);
        assert_eq!(m.get_columns(1..3).val, vec![2., 3., 5., 6.]);
        assert_eq!(m.insert_columns(3, &Matrix::zeros(2, 1)).row(1), &[4., 5., 6., 0.]);
    }
}
