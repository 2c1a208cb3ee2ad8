//! Small dense linear algebra for least-squares fits with a handful of regressors

use crate::{MathError, Result};

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// `a` is a square matrix given as rows. Fails on a singular system.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(format!(
            "Expected a {}x{} system",
            n, n
        )));
    }

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);

        if a[pivot][col].abs() < 1e-12 {
            return Err(MathError::CalculationError(
                "Singular system: regressors are collinear".to_string(),
            ));
        }

        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    Ok(x)
}

/// Least-squares coefficients for `targets ≈ rows * beta` via the normal equations.
///
/// Every row must have the same number of regressors. Include a constant `1.0`
/// column yourself if an intercept is wanted.
pub fn least_squares(rows: &[Vec<f64>], targets: &[f64]) -> Result<Vec<f64>> {
    ridge_least_squares(rows, targets, 0.0)
}

/// Least squares with `lambda` added to the diagonal of `XᵀX`.
///
/// A small positive `lambda` keeps collinear regressors (flat or perfectly
/// linear histories) solvable, and also admits fewer observations than
/// regressors. Plain least squares (`lambda == 0`) needs at least as many
/// observations as regressors.
pub fn ridge_least_squares(rows: &[Vec<f64>], targets: &[f64], lambda: f64) -> Result<Vec<f64>> {
    if rows.is_empty() || rows.len() != targets.len() {
        return Err(MathError::InvalidInput(
            "Design matrix and targets must have the same non-zero length".to_string(),
        ));
    }

    let k = rows[0].len();
    if lambda <= 0.0 && rows.len() < k {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} observations for {} regressors",
            k, k
        )));
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for (row, &y) in rows.iter().zip(targets) {
        if row.len() != k {
            return Err(MathError::InvalidInput(
                "Design matrix rows have different widths".to_string(),
            ));
        }
        for i in 0..k {
            xty[i] += row[i] * y;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += lambda;
    }

    solve(xtx, xty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_two_by_two() {
        // 2x + y = 5, x - y = 1
        let x = solve(vec![vec![2.0, 1.0], vec![1.0, -1.0]], vec![5.0, 1.0]).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-9);
        assert!((x[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_singular_system() {
        let result = solve(vec![vec![1.0, 2.0], vec![2.0, 4.0]], vec![1.0, 2.0]);
        assert!(matches!(result, Err(MathError::CalculationError(_))));
    }

    #[test]
    fn test_least_squares_recovers_line() {
        let rows: Vec<Vec<f64>> = (0..5).map(|i| vec![1.0, i as f64]).collect();
        let targets: Vec<f64> = (0..5).map(|i| 3.0 + 2.0 * i as f64).collect();

        let beta = least_squares(&rows, &targets).unwrap();
        assert!((beta[0] - 3.0).abs() < 1e-9);
        assert!((beta[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ridge_handles_collinear_columns() {
        // Second and third columns are identical
        let rows: Vec<Vec<f64>> = (0..6).map(|i| vec![1.0, i as f64, i as f64]).collect();
        let targets: Vec<f64> = (0..6).map(|i| 2.0 * i as f64).collect();

        assert!(least_squares(&rows, &targets).is_err());

        let beta = ridge_least_squares(&rows, &targets, 1e-6).unwrap();
        let fitted = beta[0] + beta[1] * 5.0 + beta[2] * 5.0;
        assert!((fitted - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_ridge_accepts_fewer_rows_than_regressors() {
        let rows = vec![vec![1.0, 0.5, 0.4, 0.3], vec![1.0, 0.6, 0.5, 0.4]];
        let targets = vec![0.6, 0.7];

        assert!(matches!(
            least_squares(&rows, &targets),
            Err(MathError::InsufficientData(_))
        ));

        let beta = ridge_least_squares(&rows, &targets, 1e-3).unwrap();
        assert_eq!(beta.len(), 4);
        for (row, y) in rows.iter().zip(&targets) {
            let fitted: f64 = row.iter().zip(&beta).map(|(x, b)| x * b).sum();
            assert!((fitted - y).abs() < 1e-2);
        }
    }
}
