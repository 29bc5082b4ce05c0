use num_traits::{One, Zero};

use crate::{Matrix, Rat};

/// A pivot found during reduction: the entry's value before the row was
/// normalized, and its position.
#[derive(Clone, Debug, PartialEq)]
pub struct Pivot {
    pub value: Rat,
    pub row: usize,
    pub col: usize,
}

/// Basis vectors of a row or column space, with optional 1-based labels.
#[derive(Clone, Debug)]
pub struct SpaceBasis {
    pub vectors: Matrix,
    pub labels: Option<Vec<String>>,
}

/// The solution set of `Ax = 0` together with the trace of how each pivot
/// variable depends on the free variables.
#[derive(Clone, Debug)]
pub struct NullSpace {
    pub rref: Matrix,
    pub pivots: Vec<Pivot>,
    pub free_cols: Vec<usize>,
    pub basis: Vec<Vec<Rat>>,
    pub relations: Vec<Relation>,
}

/// One dependent-variable equation: `x_pivot = Σ coeff·x_col`.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    pub pivot_col: usize,
    pub terms: Vec<Term>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Term {
    pub col: usize,
    pub coeff: Rat,
}

/// Transforms a matrix into reduced row echelon form in place and returns
/// the pivots in row order.
///
/// Rows keep their positions: each row's pivot is its first nonzero entry,
/// and the pivot's column is cleared from every other row as soon as it is
/// found. Rows with no nonzero entry get no pivot.
pub fn rref(mat: &mut Matrix) -> Vec<Pivot> {
    let row_n = mat.len();
    let col_n = mat.first().map_or(0, Vec::len);
    let mut pivots: Vec<Pivot> = Vec::new();

    for i in 0..row_n {
        let Some(col) = (0..col_n).find(|&j| !mat[i][j].is_zero()) else {
            continue;
        };
        let value = mat[i][col].clone();
        log::debug!("pivot {value} at row {i}, column {col}");

        let pivot_row = mat[i].clone();
        for other in 0..row_n {
            if other == i {
                continue;
            }
            let factor = -(&mat[other][col] / &value);
            if factor.is_zero() {
                continue;
            }
            // Columns before the pivot are already zero in both rows.
            row_add_scaled(&mut mat[other], &pivot_row, &factor, col);
        }

        pivots.push(Pivot { value, row: i, col });
    }

    for pivot in &pivots {
        mat[pivot.row]
            .iter_mut()
            .for_each(|x| *x = &*x / &pivot.value);
    }
    pivots
}

fn row_add_scaled(dest: &mut [Rat], src: &[Rat], factor: &Rat, from: usize) {
    dest.iter_mut()
        .zip(src.iter())
        .skip(from)
        .for_each(|(dest, src)| *dest = &*dest + &(src * factor));
}

/// Returns the matrix reshaped so that row `j` is the original column `j`.
pub fn transpose(mat: &Matrix) -> Matrix {
    let col_n = mat.first().map_or(0, Vec::len);
    (0..col_n)
        .map(|j| mat.iter().map(|row| row[j].clone()).collect())
        .collect()
}

/// The column vectors of a matrix, one per output row.
pub fn column_space(mat: &Matrix, with_labels: bool) -> SpaceBasis {
    let vectors = transpose(mat);
    SpaceBasis {
        labels: index_labels(with_labels, vectors.len()),
        vectors,
    }
}

/// The row vectors of a matrix, unchanged.
pub fn row_space(mat: &Matrix, with_labels: bool) -> SpaceBasis {
    SpaceBasis {
        vectors: mat.clone(),
        labels: index_labels(with_labels, mat.len()),
    }
}

fn index_labels(with_labels: bool, n: usize) -> Option<Vec<String>> {
    with_labels.then(|| (1..=n).map(|i| format!("[{i}]")).collect())
}

/// Solves `Ax = 0`, consuming the matrix (it is reduced in place).
///
/// With full column rank the basis degenerates to a single zero vector.
/// Otherwise there is one basis vector per free column: a unit in the free
/// column's own position, and in each pivot column the negated entry of
/// that pivot's reduced row. The same entries are recorded as [`Relation`]s
/// for narration.
pub fn null_space(mut mat: Matrix) -> NullSpace {
    let pivots = rref(&mut mat);
    let col_n = mat.first().map_or(0, Vec::len);
    let free_cols: Vec<usize> = (0..col_n)
        .filter(|j| pivots.iter().all(|p| p.col != *j))
        .collect();
    log::debug!("rank {}, nullity {}", pivots.len(), free_cols.len());

    if free_cols.is_empty() {
        return NullSpace {
            rref: mat,
            basis: vec![vec![Rat::zero(); pivots.len()]],
            pivots,
            free_cols,
            relations: Vec::new(),
        };
    }

    let mut basis: Vec<Vec<Rat>> = free_cols
        .iter()
        .map(|&free| {
            let mut v = vec![Rat::zero(); col_n];
            v[free] = Rat::one();
            v
        })
        .collect();

    let mut relations = Vec::new();
    for pivot in &pivots {
        let mut terms = Vec::new();
        for (slot, &col) in free_cols.iter().enumerate() {
            let entry = &mat[pivot.row][col];
            if entry.is_zero() {
                continue;
            }
            let coeff = -entry;
            basis[slot][pivot.col] = coeff.clone();
            terms.push(Term { col, coeff });
        }
        relations.push(Relation {
            pivot_col: pivot.col,
            terms,
        });
    }

    NullSpace {
        rref: mat,
        pivots,
        free_cols,
        basis,
        relations,
    }
}

/// Solves `Aᵀx = 0` by feeding the transpose to [`null_space`].
pub fn left_null_space(mat: &Matrix) -> NullSpace {
    null_space(column_space(mat, false).vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mat(rows: &[&[i64]]) -> Matrix {
        rows.iter()
            .map(|row| row.iter().map(|&n| Rat::from_integer(n.into())).collect())
            .collect()
    }

    fn mat_vec_mul(mat: &Matrix, v: &[Rat]) -> Vec<Rat> {
        mat.iter()
            .map(|row| {
                row.iter()
                    .zip(v)
                    .fold(Rat::zero(), |acc, (a, b)| acc + a * b)
            })
            .collect()
    }

    fn assert_is_rref(mat: &Matrix, pivots: &[Pivot]) {
        for pivot in pivots {
            assert!(mat[pivot.row][pivot.col].is_one());
            for (i, row) in mat.iter().enumerate() {
                if i != pivot.row {
                    assert!(row[pivot.col].is_zero());
                }
            }
        }
    }

    #[test]
    fn reduces_invertible_matrix_to_identity() {
        let mut m = mat(&[&[1, 2], &[3, 4]]);
        let pivots = rref(&mut m);
        assert_eq!(m, mat(&[&[1, 0], &[0, 1]]));
        assert_eq!(
            pivots.iter().map(|p| (p.row, p.col)).collect::<Vec<_>>(),
            vec![(0, 0), (1, 1)]
        );
        // Recorded pivot values predate normalization.
        assert_eq!(pivots[0].value, Rat::from_integer(1.into()));
        assert_eq!(pivots[1].value, Rat::from_integer((-2).into()));
    }

    #[test]
    fn rref_is_idempotent() {
        let mut m = mat(&[&[1, 0, -2], &[0, 1, 3], &[0, 0, 0]]);
        let reduced = m.clone();
        rref(&mut m);
        assert_eq!(m, reduced);
    }

    #[test]
    fn clears_pivot_columns_with_exact_fractions() {
        let mut m = mat(&[&[2, 4, 1], &[1, 3, 2], &[3, 7, 3]]);
        let pivots = rref(&mut m);
        assert_is_rref(&m, &pivots);
    }

    #[test]
    fn rank_deficient_matrix_keeps_zero_rows() {
        let mut m = mat(&[&[1, 2, 3], &[2, 4, 6]]);
        let pivots = rref(&mut m);
        assert_eq!(m, mat(&[&[1, 2, 3], &[0, 0, 0]]));
        assert_eq!(pivots.len(), 1);
        assert_eq!((pivots[0].row, pivots[0].col), (0, 0));
    }

    #[test]
    fn zero_matrix_has_no_pivots() {
        let mut m = mat(&[&[0, 0], &[0, 0]]);
        assert!(rref(&mut m).is_empty());
        assert_eq!(m, mat(&[&[0, 0], &[0, 0]]));
    }

    #[test]
    fn empty_matrix_is_tolerated() {
        let mut m: Matrix = Vec::new();
        assert!(rref(&mut m).is_empty());

        let ns = null_space(Vec::new());
        assert!(ns.pivots.is_empty());
        assert_eq!(ns.basis, vec![Vec::<Rat>::new()]);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = mat(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(transpose(&m), mat(&[&[1, 4], &[2, 5], &[3, 6]]));
    }

    #[test]
    fn spaces_carry_one_based_labels() {
        let m = mat(&[&[1, 2], &[3, 4]]);

        let cols = column_space(&m, true);
        assert_eq!(cols.vectors, mat(&[&[1, 3], &[2, 4]]));
        assert_eq!(cols.labels, Some(vec!["[1]".to_owned(), "[2]".to_owned()]));

        let rows = row_space(&m, false);
        assert_eq!(rows.vectors, m);
        assert_eq!(rows.labels, None);
    }

    #[test]
    fn full_column_rank_yields_single_zero_vector() {
        let ns = null_space(mat(&[&[1, 2], &[3, 4]]));
        assert!(ns.free_cols.is_empty());
        assert_eq!(ns.basis, mat(&[&[0, 0]]));
        assert!(ns.relations.is_empty());
    }

    #[test]
    fn free_variable_scenario() {
        let a = mat(&[&[1, 2, 3], &[2, 4, 6]]);
        let ns = null_space(a.clone());

        assert_eq!(ns.rref, mat(&[&[1, 2, 3], &[0, 0, 0]]));
        assert_eq!(ns.free_cols, vec![1, 2]);
        assert_eq!(ns.basis, mat(&[&[-2, 1, 0], &[-3, 0, 1]]));
        for v in &ns.basis {
            assert!(mat_vec_mul(&a, v).iter().all(Zero::is_zero));
        }

        assert_eq!(ns.relations.len(), 1);
        let relation = &ns.relations[0];
        assert_eq!(relation.pivot_col, 0);
        assert_eq!(
            relation.terms,
            vec![
                Term {
                    col: 1,
                    coeff: Rat::from_integer((-2).into())
                },
                Term {
                    col: 2,
                    coeff: Rat::from_integer((-3).into())
                },
            ]
        );
    }

    #[test]
    fn basis_count_matches_nullity() {
        let a = mat(&[&[1, 2, 3, 4], &[2, 4, 6, 8], &[1, 1, 1, 1]]);
        let ns = null_space(a.clone());
        let cols = a[0].len();
        assert_eq!(ns.basis.len(), cols - ns.pivots.len());
        for v in &ns.basis {
            assert!(mat_vec_mul(&a, v).iter().all(Zero::is_zero));
        }
    }

    #[test]
    fn zero_matrix_null_space_is_standard_basis() {
        let ns = null_space(mat(&[&[0, 0], &[0, 0]]));
        assert!(ns.pivots.is_empty());
        assert_eq!(ns.free_cols, vec![0, 1]);
        assert_eq!(ns.basis, mat(&[&[1, 0], &[0, 1]]));
    }

    #[test]
    fn left_null_space_annihilates_rows() {
        let a = mat(&[&[1, 2, 3], &[2, 4, 6]]);
        let ns = left_null_space(&a);
        assert_eq!(ns.basis, mat(&[&[-2, 1]]));

        // vᵀA = Σ v_i · row_i must vanish.
        for v in &ns.basis {
            let combo = mat_vec_mul(&transpose(&a), v);
            assert!(combo.iter().all(Zero::is_zero));
        }
    }

    #[test]
    fn unsorted_pivots_are_still_cleared() {
        let mut m = mat(&[&[0, 1], &[1, 1]]);
        let pivots = rref(&mut m);
        assert_eq!(
            pivots.iter().map(|p| (p.row, p.col)).collect::<Vec<_>>(),
            vec![(0, 1), (1, 0)]
        );
        assert_is_rref(&m, &pivots);
        assert_eq!(m, mat(&[&[0, 1], &[1, 0]]));
    }
}
