use std::io::{self, Write};

use num_traits::{Signed, ToPrimitive};
use owo_colors::OwoColorize;

use crate::lin_alg::{self, NullSpace, SpaceBasis};
use crate::{Matrix, Rat};

const BANNER_WIDTH: usize = 50;
const APPROX_DIGIT_LIMIT: usize = 10;

/// Renders an entry exactly, unless both the numerator and denominator run
/// past ten characters, in which case a 4-decimal approximation is shown
/// instead. Display-only; the data stays exact.
pub fn entry_text(value: &Rat) -> String {
    if !value.is_integer() {
        let numer = value.numer().to_string();
        let denom = value.denom().to_string();
        if numer.len() > APPROX_DIGIT_LIMIT && denom.len() > APPROX_DIGIT_LIMIT {
            if let Some(approx) = value.to_f64() {
                return format!("{approx:.4}");
            }
        }
    }
    value.to_string()
}

/// Writes a matrix with tab-separated cells, one row per line.
pub fn write_matrix<W: Write>(out: &mut W, mat: &Matrix) -> io::Result<()> {
    for row in mat {
        for cell in row {
            write!(out, "{}\t", entry_text(cell))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Like [`write_matrix`], with the row's label (if any) as the leading cell.
pub fn write_space<W: Write>(out: &mut W, space: &SpaceBasis) -> io::Result<()> {
    for (i, row) in space.vectors.iter().enumerate() {
        if let Some(labels) = &space.labels {
            write!(out, "{}\t", labels[i])?;
        }
        for cell in row {
            write!(out, "{}\t", entry_text(cell))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn banner(title: &str) -> String {
    format!("{:=^width$}", title, width = BANNER_WIDTH)
}

/// Writes a `=`-bannered section around the output of `body`.
pub fn write_section<W, F>(out: &mut W, title: &str, body: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    writeln!(out, "{}", banner(title))?;
    body(out)?;
    writeln!(out, "{}", banner("="))?;
    writeln!(out)
}

/// Narrates a null-space solution: the solution vector, the reduced matrix,
/// the pivot and free variable lists, and one equation per pivot variable.
///
/// Equation terms print the coefficient's absolute value; a leading `+` is
/// suppressed and later signs are spaced (`x_1 = -2*x_2 - 3*x_3`). Zero
/// coefficients are skipped. The equations appear only when free variables
/// exist.
pub fn write_derivation<W: Write>(out: &mut W, ns: &NullSpace) -> io::Result<()> {
    let col_n = ns.rref.first().map_or(0, Vec::len);
    let vars: Vec<String> = (1..=col_n).map(|i| format!("x_{i}")).collect();

    writeln!(
        out,
        "To find the null space, we need to solve the equation Ax=0 or Rx=0"
    )?;
    writeln!(out)?;
    writeln!(out, "x = [{}]^T", vars.join(", "))?;
    writeln!(out, "R (Reduced Row Echelon Form):")?;
    write_matrix(out, &ns.rref)?;
    writeln!(out)?;

    write!(out, "Pivot variables:")?;
    for pivot in &ns.pivots {
        write!(out, " {}", vars[pivot.col].green().bold())?;
    }
    writeln!(out)?;
    write!(out, "Free variables:")?;
    for &col in &ns.free_cols {
        write!(out, " {}", vars[col].yellow().bold())?;
    }
    writeln!(out)?;
    writeln!(out)?;

    if ns.free_cols.is_empty() {
        return Ok(());
    }
    for relation in &ns.relations {
        write!(out, "{} = ", vars[relation.pivot_col])?;
        for (i, term) in relation.terms.iter().enumerate() {
            if i == 0 {
                if term.coeff.is_negative() {
                    write!(out, "-")?;
                }
            } else if term.coeff.is_negative() {
                write!(out, "- ")?;
            } else {
                write!(out, "+ ")?;
            }
            write!(out, "{}*{} ", term.coeff.abs(), vars[term.col])?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

/// Prints the five-section subspace report for a matrix.
pub fn write_report<W: Write>(out: &mut W, matrix: &Matrix) -> io::Result<()> {
    write_section(out, "REQUESTED MATRIX", |out| write_matrix(out, matrix))?;

    let columns = lin_alg::column_space(matrix, true);
    write_section(out, "COLUMN SPACE", |out| write_space(out, &columns))?;

    let rows = lin_alg::row_space(matrix, true);
    write_section(out, "ROW SPACE", |out| write_space(out, &rows))?;

    let null = lin_alg::null_space(matrix.clone());
    write_section(out, "NULL SPACE", |out| {
        write_derivation(out, &null)?;
        writeln!(out, "NULL SPACE:")?;
        write_matrix(out, &lin_alg::transpose(&null.basis))
    })?;

    let left = lin_alg::left_null_space(matrix);
    write_section(out, "LEFT NULL SPACE", |out| {
        write_derivation(out, &left)?;
        writeln!(out, "LEFT NULL SPACE:")?;
        write_matrix(out, &lin_alg::transpose(&left.basis))
    })?;

    Ok(())
}
