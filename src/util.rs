/// Checks that a numerical value is in the interval `[a,b]` and returns early from the
/// enclosing function with [`Error::InvalidArgument`](crate::error::Error::InvalidArgument) if not
///
/// `NaN` never passes the check.
///
/// ### Example
/// ```ignore
/// let alpha = 2.0;
/// check_interval!(alpha, 0.0, 1.0);
/// ```
/// This returns an error reading "invalid argument \`alpha\`: must be in the interval \[0, 1\], got 2".
#[macro_export]
macro_rules! check_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::InvalidArgument {
                name: stringify!($var).to_string(),
                reason: format!("must be in the interval [{}, {}], got {}", $a, $b, $var),
            });
        }
    };
}

/// Element-wise mean of equally long rows
///
/// Returns an empty vec when there are no rows. Rows longer than the first are truncated.
pub fn elementwise_mean<T: AsRef<[f64]>>(rows: &[T]) -> Vec<f64> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    let mut sums = vec![0.0; first.as_ref().len()];
    for row in rows {
        for (sum, x) in sums.iter_mut().zip(row.as_ref()) {
            *sum += x;
        }
    }

    let n = rows.len() as f64;
    sums.into_iter().map(|s| s / n).collect()
}
