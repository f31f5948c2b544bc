//! Trailing rolling statistics over a daily target with gaps.
//!
//! The risk table needs rolling mean and standard deviation of the
//! observed series; missing days inside a window are skipped rather
//! than poisoning the whole window.

/// Trailing rolling mean over the observed values in each window.
///
/// Entry `i` covers rows `[i + 1 - window, i]`. The result is `None`
/// until a full window of rows is available or when the window holds no
/// observed value.
pub fn rolling_mean(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(series, window, |obs| {
        if obs.is_empty() {
            None
        } else {
            Some(obs.iter().sum::<f64>() / obs.len() as f64)
        }
    })
}

/// Trailing rolling sample standard deviation (n - 1 denominator).
///
/// `None` until a full window is available or when fewer than two
/// observed values fall inside the window.
pub fn rolling_std(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(series, window, |obs| {
        if obs.len() < 2 {
            return None;
        }
        let mean = obs.iter().sum::<f64>() / obs.len() as f64;
        let var =
            obs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (obs.len() - 1) as f64;
        Some(var.sqrt())
    })
}

fn rolling_apply<F>(series: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let n = series.len();
    if window == 0 {
        return vec![None; n];
    }

    let mut result = vec![None; n];
    for i in 0..n {
        if i + 1 < window {
            continue;
        }
        let observed: Vec<f64> = series[i + 1 - window..=i].iter().filter_map(|v| *v).collect();
        result[i] = f(&observed);
    }
    result
}

/// Last defined entry of a rolling column, if any.
pub fn last_defined(column: &[Option<f64>]) -> Option<f64> {
    column.iter().rev().find_map(|v| *v)
}
