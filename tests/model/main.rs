#![allow(clippy::cast_precision_loss)]

mod forest;

/// `y = x0² + x1` sampled on a small grid.
pub fn grid() -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut x = Vec::new();
    let mut y = Vec::new();
    for i in 0..6 {
        for j in 0..3 {
            let a = f64::from(i) * 0.4;
            let b = f64::from(j);
            x.push(vec![a, b]);
            y.push(a * a + b);
        }
    }
    (x, y)
}
