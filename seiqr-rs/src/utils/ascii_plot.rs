use std::iter;

use crate::{utils::INF, Real};

/// Render a sequence of non-negative values as vertical ASCII bars.
///
/// Values are averaged down to at most `width` columns and scaled to
/// `height` rows. An optional reference level (e.g. a capacity) is drawn as
/// a row of '-' where no bar reaches it.
pub fn render_vbars(values: &[Real], width: usize, height: usize, reference: Option<Real>) -> String {
    if values.is_empty() || width == 0 || height == 0 {
        return String::new();
    }
    let cols = downsample(values, width);
    let top = cols
        .iter()
        .cloned()
        .chain(reference)
        .fold(-INF, |x, y| x.max(y));
    if !(top > 0.0) {
        return String::new();
    }
    let step = top / height as Real;
    let ref_row = reference.map(|r| height - ((r / step).round() as usize).min(height));

    let mut out = String::with_capacity((cols.len() + 1) * (height + 1));
    for i in 0..height {
        let h = (height - i) as Real * step;
        let fill = if ref_row == Some(i) { '-' } else { ' ' };
        out.extend(cols.iter().map(|&x| if x >= h { '*' } else { fill }));
        out.push('\n');
    }
    out.extend(iter::repeat('=').take(cols.len()));
    out
}

/// ASCII plot of a sequence of positive values.
///
/// Draw each point as a column filled with '*'s up to the maximum height.
pub fn plot_vbars(values: &[Real], width: usize, height: usize, reference: Option<Real>) {
    println!("{}", render_vbars(values, width, height, reference));
}

/// ASCII plot of a sequence of positive values horizontally.
///
/// Each value is a row filled with '='s up to the maximum width.
pub fn render_hbars(values: &[Real], width: usize) -> String {
    let max = values.iter().cloned().fold(-INF, |x, y| x.max(y));
    if !(max > 0.0) {
        return String::new();
    }
    let step = max / width as Real;
    let mut out = String::new();
    for &x in values {
        let n = (x.max(0.0) / step) as usize;
        out.push('|');
        out.extend(iter::repeat('=').take(n));
        out.push('\n');
    }
    out
}

fn downsample(values: &[Real], width: usize) -> Vec<Real> {
    if values.len() <= width {
        return values.to_vec();
    }
    let chunk = (values.len() + width - 1) / width;
    values
        .chunks(chunk)
        .map(|c| c.iter().sum::<Real>() / c.len() as Real)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vbars_shape() {
        let plot = render_vbars(&[1.0, 2.0, 4.0], 80, 4, None);
        let lines: Vec<&str> = plot.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "  *");
        assert_eq!(lines[2], " **");
        assert_eq!(lines[3], "***");
        assert_eq!(lines[4], "===");
    }

    #[test]
    fn reference_line() {
        let plot = render_vbars(&[1.0, 1.0, 4.0], 80, 4, Some(2.0));
        let lines: Vec<&str> = plot.lines().collect();
        assert_eq!(lines[2], "--*");
    }

    #[test]
    fn long_series_are_downsampled() {
        let values: Vec<Real> = (0..1000).map(|i| i as Real).collect();
        let plot = render_vbars(&values, 50, 10, None);
        assert!(plot.lines().all(|ln| ln.chars().count() == 50));
        assert_eq!(render_vbars(&[], 10, 10, None), "");
        assert_eq!(render_hbars(&[1.0, 2.0], 4), "|==\n|====\n");
    }
}
