//! Text progress bar.

pub const BAR_WIDTH: usize = 30;

/// Renders `percent` (clamped to 0..=100) as `[####------]  40%`.
pub fn render_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100);
    let filled = width * usize::from(percent) / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(render_bar(0, 10), "[----------]   0%");
        assert_eq!(render_bar(50, 10), "[#####-----]  50%");
        assert_eq!(render_bar(100, 10), "[##########] 100%");
    }

    #[test]
    fn bar_clamps_out_of_range_values() {
        assert_eq!(render_bar(250, 4), "[####] 100%");
    }
}
