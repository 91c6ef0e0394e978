use indicatif::{ProgressBar, ProgressStyle};

const COUNTING_TEMPLATE: &str = "{msg}: {pos}/{len} {wide_bar}";

pub fn counting_bar(name: impl ToString, total: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(COUNTING_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    ProgressBar::new(total as u64)
        .with_message(name.to_string())
        .with_style(style)
}
