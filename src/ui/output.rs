use crate::ui::theme;
use owo_colors::OwoColorize;

pub fn success(label: &str) {
    println!("✅ {}", label.style(theme().success.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}
