pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use output::{dim, success};
pub use progress::Spinner;
pub use table::{ResultRenderer, TableRenderer};
pub use theme::{theme, Theme};
