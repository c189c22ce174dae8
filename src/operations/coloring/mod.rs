mod color_table;
mod colorize;

pub use color_table::ColorTable;
pub use colorize::Colorize;
