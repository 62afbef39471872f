pub mod colors;
pub mod format;
pub mod logging;
pub mod operator;
pub mod print;
pub mod spinner;
