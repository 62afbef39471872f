mod build;
mod prompt;
mod util;
