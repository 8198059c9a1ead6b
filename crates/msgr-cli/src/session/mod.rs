//! Interactive session: menu rendering and the driver loop.

mod driver;
mod render;

pub use driver::run;
