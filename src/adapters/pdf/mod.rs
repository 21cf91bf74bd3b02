pub mod chromium;
pub mod gotenberg;

pub use chromium::ChromiumRenderer;
pub use gotenberg::GotenbergRenderer;
