//! Edges of the application: file input and the console stand-in for the
//! browser.

pub mod console;
pub mod csv;
