//! Dense matrices over generic rings and windows into them.

pub mod matrix;
