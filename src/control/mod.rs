//! Deflation feedback shown to the user while the cuff is released.

pub mod deflation;
