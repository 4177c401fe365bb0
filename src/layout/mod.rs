//! Surface layout: where the matrix sits and how much of it the overlay image may hide.

pub(crate) mod grid;
pub(crate) mod occlusion;
