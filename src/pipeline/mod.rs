pub mod flatten;
pub mod normalize;
pub mod parse;
