// Core modules implementing the segment model, the three codecs, and error modeling.
pub mod error;
pub mod grouped;
pub mod markup;
pub mod segment;
pub mod text;
