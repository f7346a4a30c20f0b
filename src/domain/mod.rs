pub mod audio;
pub mod generation;
pub mod podcast;
pub mod script;
