pub mod artifact;
pub mod goal;
pub mod milestone;
pub mod profile;
pub mod recommendation;
