pub mod outcome;
pub mod probe;
pub mod response;
pub mod target;
