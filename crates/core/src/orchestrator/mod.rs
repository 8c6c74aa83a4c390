pub mod batch;
pub mod implementation;
pub mod outcome;
pub mod selection;
