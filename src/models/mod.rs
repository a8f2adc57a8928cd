pub mod options;
pub mod review;
