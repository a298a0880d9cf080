pub mod matrix_reader;
pub use matrix_reader::*;

pub mod solution_writer;
pub use solution_writer::SolutionWriter;
