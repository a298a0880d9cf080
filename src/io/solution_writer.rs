use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::exact::Solution;

/// Writes a solution set as
///
/// ```text
/// s tsp <number of tours> <cost>
/// <tour as 1-based vertex indices>
/// ...
/// ```
///
/// with one line per optimal tour.
pub trait SolutionWriter {
    fn try_write_solutions<W: Write>(&self, writer: W) -> Result<(), std::io::Error>;
    fn try_write_solutions_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error>;
}

impl SolutionWriter for [Solution] {
    fn try_write_solutions<W: Write>(&self, mut writer: W) -> Result<(), std::io::Error> {
        let cost = self.first().map_or(0, |solution| solution.cost);
        writeln!(writer, "s tsp {} {}", self.len(), cost)?;

        for solution in self {
            solution.tour.write(&mut writer)?;
        }

        Ok(())
    }

    fn try_write_solutions_file<P: AsRef<Path>>(&self, path: P) -> Result<(), std::io::Error> {
        let writer = BufWriter::new(File::create(path)?);
        self.try_write_solutions(writer)
    }
}
