use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::Path,
};

use crate::matrix::{Cost, CostMatrix, NumVertices};

pub type Result<T> = std::io::Result<T>;

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let next = $iterator.next();
        raise_error_unless!(
            next.is_some(),
            ErrorKind::InvalidData,
            format!("Premature end of line when parsing {}.", $name)
        );

        let parsed = next.unwrap().parse();
        raise_error_unless!(
            parsed.is_ok(),
            ErrorKind::InvalidData,
            format!("Could not parse {}.", $name)
        );
        parsed.unwrap()
    }};
}

/// Reads a cost matrix from the text format
///
/// ```text
/// c an optional comment
/// p tsp 4
/// INF 10 15 20
/// 10 INF 35 25
/// 15 35 INF 30
/// 20 25 30 INF
/// ```
///
/// where `INF` (case-insensitive) or `-1` mark an absent edge. Lines starting
/// with `c` and blank lines are skipped.
pub trait CostMatrixReader: Sized {
    fn try_read_tsp<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_tsp_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl CostMatrixReader for CostMatrix {
    fn try_read_tsp<R: BufRead>(reader: R) -> Result<Self> {
        let mut matrix_reader = MatrixReader::try_new(reader)?;

        let mut rows = Vec::with_capacity(matrix_reader.number_of_vertices() as usize);
        for _ in 0..matrix_reader.number_of_vertices() {
            rows.push(matrix_reader.parse_row()?);
        }

        CostMatrix::try_from_rows(rows)
            .map_err(|error| std::io::Error::new(ErrorKind::InvalidData, error.to_string()))
    }

    fn try_read_tsp_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_tsp(buf_reader)
    }
}

pub struct MatrixReader<R> {
    lines: Lines<R>,
    number_of_vertices: NumVertices,
}

impl<R: BufRead> MatrixReader<R> {
    pub fn try_new(reader: R) -> Result<Self> {
        let mut matrix_reader = Self {
            lines: reader.lines(),
            number_of_vertices: 0,
        };

        matrix_reader.number_of_vertices = matrix_reader.parse_header()?;
        Ok(matrix_reader)
    }

    pub fn number_of_vertices(&self) -> NumVertices {
        self.number_of_vertices
    }

    fn next_data_line(&mut self) -> Result<String> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line?,
                None => {
                    return Err(std::io::Error::new(
                        ErrorKind::InvalidData,
                        "Premature end of input.",
                    ));
                }
            };

            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('c') {
                return Ok(trimmed.to_string());
            }
        }
    }

    fn parse_header(&mut self) -> Result<NumVertices> {
        let line = self.next_data_line()?;
        let mut tokens = line.split_whitespace();

        raise_error_unless!(
            tokens.next() == Some("p"),
            ErrorKind::InvalidData,
            "Expected header to start with 'p'."
        );
        raise_error_unless!(
            tokens.next() == Some("tsp"),
            ErrorKind::InvalidData,
            "Expected problem descriptor 'tsp'."
        );

        let number_of_vertices: NumVertices = parse_next_value!(tokens, "number of vertices");

        raise_error_unless!(
            tokens.next().is_none(),
            ErrorKind::InvalidData,
            "Unexpected token after header."
        );

        Ok(number_of_vertices)
    }

    pub fn parse_row(&mut self) -> Result<Vec<Option<Cost>>> {
        let line = self.next_data_line()?;

        let mut row = Vec::with_capacity(self.number_of_vertices as usize);
        for token in line.split_whitespace() {
            row.push(parse_cost_token(token)?);
        }

        raise_error_unless!(
            row.len() == self.number_of_vertices as usize,
            ErrorKind::InvalidData,
            format!(
                "Expected {} entries per row, found {}.",
                self.number_of_vertices,
                row.len()
            )
        );

        Ok(row)
    }
}

fn parse_cost_token(token: &str) -> Result<Option<Cost>> {
    if token.eq_ignore_ascii_case("inf") || token == "-1" {
        return Ok(None);
    }

    match token.parse::<Cost>() {
        Ok(cost) => Ok(Some(cost)),
        Err(_) => Err(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("Could not parse cost entry '{token}'."),
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn read(input: &str) -> Result<CostMatrix> {
        CostMatrix::try_read_tsp(input.as_bytes())
    }

    #[test]
    fn hard_coded() {
        let matrix = read(concat!(
            "c four city example\n",
            "p tsp 4\n",
            "INF 10 15 20\n",
            "10 INF 35 25\n",
            "15 35 INF 30\n",
            "20 25 30 INF\n"
        ))
        .unwrap();

        assert_eq!(matrix.number_of_vertices(), 4);
        assert_eq!(matrix.get(0, 0), None);
        assert_eq!(matrix.get(0, 1), Some(10));
        assert_eq!(matrix.get(3, 2), Some(30));
    }

    #[test]
    fn accepts_minus_one_as_absent() {
        let matrix = read("p tsp 2\n-1 7\n7 -1\n").unwrap();
        assert_eq!(matrix.get(0, 1), Some(7));
        assert_eq!(matrix.get(1, 1), None);
    }

    #[test]
    fn rejects_missing_header() {
        assert!(read("INF 10\n10 INF\n").is_err());
    }

    #[test]
    fn rejects_wrong_problem_descriptor() {
        assert!(read("p ds 2\n-1 7\n7 -1\n").is_err());
    }

    #[test]
    fn rejects_short_row() {
        assert!(read("p tsp 3\nINF 1 2\n1 INF\n2 1 INF\n").is_err());
    }

    #[test]
    fn rejects_truncated_input() {
        assert!(read("p tsp 3\nINF 1 2\n").is_err());
    }

    #[test]
    fn rejects_finite_diagonal() {
        assert!(read("p tsp 2\n0 7\n7 INF\n").is_err());
    }
}
