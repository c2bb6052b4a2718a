use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// An error type indicating an invalid
/// population or network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The population size is zero or not a multiple of 4.
    PopulationSize(usize),
    /// A layer was configured with zero nodes.
    /// Layer 0 is the input layer.
    InvalidWidth { layer: usize },
    /// An input or output column set is empty.
    NoColumns,
    /// A column appears more than once in the same column set.
    DuplicateColumn(usize),
}

/// An error type indicating a failure to
/// obtain training rows.
#[derive(Debug)]
pub enum DataError {
    /// The data file does not exist.
    NotFound(PathBuf),
    /// The data file could not be read.
    Io(io::Error),
    /// A line contained a token that is not a number.
    Parse { line: usize, source: ParseError },
    /// The data set contains no rows.
    Empty,
}

/// A token that could not be parsed as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub token: String,
}

/// An error type indicating that a network was fed
/// an input vector of the wrong length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeError {
    pub expected: usize,
    pub found: usize,
}

/// An error type indicating that a designated column
/// lies outside of a sampled row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexError {
    pub column: usize,
    pub row_len: usize,
}

/// Any error that can abort a training run.
#[derive(Debug)]
pub enum TrainingError {
    Config(ConfigError),
    Data(DataError),
    Shape(ShapeError),
    Index(IndexError),
    /// A genome produced a different number of outputs
    /// than there are target columns.
    Outputs { expected: usize, found: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopulationSize(size) => write!(
                f,
                "population size must be a positive multiple of 4, got {}",
                size
            ),
            Self::InvalidWidth { layer } => write!(f, "layer {} has no nodes", layer),
            Self::NoColumns => write!(f, "input and output column sets must not be empty"),
            Self::DuplicateColumn(column) => write!(f, "column {} is listed twice", column),
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "data file {} not found", path.display()),
            Self::Io(e) => write!(f, "failed to read data file: {}", e),
            Self::Parse { line, source } => write!(f, "line {}: {}", line, source),
            Self::Empty => write!(f, "data set contains no rows"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid numeric value {:?}", self.token)
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected input length {}, expected {} input values",
            self.found, self.expected
        )
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column {} out of range for row of length {}",
            self.column, self.row_len
        )
    }
}

impl fmt::Display for TrainingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {}", e),
            Self::Data(e) => write!(f, "data error: {}", e),
            Self::Shape(e) => write!(f, "shape error: {}", e),
            Self::Index(e) => write!(f, "index error: {}", e),
            Self::Outputs { expected, found } => write!(
                f,
                "genome produced {} outputs for {} target columns",
                found, expected
            ),
        }
    }
}

impl Error for ConfigError {}
impl Error for ParseError {}
impl Error for ShapeError {}
impl Error for IndexError {}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Error for TrainingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Data(e) => Some(e),
            Self::Shape(e) => Some(e),
            Self::Index(e) => Some(e),
            Self::Outputs { .. } => None,
        }
    }
}

impl From<ConfigError> for TrainingError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<DataError> for TrainingError {
    fn from(e: DataError) -> Self {
        Self::Data(e)
    }
}

impl From<ShapeError> for TrainingError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}

impl From<IndexError> for TrainingError {
    fn from(e: IndexError) -> Self {
        Self::Index(e)
    }
}
