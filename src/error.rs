use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("bad glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(std::path::PathBuf),

    #[error("invalid mana cost: {0:?}")]
    InvalidCost(String),

    #[error("unknown rarity code: {0:?}")]
    UnknownRarity(String),

    #[error("no table row for card type: {0:?}")]
    UnknownCardType(String),

    #[error("card {0:?} has no type")]
    MissingType(String),

    #[error("row {line}: {source}")]
    Row {
        line: usize,
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    /// The underlying error, looking through any row annotation.
    pub fn root(&self) -> &CatalogError {
        match self {
            CatalogError::Row { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn at_line(self, line: usize) -> Self {
        CatalogError::Row {
            line,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
