use std::io;
use std::path::PathBuf;

/// Failures surfaced by the split pipeline. All of these are fatal: a
/// structural authoring error invalidates trust in the whole configuration
/// set, so the batch aborts rather than producing partial output.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("required source file '{0}' was not found")]
    MissingSource(PathBuf),

    #[error(
        "style keycount \"{keymode}\" in variant \"[{variant}]\" does not match \
         keycount \"Keys: {actual}\" in style \"[{style}]\" (expected {expected})"
    )]
    StructuralMismatch {
        variant: String,
        keymode: &'static str,
        style: String,
        expected: u32,
        actual: u32,
    },

    #[error("section \"[{0}]\" already exists")]
    DuplicateSection(String),

    #[error("section \"[{0}]\" does not exist")]
    SectionNotFound(String),

    #[error("option \"{option}\" does not exist in section \"[{section}]\"")]
    OptionNotFound { section: String, option: String },

    #[error("variant \"[{variant}]\" assigns unknown style \"[{style}]\" to \"{keymode}\"")]
    UnknownStyle {
        variant: String,
        keymode: &'static str,
        style: String,
    },

    #[error("style \"[{0}]\" declares no \"Keys\" value, and no default supplies one")]
    MissingKeys(String),

    #[error("style \"[{style}]\" declares a non-integer \"Keys\" value \"{value}\"")]
    InvalidKeys { style: String, value: String },

    #[error("style \"[{style}]\" declares no \"Note{index}\" type token")]
    MissingNote { style: String, index: u32 },

    #[error("skin argument not set")]
    UnsetSkin,

    #[error("skin '{0}' was not found")]
    SkinNotFound(PathBuf),

    #[error("io error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl SplitError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
