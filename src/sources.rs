use crate::error::SplitError;
use crate::ini::SkinIni;
use std::path::Path;

/// File names of the five authoring sources, looked up inside the skin's
/// `SkinSplitter` directory.
pub const SKIN_FILE: &str = "skin.ini";
pub const VARIANTS_FILE: &str = "variants.ini";
pub const STYLES_FILE: &str = "styles.ini";
pub const NOTESETS_FILE: &str = "notesets.ini";
pub const NOTES_FILE: &str = "notes.ini";

/// The five authoring stores, loaded once up front. Resolution reads
/// them; nothing ever writes them back.
#[derive(Debug, Clone)]
pub struct Sources {
    pub skin: SkinIni,
    pub variants: SkinIni,
    pub styles: SkinIni,
    pub notesets: SkinIni,
    pub notes: SkinIni,
}

impl Sources {
    pub fn load(dir: &Path) -> Result<Self, SplitError> {
        Ok(Self {
            skin: load_one(dir, SKIN_FILE)?,
            variants: load_one(dir, VARIANTS_FILE)?,
            styles: load_one(dir, STYLES_FILE)?,
            notesets: load_one(dir, NOTESETS_FILE)?,
            notes: load_one(dir, NOTES_FILE)?,
        })
    }
}

fn load_one(dir: &Path, name: &str) -> Result<SkinIni, SplitError> {
    let path = dir.join(name);
    if !path.is_file() {
        return Err(SplitError::MissingSource(path));
    }
    SkinIni::parse_file(&path)
}
