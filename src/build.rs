use crate::error::SplitError;
use crate::resolve::resolve_variants;
use crate::sources::{SKIN_FILE, Sources};
use log::{info, warn};
use std::io;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use std::{fs, thread};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Directory inside a skin that holds the layered authoring sources.
pub const SPLITTER_DIR: &str = "SkinSplitter";

const OSK_EXTENSION: &str = "osk";

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Name of the skin's folder.
    pub skin: Option<String>,
    /// Directory containing skin folders; the working directory when unset.
    pub input: Option<PathBuf>,
    /// Where the generated archives land.
    pub output: PathBuf,
    /// Staging directory, recreated per build.
    pub temp: PathBuf,
    /// Comment lines written before the first section of every generated
    /// skin.ini. Owned by the caller, not by the resolution engine.
    pub watermark: Vec<String>,
    /// Open each generated archive with the OS so osu! imports it.
    pub auto_execute: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            skin: None,
            input: None,
            output: PathBuf::from("output"),
            temp: PathBuf::from("_temp"),
            watermark: Vec::new(),
            auto_execute: false,
        }
    }
}

/// Runs the whole pipeline for one skin: load the five sources, resolve
/// every variant, stage the skin's assets once, then write one `.osk`
/// per variant into the output directory.
pub fn build_skin(options: &BuildOptions) -> Result<(), SplitError> {
    let Some(skin) = options.skin.as_deref() else {
        return Err(SplitError::UnsetSkin);
    };
    let skin_path = match &options.input {
        Some(input) => input.join(skin),
        None => PathBuf::from(skin),
    };
    if !skin_path.is_dir() {
        return Err(SplitError::SkinNotFound(skin_path));
    }

    // Archives are imported straight out of the staging area when
    // auto-executing, so they do not clutter the real output directory.
    let output_path = if options.auto_execute {
        options.temp.join("output")
    } else {
        options.output.clone()
    };

    if skin_path.join(SKIN_FILE).is_file() {
        warn!("default skin.ini exists in the skin directory; it will be ignored");
    }

    let sources = Sources::load(&skin_path.join(SPLITTER_DIR))?;
    let configs = resolve_variants(&sources)?;

    // Reset the staging directory and lay the skin's assets down once;
    // only skin.ini changes between variants.
    let temp_skin = options.temp.join("skin");
    if options.temp.exists() {
        fs::remove_dir_all(&options.temp).map_err(|e| SplitError::io(&options.temp, e))?;
    }
    copy_tree(&skin_path, &temp_skin)?;
    fs::create_dir_all(&output_path).map_err(|e| SplitError::io(&output_path, e))?;

    for config in &configs {
        let variant_name = sanitize_filename(&config.name);
        config
            .ini
            .write_file(&temp_skin.join(SKIN_FILE), &config.renames, &options.watermark)?;

        let archive = output_path.join(format!("{variant_name}.{OSK_EXTENSION}"));
        write_osk(&temp_skin, &archive)?;

        if options.auto_execute {
            open_archive(&archive)?;
        }
        info!("{variant_name} done");
    }

    if options.auto_execute {
        // Give the importer time to read the archives before the staging
        // directory disappears underneath it.
        thread::sleep(Duration::from_secs(configs.len() as u64 * 2 / 3));
    }
    fs::remove_dir_all(&options.temp).map_err(|e| SplitError::io(&options.temp, e))?;
    Ok(())
}

/// Strips characters Windows refuses in file names, plus the trailing
/// dot/space forms Explorer cannot create.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .collect();
    cleaned.trim_matches(['.', ' ']).trim().to_string()
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), SplitError> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| SplitError::io(src, e.into()))?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| SplitError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| SplitError::io(&target, e))?;
        }
    }
    Ok(())
}

/// Zips the staged tree into `archive`. The `.osk` distribution format
/// is a plain zip under a different extension; osu! imports it on open.
fn write_osk(staged: &Path, archive: &Path) -> Result<(), SplitError> {
    let file = fs::File::create(archive).map_err(|e| SplitError::io(archive, e))?;
    let mut writer = ZipWriter::new(io::BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    // Sorted walk keeps archives byte-stable across runs.
    for entry in WalkDir::new(staged).sort_by_file_name() {
        let entry = entry.map_err(|e| SplitError::io(staged, e.into()))?;
        let Ok(rel) = entry.path().strip_prefix(staged) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut source =
                fs::File::open(entry.path()).map_err(|e| SplitError::io(entry.path(), e))?;
            io::copy(&mut source, &mut writer).map_err(|e| SplitError::io(entry.path(), e))?;
        }
    }
    let mut inner = writer.finish()?;
    inner.flush().map_err(|e| SplitError::io(archive, e))?;
    Ok(())
}

#[cfg(target_os = "windows")]
fn open_archive(path: &Path) -> Result<(), SplitError> {
    Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| SplitError::io(path, e))
}

#[cfg(target_os = "macos")]
fn open_archive(path: &Path) -> Result<(), SplitError> {
    Command::new("open")
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| SplitError::io(path, e))
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_archive(path: &Path) -> Result<(), SplitError> {
    Command::new("xdg-open")
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| SplitError::io(path, e))
}
