use crate::error::SplitError;
use crate::ini::{DEFAULT_SECTION, SkinIni};
use crate::keymode::{Keymode, MANIA_HEADER};
use crate::sources::Sources;
use log::debug;

/// Variant listing in the authoring skin source: id -> display name.
/// Never part of a derived document.
pub const VARIANTS_SECTION: &str = "Variants";

/// Tool-metadata section of the authoring skin source; stripped from
/// every derived document.
pub const TOOL_SECTION: &str = "SkinSplitter";

const GENERAL_SECTION: &str = "General";
const NAME_OPTION: &str = "Name";
const KEYS_OPTION: &str = "Keys";
const NOTESET_OPTION: &str = "NoteSet";
const NOTE_PREFIX: &str = "Note";
const NOTE_IMAGE: &str = "NoteImage";

// Image properties read off a note type, paired with the suffix they are
// emitted under per note index (NoteImage3, NoteImage3H, ...).
const NOTE_PROPERTIES: [(&str, &str); 4] = [
    ("NoteImage", ""),
    ("NoteImageH", "H"),
    ("NoteImageL", "L"),
    ("NoteImageT", "T"),
];

/// One fully resolved variant: a self-contained document plus the header
/// renames the serializer applies. Every synthesized `Mania<N>` section
/// is listed there so it is written under the shared `[Mania]` header.
#[derive(Debug, Clone)]
pub struct DerivedConfig {
    /// Display name of the variant (also `General.Name` in the document).
    pub name: String,
    pub ini: SkinIni,
    pub renames: Vec<(String, String)>,
}

/// Expands the authoring sources into one derived config per declared
/// variant, in declaration order.
///
/// Resolution is pure: no I/O, no mutation of `sources`, deterministic
/// output. A structural authoring error aborts the whole batch.
pub fn resolve_variants(sources: &Sources) -> Result<Vec<DerivedConfig>, SplitError> {
    let variants: Vec<(String, String)> = sources
        .skin
        .section(VARIANTS_SECTION)
        .ok_or_else(|| SplitError::SectionNotFound(VARIANTS_SECTION.to_string()))?
        .iter()
        .map(|(id, display)| (id.clone(), display.clone()))
        .collect();

    // Base every variant builds from: the skin source minus the variant
    // listing and the tool-metadata section.
    let mut base = SkinIni::new();
    base.overlay(&sources.skin);
    base.remove_section(VARIANTS_SECTION)?;
    if base.has_section(TOOL_SECTION) {
        base.remove_section(TOOL_SECTION)?;
    }

    let mut derived = Vec::with_capacity(variants.len());
    for (variant, display_name) in &variants {
        // Each working copy is an independent deep value; mutating it can
        // never reach a sibling or the loaded sources.
        let mut config = SkinIni::new();
        config.overlay(&base);
        config.set(GENERAL_SECTION, NAME_OPTION, display_name);

        let noteset = sources
            .variants
            .get_with_default(variant, NOTESET_OPTION)
            .unwrap_or(DEFAULT_SECTION)
            .to_string();

        let mut renames = Vec::new();
        for keymode in Keymode::ALL {
            let Some(style) = sources
                .variants
                .get_with_default_caseless(variant, keymode.identifier())
            else {
                // Keymode not assigned for this variant; nothing is emitted.
                continue;
            };
            let style = style.to_string();
            debug!("variant [{variant}]: {} -> style [{style}]", keymode.identifier());

            compose_style(&mut config, sources, variant, keymode, &style, &noteset)?;
            renames.push((keymode.section_name(), MANIA_HEADER.to_string()));
        }

        derived.push(DerivedConfig {
            name: display_name.clone(),
            ini: config,
            renames,
        });
    }

    Ok(derived)
}

/// Synthesizes one keymode section on the working copy: validates the
/// style's declared key count against the keymode, overlays the styles
/// source's defaults under the style's own options, then resolves the
/// per-note image bindings.
fn compose_style(
    config: &mut SkinIni,
    sources: &Sources,
    variant: &str,
    keymode: Keymode,
    style: &str,
    noteset: &str,
) -> Result<(), SplitError> {
    let expected = keymode.key_count();
    let raw_keys = sources
        .styles
        .get_with_default(style, KEYS_OPTION)
        .ok_or_else(|| SplitError::MissingKeys(style.to_string()))?;
    let actual: u32 = raw_keys
        .trim()
        .parse()
        .map_err(|_| SplitError::InvalidKeys {
            style: style.to_string(),
            value: raw_keys.to_string(),
        })?;
    if actual != expected {
        return Err(SplitError::StructuralMismatch {
            variant: variant.to_string(),
            keymode: keymode.identifier(),
            style: style.to_string(),
            expected,
            actual,
        });
    }
    if !sources.styles.has_section(style) {
        return Err(SplitError::UnknownStyle {
            variant: variant.to_string(),
            keymode: keymode.identifier(),
            style: style.to_string(),
        });
    }

    let section = keymode.section_name();
    config.add_section(&section)?;
    config.overlay_section(&section, &sources.styles, DEFAULT_SECTION);
    config.overlay_section(&section, &sources.styles, style);

    resolve_notes(config, sources, &section, style, noteset, expected)
}

/// Maps every raw per-note type token through the noteset alias layer and
/// replaces it with the note type's image bindings. The raw `Note<i>`
/// token is an authoring-only field and never reaches the output.
fn resolve_notes(
    config: &mut SkinIni,
    sources: &Sources,
    section: &str,
    style: &str,
    noteset: &str,
    key_count: u32,
) -> Result<(), SplitError> {
    for index in 0..key_count {
        let note_option = format!("{NOTE_PREFIX}{index}");
        let raw_type = sources
            .styles
            .get_with_default(style, &note_option)
            .ok_or_else(|| SplitError::MissingNote {
                style: style.to_string(),
                index,
            })?;

        // Alias through the variant's noteset; a token with no alias
        // entry passes through unchanged.
        let note_type = sources
            .notesets
            .get_with_default(noteset, raw_type)
            .unwrap_or(raw_type);

        config.remove_option(section, &note_option)?;

        for (property, suffix) in NOTE_PROPERTIES {
            let Some(value) = sources.notes.get_with_default(note_type, property) else {
                // Property not defined for this note type or the default;
                // nothing is inherited, nothing is emitted.
                continue;
            };
            let value = value.to_string();
            config.set(section, &format!("{NOTE_IMAGE}{index}{suffix}"), &value);
        }
    }
    Ok(())
}
