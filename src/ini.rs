use crate::error::SplitError;
use indexmap::IndexMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Reserved fallback section name. Any source may carry a `[Default]`
/// section; the three-tier lookup consults it before giving up, and
/// calling code must never treat it as an ordinary named entity.
pub const DEFAULT_SECTION: &str = "Default";

const COMMENT_PREFIXES: [&str; 3] = ["//", "#", ";"];

// Ordered by write preference: serialization always emits the first one.
const DELIMITERS: [&str; 3] = [": ", ":", "="];

/// Ordered section -> option -> value store for the skin.ini dialect.
///
/// Option names are case-sensitive and case-preserved. Insertion order of
/// sections and of options within a section is preserved all the way to
/// serialization.
#[derive(Debug, Clone, Default)]
pub struct SkinIni {
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl SkinIni {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, SplitError> {
        let mut ini = Self::default();
        let mut current = String::new();

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || COMMENT_PREFIXES.iter().any(|p| line.starts_with(p)) {
                continue;
            }

            // Section header: [SectionName]
            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                current = line[1..line.len() - 1].trim().to_string();
                ini.add_section(&current)?;
                continue;
            }

            let Some((key, value)) = split_option(line) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            ini.sections
                .entry(current.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }

        Ok(ini)
    }

    pub fn parse_file(path: &Path) -> Result<Self, SplitError> {
        let text = fs::read_to_string(path).map_err(|e| SplitError::io(path, e))?;
        Self::parse(&text)
    }

    /// Exact lookup, no fallback of any kind.
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(option)
            .map(String::as_str)
    }

    /// Three-tier lookup: the section's own option, else the same option
    /// in this store's [`DEFAULT_SECTION`]. The caller supplies the third
    /// tier with `unwrap_or` (or leaves absence as `None`).
    pub fn get_with_default(&self, section: &str, option: &str) -> Option<&str> {
        self.get(section, option)
            .or_else(|| self.get(DEFAULT_SECTION, option))
    }

    /// Same tiers as [`get_with_default`], but the option name is matched
    /// ignoring ASCII case. Used only for keymode assignments, where the
    /// observed authoring configs mix capitalizations.
    ///
    /// [`get_with_default`]: SkinIni::get_with_default
    pub fn get_with_default_caseless(&self, section: &str, option: &str) -> Option<&str> {
        self.get_caseless(section, option)
            .or_else(|| self.get_caseless(DEFAULT_SECTION, option))
    }

    fn get_caseless(&self, section: &str, option: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(option))
            .map(|(_, value)| value.as_str())
    }

    /// Insert or overwrite. Creates the section when missing; an
    /// overwritten option keeps its position, a new one is appended.
    pub fn set(&mut self, section: &str, option: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(option.to_string(), value.to_string());
    }

    pub fn add_section(&mut self, name: &str) -> Result<(), SplitError> {
        if self.sections.contains_key(name) {
            return Err(SplitError::DuplicateSection(name.to_string()));
        }
        self.sections.insert(name.to_string(), IndexMap::new());
        Ok(())
    }

    pub fn remove_section(&mut self, name: &str) -> Result<(), SplitError> {
        self.sections
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| SplitError::SectionNotFound(name.to_string()))
    }

    pub fn remove_option(&mut self, section: &str, option: &str) -> Result<(), SplitError> {
        let options = self
            .sections
            .get_mut(section)
            .ok_or_else(|| SplitError::SectionNotFound(section.to_string()))?;
        options
            .shift_remove(option)
            .map(|_| ())
            .ok_or_else(|| SplitError::OptionNotFound {
                section: section.to_string(),
                option: option.to_string(),
            })
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.sections.get(name)
    }

    /// Right-biased merge of every section of `other` into this store:
    /// existing options are overwritten in place, new ones appended in
    /// the source's order. "Defaults under, specifics over" composition
    /// is built from this.
    pub fn overlay(&mut self, other: &SkinIni) {
        for (name, options) in &other.sections {
            let dst = self.sections.entry(name.clone()).or_default();
            for (key, value) in options {
                dst.insert(key.clone(), value.clone());
            }
        }
    }

    /// Overlays one named section of `other` into the section `section`
    /// of this store. A missing source section overlays nothing.
    pub fn overlay_section(&mut self, section: &str, other: &SkinIni, other_section: &str) {
        let Some(options) = other.sections.get(other_section) else {
            return;
        };
        let dst = self.sections.entry(section.to_string()).or_default();
        for (key, value) in options {
            dst.insert(key.clone(), value.clone());
        }
    }

    /// Serializes the store. `renames` maps internal section names to the
    /// header they are emitted under; several sections may legitimately
    /// map to one shared header and are written as repeated same-named
    /// headers, in store order. `watermark` lines are emitted as comments
    /// before the first header.
    pub fn write_string(&self, renames: &[(String, String)], watermark: &[String]) -> String {
        let mut out = String::new();
        for line in watermark {
            let _ = writeln!(out, "// {line}");
        }
        if !watermark.is_empty() {
            out.push('\n');
        }

        for (name, options) in &self.sections {
            let header = renames
                .iter()
                .find(|(internal, _)| internal == name)
                .map(|(_, shared)| shared.as_str())
                .unwrap_or(name);
            let _ = writeln!(out, "[{header}]");
            for (key, value) in options {
                let _ = writeln!(out, "{key}{}{value}", DELIMITERS[0]);
            }
            out.push('\n');
        }
        out
    }

    pub fn write_file(
        &self,
        path: &Path,
        renames: &[(String, String)],
        watermark: &[String],
    ) -> Result<(), SplitError> {
        fs::write(path, self.write_string(renames, watermark))
            .map_err(|e| SplitError::io(path, e))
    }
}

/// Splits an option line at the earliest delimiter occurrence; at equal
/// positions the longer `": "` form wins over bare `":"`.
fn split_option(line: &str) -> Option<(&str, &str)> {
    let mut found: Option<(usize, usize)> = None;
    for delimiter in DELIMITERS {
        if let Some(index) = line.find(delimiter) {
            match found {
                Some((at, _)) if at <= index => {}
                _ => found = Some((index, delimiter.len())),
            }
        }
    }
    let (index, len) = found?;
    Some((line[..index].trim_end(), line[index + len..].trim_start()))
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SECTION, SkinIni};
    use crate::error::SplitError;

    const SAMPLE: &str = "\
// generator comment
[General]
Name: Example
Author=someone
Version: 2.5

# hash comment
; semicolon comment
[Colours]
Combo1 : 255,0,0
";

    #[test]
    fn parses_comments_and_all_delimiters() {
        let ini = SkinIni::parse(SAMPLE).unwrap();
        assert_eq!(ini.get("General", "Name"), Some("Example"));
        assert_eq!(ini.get("General", "Author"), Some("someone"));
        assert_eq!(ini.get("General", "Version"), Some("2.5"));
        assert_eq!(ini.get("Colours", "Combo1"), Some("255,0,0"));
    }

    #[test]
    fn option_names_are_case_sensitive_and_preserved() {
        let ini = SkinIni::parse("[S]\nKey: a\nkey: b\n").unwrap();
        assert_eq!(ini.get("S", "Key"), Some("a"));
        assert_eq!(ini.get("S", "key"), Some("b"));
        assert_eq!(ini.get("S", "KEY"), None);
    }

    #[test]
    fn colon_space_wins_over_bare_colon_at_same_position() {
        let ini = SkinIni::parse("[S]\nPath: C:/osu\n").unwrap();
        assert_eq!(ini.get("S", "Path"), Some("C:/osu"));
    }

    #[test]
    fn earliest_delimiter_wins() {
        let ini = SkinIni::parse("[S]\na=b:c\n").unwrap();
        assert_eq!(ini.get("S", "a"), Some("b:c"));
    }

    #[test]
    fn duplicate_section_in_input_is_an_error() {
        let err = SkinIni::parse("[S]\n[S]\n").unwrap_err();
        assert!(matches!(err, SplitError::DuplicateSection(name) if name == "S"));
    }

    #[test]
    fn get_with_default_consults_all_three_tiers() {
        let ini = SkinIni::parse(
            "[Default]\nColour: red\nSize: 10\n[Style]\nColour: blue\n",
        )
        .unwrap();
        // Tier 1: own option.
        assert_eq!(ini.get_with_default("Style", "Colour"), Some("blue"));
        // Tier 2: the Default section.
        assert_eq!(ini.get_with_default("Style", "Size"), Some("10"));
        // Tier 3: caller fallback.
        assert_eq!(
            ini.get_with_default("Style", "Missing").unwrap_or("fb"),
            "fb"
        );
        // A missing section still falls through to Default.
        assert_eq!(ini.get_with_default("NoSuch", "Size"), Some("10"));
    }

    #[test]
    fn caseless_lookup_matches_mixed_capitalization() {
        let ini = SkinIni::parse("[Default]\nkeys16: S16\n[V]\nkeys14: S14\n").unwrap();
        assert_eq!(ini.get_with_default_caseless("V", "Keys14"), Some("S14"));
        assert_eq!(ini.get_with_default_caseless("V", "Keys16"), Some("S16"));
        assert_eq!(ini.get_with_default_caseless("V", "Keys4"), None);
    }

    #[test]
    fn overlay_is_right_biased_and_preserves_left_only_options() {
        let mut a = SkinIni::parse("[S]\nx: 1\ny: 2\n").unwrap();
        let b = SkinIni::parse("[S]\ny: 9\nz: 3\n[T]\nw: 4\n").unwrap();
        a.overlay(&b);
        assert_eq!(a.get("S", "x"), Some("1"));
        assert_eq!(a.get("S", "y"), Some("9"));
        assert_eq!(a.get("S", "z"), Some("3"));
        assert_eq!(a.get("T", "w"), Some("4"));
        // Overwrite kept y in place, z was appended.
        let keys: Vec<&str> = a.section("S").unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["x", "y", "z"]);
    }

    #[test]
    fn add_section_rejects_duplicates() {
        let mut ini = SkinIni::new();
        ini.add_section("S").unwrap();
        let err = ini.add_section("S").unwrap_err();
        assert!(matches!(err, SplitError::DuplicateSection(_)));
    }

    #[test]
    fn removals_of_missing_entries_are_typed_errors() {
        let mut ini = SkinIni::parse("[S]\nx: 1\n").unwrap();
        assert!(matches!(
            ini.remove_section("T"),
            Err(SplitError::SectionNotFound(_))
        ));
        assert!(matches!(
            ini.remove_option("S", "y"),
            Err(SplitError::OptionNotFound { .. })
        ));
        assert!(matches!(
            ini.remove_option("T", "x"),
            Err(SplitError::SectionNotFound(_))
        ));
        ini.remove_option("S", "x").unwrap();
        ini.remove_section("S").unwrap();
        assert!(!ini.has_section("S"));
    }

    #[test]
    fn set_creates_sections_and_keeps_overwrite_position() {
        let mut ini = SkinIni::new();
        ini.set("General", "Name", "a");
        ini.set("General", "Author", "b");
        ini.set("General", "Name", "c");
        assert_eq!(ini.get("General", "Name"), Some("c"));
        let keys: Vec<&str> = ini
            .section("General")
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["Name", "Author"]);
    }

    #[test]
    fn write_emits_watermark_and_sections_in_order() {
        let ini = SkinIni::parse("[General]\nName: x\n\n[Colours]\nCombo1: 1,2,3\n").unwrap();
        let text = ini.write_string(&[], &["made by tool".to_string()]);
        assert_eq!(
            text,
            "// made by tool\n\n[General]\nName: x\n\n[Colours]\nCombo1: 1,2,3\n\n"
        );
    }

    #[test]
    fn write_canonicalizes_renamed_headers_and_repeats_them() {
        let mut ini = SkinIni::new();
        ini.set("Mania4", "Keys", "4");
        ini.set("Mania7", "Keys", "7");
        let renames = vec![
            ("Mania4".to_string(), "Mania".to_string()),
            ("Mania7".to_string(), "Mania".to_string()),
        ];
        let text = ini.write_string(&renames, &[]);
        assert_eq!(text, "[Mania]\nKeys: 4\n\n[Mania]\nKeys: 7\n\n");
        assert_eq!(text.matches("[Mania]").count(), 2);
    }

    #[test]
    fn parse_then_write_is_stable() {
        let ini = SkinIni::parse(SAMPLE).unwrap();
        let once = ini.write_string(&[], &[]);
        let again = SkinIni::parse(&once).unwrap().write_string(&[], &[]);
        assert_eq!(once, again);
    }

    #[test]
    fn default_section_is_an_ordinary_store_entry() {
        let mut ini = SkinIni::new();
        ini.set(DEFAULT_SECTION, "x", "1");
        assert_eq!(ini.get(DEFAULT_SECTION, "x"), Some("1"));
    }
}
