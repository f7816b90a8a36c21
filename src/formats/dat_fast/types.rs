//! Type codes stored in each record and the filename extensions they imply.

/// Code for entries whose name already carries any extension it needs
pub const CODE_NONE: u16 = 32;

/// Sound effects. Their names keep a literal `.snd` extension.
pub const CODE_SOUND: u16 = 8;

const SOUND_EXTENSION: &str = ".snd";

pub struct TypeEntry {
    pub code: u16,
    /// Appended to the stored name on parse, stripped again on generate
    pub extension: &'static str,
    pub file_type: Option<&'static str>,
}

pub const TYPE_TABLE: &[TypeEntry] = &[
    TypeEntry { code: 0, extension: ".mif", file_type: Some("map/fast-info") },
    TypeEntry { code: 1, extension: ".mbg", file_type: Some("map/fast-bg") },
    TypeEntry { code: 2, extension: ".mfg", file_type: Some("map/fast-fg") },
    TypeEntry { code: 3, extension: ".tbg", file_type: Some("tileset/fast-4bpp-bg") },
    TypeEntry { code: 4, extension: ".tfg", file_type: Some("tileset/fast-4bpp-fg") },
    TypeEntry { code: 5, extension: ".tbn", file_type: Some("tileset/fast-4bpp-bonus") },
    TypeEntry { code: 6, extension: ".sgl", file_type: Some("data/fast-sprite-list") },
    TypeEntry { code: 7, extension: ".msp", file_type: Some("map/fast-sprites") },
    TypeEntry { code: CODE_SOUND, extension: "", file_type: Some("sound/inverse-pcspeaker") },
    TypeEntry { code: 12, extension: ".pbg", file_type: Some("data/fast-tileprops-bg") },
    TypeEntry { code: 13, extension: ".pfg", file_type: Some("data/fast-tileprops-fg") },
    TypeEntry { code: 14, extension: ".pal", file_type: Some("palette/ega-16") },
    TypeEntry { code: 16, extension: ".pbn", file_type: Some("data/fast-tileprops-bonus") },
    TypeEntry { code: 64, extension: ".spr", file_type: Some("image/fast-sprite") },
];

/// Extension and semantic type for a stored type code
///
/// [`CODE_NONE`] and unknown codes add nothing.
pub fn lookup_code(code: u16) -> (&'static str, Option<&'static str>) {
    TYPE_TABLE
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| (entry.extension, entry.file_type))
        .unwrap_or(("", None))
}

/// Type code and stored name for a member filename
///
/// Matches the last four characters case-insensitively. `.snd` wins over the
/// table and keeps its extension; a table match strips it.
pub fn code_for_name(name: &str) -> (u16, &str) {
    let Some(split) = name.len().checked_sub(4) else {
        return (CODE_NONE, name);
    };
    if !name.is_char_boundary(split) {
        return (CODE_NONE, name);
    }
    let (stem, extension) = name.split_at(split);

    if extension.eq_ignore_ascii_case(SOUND_EXTENSION) {
        return (CODE_SOUND, name);
    }

    TYPE_TABLE
        .iter()
        .filter(|entry| !entry.extension.is_empty())
        .find(|entry| entry.extension.eq_ignore_ascii_case(extension))
        .map(|entry| (entry.code, stem))
        .unwrap_or((CODE_NONE, name))
}
