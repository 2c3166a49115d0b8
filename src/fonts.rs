//! Font registration and measurement for contract rendering.
//!
//! Contracts render in Times (regular + bold). By default the two fonts are
//! written as non-embedded Type1 base fonts with a built-in WinAnsi width
//! table, which keeps composition fully deterministic. When the
//! `PPPK_KONTRAK_FONTS` environment variable points at one or more font
//! directories, a matching TrueType face (Times New Roman or a metric
//! substitute) is embedded instead as a subsetted Type0/Identity-H font.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::OnceLock;

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use ttf_parser::Face;

pub(crate) struct FontEntry {
    pub(crate) pdf_name: &'static str,
    pub(crate) font_ref: Ref,
    widths_1000: Vec<f32>,
    char_to_gid: Option<HashMap<char, u16>>,
    char_widths_1000: Option<HashMap<char, f32>>,
}

impl FontEntry {
    /// Width of a single character in 1000-units. Uses the per-char map of
    /// an embedded face when present, otherwise the WinAnsi table.
    fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(ref map) = self.char_widths_1000 {
            if let Some(&w) = map.get(&ch) {
                return w;
            }
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    /// Width of a word (no surrounding spaces) at the given size.
    pub(crate) fn word_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    /// Width of a full string including interior spaces.
    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.word_width(text, font_size)
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }

    /// Encode text for a content-stream show operator: glyph IDs for an
    /// embedded face, WinAnsi bytes otherwise.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match self.char_to_gid {
            Some(ref map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }

    #[cfg(test)]
    pub(crate) fn fixed_width(width_1000: f32) -> FontEntry {
        FontEntry {
            pdf_name: "F1",
            font_ref: Ref::new(1),
            widths_1000: vec![width_1000; 224],
            char_to_gid: None,
            char_widths_1000: None,
        }
    }
}

/// Map a single Unicode char to its WinAnsi (Windows-1252) byte, 0 if
/// unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Inverse mapping, used when building a WinAnsi width table from a face.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// UTF-8 → WinAnsi bytes for PDF string encoding. Unmappable chars are
/// dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Encode text as big-endian 2-byte glyph IDs for CIDFont content streams.
fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Approximate Times widths at 1000 units/em for WinAnsi chars 32..=255.
fn times_widths(bold: bool) -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 250.0,                    // space
            33..=47 => if bold { 389.0 } else { 333.0 }, // punctuation
            48..=57 => 500.0,               // digits
            58..=64 => if bold { 500.0 } else { 444.0 },
            73 | 74 => 333.0,               // I J (narrow uppercase)
            77 | 87 => 889.0,               // M W (wide)
            65..=90 => if bold { 722.0 } else { 667.0 }, // uppercase average
            91..=96 => 333.0,               // brackets etc.
            105 | 106 | 108 => 278.0,       // i j l
            102 | 116 => if bold { 333.0 } else { 278.0 }, // f t
            109 => 778.0,                   // m
            119 => 722.0,                   // w
            97..=122 => if bold { 556.0 } else { 500.0 }, // lowercase average
            _ => 500.0,
        })
        .collect()
}

/// (lowercase family name, bold) → font file path.
type FontLookup = HashMap<(String, bool), PathBuf>;

static FONT_INDEX: OnceLock<FontLookup> = OnceLock::new();

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn is_font_file(path: &std::path::Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf")
    )
}

/// Scan the directories named by PPPK_KONTRAK_FONTS. No system directories
/// are searched: composition stays deterministic unless the deployment
/// explicitly opts in to embedded fonts.
fn scan_font_dirs() -> FontLookup {
    let mut index = FontLookup::new();
    let Ok(val) = std::env::var("PPPK_KONTRAK_FONTS") else {
        return index;
    };
    let t0 = std::time::Instant::now();
    let sep = if cfg!(windows) { ';' } else { ':' };
    let mut stack: Vec<PathBuf> = val
        .split(sep)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();

    let mut files_scanned = 0u32;
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_font_file(&path) {
                files_scanned += 1;
                let Ok(file) = std::fs::File::open(&path) else {
                    continue;
                };
                let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                    continue;
                };
                let Ok(face) = Face::parse(&data, 0) else {
                    continue;
                };
                if let Some(family) = font_family_name(&face) {
                    index
                        .entry((family.to_lowercase(), face.is_bold()))
                        .or_insert(path);
                }
            }
        }
    }

    log::info!(
        "Font scan: {:.1}ms, {} files parsed → {} entries",
        t0.elapsed().as_secs_f64() * 1000.0,
        files_scanned,
        index.len(),
    );
    index
}

fn get_font_index() -> &'static FontLookup {
    FONT_INDEX.get_or_init(scan_font_dirs)
}

// Times New Roman first, metric-compatible substitutes after.
const FAMILY_CANDIDATES: [&str; 3] = ["times new roman", "liberation serif", "tinos"];

fn find_font_file(bold: bool) -> Option<PathBuf> {
    let index = get_font_index();
    FAMILY_CANDIDATES
        .iter()
        .find_map(|family| index.get(&(family.to_string(), bold)))
        .cloned()
}

/// Embed a TrueType face as a subsetted Type0 (Identity-H) font.
/// Returns the WinAnsi width table plus per-char GID and width maps.
#[allow(clippy::type_complexity)]
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_data: &[u8],
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<(Vec<f32>, HashMap<char, u16>, HashMap<char, f32>)> {
    let face = Face::parse(font_data, 0).ok()?;
    let units = face.units_per_em() as f32;

    let widths_1000: Vec<f32> = (32u8..=255u8)
        .map(|byte| {
            face.glyph_index(winansi_to_char(byte))
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0)
        })
        .collect();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut char_widths_1000 = HashMap::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0);
            char_widths_1000.insert(ch, w);
        }
    }

    let subset_data = subsetter::subset(font_data, 0, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed: {e} — embedding full font");
        font_data.to_vec()
    });

    let ps_name = font_family_name(&face)
        .unwrap_or_else(|| "TimesNewRoman".to_string())
        .replace(' ', "");

    let data_ref = alloc();
    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let bb = face.global_bounding_box();
    let descriptor_ref = alloc();
    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(
            bb.x_min as f32 / units * 1000.0,
            bb.y_min as f32 / units * 1000.0,
            bb.x_max as f32 / units * 1000.0,
            bb.y_max as f32 / units * 1000.0,
        ))
        .italic_angle(0.0)
        .ascent(face.ascender() as f32 / units * 1000.0)
        .descent(face.descender() as f32 / units * 1000.0)
        .cap_height(
            face.capital_height()
                .map(|h| h as f32 / units * 1000.0)
                .unwrap_or(700.0),
        )
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = pdf_writer::types::SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    };

    let cid_font_ref = alloc();
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut gid_widths: Vec<(u16, f32)> = char_to_gid
            .iter()
            .filter_map(|(&ch, &new_gid)| char_widths_1000.get(&ch).map(|&w| (new_gid, w)))
            .collect();
        gid_widths.sort_by_key(|&(gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some((widths_1000, char_to_gid, char_widths_1000))
}

/// Register the regular or bold contract font. Embeds a configured TrueType
/// face when one is available, otherwise writes a Type1 base font with the
/// built-in Times width table.
pub(crate) fn register_font(
    pdf: &mut Pdf,
    bold: bool,
    pdf_name: &'static str,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> FontEntry {
    let font_ref = alloc();

    let embedded = find_font_file(bold).and_then(|path| {
        let data = std::fs::read(&path).ok()?;
        let result = embed_truetype(pdf, font_ref, &data, used_chars, alloc);
        if result.is_some() {
            log::debug!("embedded {} from {}", pdf_name, path.display());
        }
        result
    });

    let (widths_1000, char_to_gid, char_widths_1000) = match embedded {
        Some((w, gids, cw)) => (w, Some(gids), Some(cw)),
        None => {
            let base: &[u8] = if bold { b"Times-Bold" } else { b"Times-Roman" };
            pdf.type1_font(font_ref)
                .base_font(Name(base))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (times_widths(bold), None, None)
        }
    };

    FontEntry {
        pdf_name,
        font_ref,
        widths_1000,
        char_to_gid,
        char_widths_1000,
    }
}
