//! Advance widths of the built-in Helvetica-Bold face.

use crate::encoding::WIN_ANSI_ENCODING;
use lazy_static::lazy_static;

/// Width used for codes the AFM does not list.
const FALLBACK_WIDTH: u16 = 556;

/// Printable ASCII, 32 through 126, in 1/1000 em.
const ASCII_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// WinAnsi codes 128 through 255.
const HIGH_WIDTHS: [u16; 128] = [
    // 0x80
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    // 0x90
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    // 0xA0
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xB0
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xC0
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xD0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xE0
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xF0
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

lazy_static! {
    static ref WIDTHS: [u16; 256] = {
        let mut widths = [0u16; 256];
        widths[32..127].copy_from_slice(&ASCII_WIDTHS);
        widths[128..].copy_from_slice(&HIGH_WIDTHS);
        widths
    };
}

/// Width of a single WinAnsi code in 1/1000 em.
pub fn code_width(code: u8) -> u16 {
    match WIDTHS[code as usize] {
        0 => FALLBACK_WIDTH,
        w => w,
    }
}

/// Width of already-encoded WinAnsi bytes, in 1/1000 em.
pub fn encoded_width(bytes: &[u8]) -> f64 {
    bytes.iter().map(|&b| code_width(b) as f64).sum()
}

/// Width of `text` set in Helvetica-Bold at `size_pt`, in points.
pub fn helvetica_bold_width(text: &str, size_pt: f64) -> f64 {
    let encoded = WIN_ANSI_ENCODING.encode_string(text);
    encoded_width(&encoded) * size_pt / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(' ', 278)]
    #[case('A', 722)]
    #[case('W', 944)]
    #[case('i', 278)]
    #[case('m', 889)]
    #[case('z', 500)]
    #[case('~', 584)]
    #[case('0', 556)]
    #[case('@', 975)]
    fn test_ascii_widths(#[case] ch: char, #[case] expected: u16) {
        assert_eq!(code_width(ch as u8), expected);
    }

    #[test]
    fn test_latin1_widths() {
        // é uses the width of e, Æ is a full em
        assert_eq!(code_width(0xE9), 556);
        assert_eq!(code_width(0xC6), 1000);
        assert_eq!(code_width(151), 1000);
    }

    #[test]
    fn test_string_width() {
        // "AV" = 722 + 667 at 10pt
        assert!((helvetica_bold_width("AV", 10.0) - 13.89).abs() < 1e-9);
        assert_eq!(helvetica_bold_width("", 10.0), 0.0);
    }

    #[test]
    fn test_transliterated_width_matches_ascii() {
        assert_eq!(
            helvetica_bold_width("Łódź", 12.0),
            helvetica_bold_width("Lódz", 12.0)
        );
    }
}
