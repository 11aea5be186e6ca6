use lazy_static::lazy_static;
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Encoding {
    name: String,
    unicode_to_code: BTreeMap<char, u8>,
}

impl Encoding {
    /// The name of the encoding, as used in the font object.
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Convert a Rust string to a vector of bytes in the encoding, converting
    /// unsupported characters to an ASCII approximation.
    ///
    /// String delimiters are escaped by `pdf_writer::Str`, so the bytes are
    /// returned unescaped.
    pub fn encode_string(&self, text: &str) -> Vec<u8> {
        let mut result = Vec::with_capacity(text.len());
        for ch in text.chars() {
            match self.unicode_to_code.get(&ch).cloned() {
                Some(code) => result.push(code),
                None => {
                    // When character is not found in the encoding, attempt to convert
                    // from unicode to ASCII characters (between 1-127)
                    match deunicode::deunicode_char(ch) {
                        Some(ascii) if !ascii.is_empty() => result.extend(
                            ascii
                                .chars()
                                .map(|c| self.unicode_to_code.get(&c).cloned().unwrap_or(b'?')),
                        ),
                        _ => result.push(b'?'),
                    }
                }
            }
        }
        result
    }
}

lazy_static! {
    pub static ref WIN_ANSI_ENCODING: Encoding = {
        let mut codes = BTreeMap::new();
        // ISO-8859-1 is identical to Windows-1252 except for the code points
        // 128-159 (0x80-0x9F), which Windows-1252 assigns to punctuation and
        // business symbols.

        // Initialize codes as matching ISO-8859-1
        for code in 32..=255u8 {
            codes.insert(code as char, code);
        }
        for code in 127..160u8 {
            codes.remove(&(code as char));
        }

        // Overwrite Windows-1252 specific characters
        codes.insert('€', 128);
        codes.insert('‚', 130);
        codes.insert('ƒ', 131);
        codes.insert('„', 132);
        codes.insert('…', 133);
        codes.insert('†', 134);
        codes.insert('‡', 135);
        codes.insert('ˆ', 136);
        codes.insert('‰', 137);
        codes.insert('Š', 138);
        codes.insert('‹', 139);
        codes.insert('Œ', 140);
        codes.insert('Ž', 142);
        codes.insert('‘', 145);
        codes.insert('’', 146);
        codes.insert('“', 147);
        codes.insert('”', 148);
        codes.insert('•', 149);
        codes.insert('–', 150);
        codes.insert('—', 151);
        codes.insert('˜', 152);
        codes.insert('™', 153);
        codes.insert('š', 154);
        codes.insert('›', 155);
        codes.insert('œ', 156);
        codes.insert('ž', 158);
        codes.insert('Ÿ', 159);
        Encoding {
            name: "WinAnsiEncoding".to_string(),
            unicode_to_code: codes
        }
    };
}
