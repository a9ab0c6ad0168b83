use crate::error::EmulatorError;

/// A loaded cartridge image, mapped unshadowed at $0000-$7FFF (32KB
/// logical, the physical image may be smaller).
pub struct Cartridge {
    data: Vec<u8>,
}

/// Required copyright marker at the start of a well-formed cartridge header.
const COPYRIGHT_MARKER: &[u8] = b"g GCE";

const HEADER_DELIM: u8 = 0x80;

impl Cartridge {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read a byte at the mapped offset (0..32768). Real carts are usually
    /// much smaller than the 32KB logical window; out-of-range reads return
    /// 1, not 0, mirroring real hardware and a handful of titles (Mine
    /// Storm, Polar Rescue) that read past the end of their own image while
    /// drawing vector lists.
    pub fn read(&self, offset: u16) -> u8 {
        let offset = offset as usize;
        self.data.get(offset).copied().unwrap_or(1)
    }

    /// Cartridge ROM is read-only; the caller reports the attempt as an
    /// undefined-access quirk.
    pub fn write(&mut self, _offset: u16, _value: u8) {}

    /// Loosely validates the cartridge header: a `"g GCE"` copyright string
    /// terminated by 0x80, a 16-bit big-endian music pointer, and zero or
    /// more title-line records (`height, width, relY, relX, text..., 0x80`)
    /// ending at a record whose `height` byte is 0.
    ///
    /// `header_len` is `None` only when the header is too short to contain
    /// even the copyright marker and music pointer — a structural failure
    /// with no sensible split point between header and ROM content. A
    /// missing copyright string or unterminated title block is noted via
    /// `has_copyright`/`well_formed` but does not itself prevent splitting
    /// off the header parsed so far (some homebrew roms omit the title
    /// block entirely).
    pub fn validate_header(data: &[u8]) -> HeaderInfo {
        let copyright_end = match data.iter().position(|&b| b == HEADER_DELIM) {
            Some(i) => i,
            None => return HeaderInfo::default(),
        };
        let has_copyright = data[..copyright_end].starts_with(COPYRIGHT_MARKER);
        let mut pos = copyright_end + 1;

        if data.len() < pos + 2 {
            return HeaderInfo {
                has_copyright,
                ..HeaderInfo::default()
            };
        }
        let music_location = u16::from_be_bytes([data[pos], data[pos + 1]]);
        pos += 2;

        let mut titles = Vec::new();
        const MAX_LINES: usize = 10;
        for _ in 0..MAX_LINES {
            if pos >= data.len() {
                break;
            }
            let height = data[pos];
            if height == 0 {
                return HeaderInfo {
                    has_copyright,
                    music_location,
                    titles,
                    well_formed: true,
                    header_len: Some(pos + 1),
                };
            }
            if pos + 4 > data.len() {
                break;
            }
            let width = data[pos + 1];
            let rel_y = data[pos + 2];
            let rel_x = data[pos + 3];
            pos += 4;

            let text_end = match data[pos..].iter().position(|&b| b == HEADER_DELIM) {
                Some(i) => pos + i,
                None => break,
            };
            titles.push(TitleLine {
                height,
                width,
                rel_y,
                rel_x,
                text: data[pos..text_end].to_vec(),
            });
            pos = text_end + 1;
        }

        HeaderInfo {
            has_copyright,
            music_location,
            titles,
            well_formed: false,
            header_len: Some(pos),
        }
    }

    /// The host-facing cartridge load entry point: validates `data`'s
    /// header and constructs a [`Cartridge`] from the bytes remaining
    /// after it. Fails only on a structural header (too short to contain
    /// even the copyright marker and music pointer); a missing copyright
    /// string or malformed title block is tolerated, per
    /// [`Cartridge::validate_header`].
    pub fn load_rom(data: Vec<u8>) -> Result<Self, EmulatorError> {
        let info = Self::validate_header(&data);
        let Some(header_len) = info.header_len else {
            return Err(EmulatorError::InvalidCartridgeHeader {
                detail: "header too short to contain a copyright marker and music pointer"
                    .to_string(),
            });
        };
        Ok(Self::new(data[header_len..].to_vec()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderInfo {
    pub has_copyright: bool,
    pub music_location: u16,
    pub titles: Vec<TitleLine>,
    pub well_formed: bool,
    /// Byte offset where ROM content begins, i.e. how many bytes of
    /// `data` the header itself consumed. `None` signals a structural
    /// failure too severe to locate a split point at all.
    pub header_len: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct TitleLine {
    pub height: u8,
    pub width: u8,
    pub rel_y: u8,
    pub rel_x: u8,
    pub text: Vec<u8>,
}
