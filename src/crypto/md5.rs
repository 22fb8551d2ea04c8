//! MD5 message digest (RFC 1321)
//!
//! The Standard Security Handler hashes with MD5 at every step of key
//! derivation, so the round layout below must stay bit-exact.

use byteorder::{ByteOrder, LittleEndian};

/// Digest output length in bytes
pub const DIGEST_LENGTH: usize = 16;

const BLOCK_LENGTH: usize = 64;

const INITIAL_STATE: [u32; 4] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476];

/// Per-round left rotation amounts
const SHIFTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Per-round additive constants, floor(abs(sin(i + 1)) * 2^32)
const CONSTANTS: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Incremental MD5 context
///
/// Owns its accumulators for the lifetime of one digest computation.
#[derive(Clone)]
pub struct Md5 {
    state: [u32; 4],
    buffer: [u8; BLOCK_LENGTH],
    buffered: usize,
    length: u64,
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}

impl Md5 {
    /// Create a fresh context
    pub fn new() -> Self {
        Self {
            state: INITIAL_STATE,
            buffer: [0; BLOCK_LENGTH],
            buffered: 0,
            length: 0,
        }
    }

    /// Absorb more input
    pub fn update(&mut self, mut data: &[u8]) -> &mut Self {
        self.length = self.length.wrapping_add(data.len() as u64);

        if self.buffered > 0 {
            let take = (BLOCK_LENGTH - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];

            if self.buffered < BLOCK_LENGTH {
                return self;
            }
            let block = self.buffer;
            self.compress(&block);
            self.buffered = 0;
        }

        let mut blocks = data.chunks_exact(BLOCK_LENGTH);
        for block in &mut blocks {
            self.compress(block);
        }

        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffered = rest.len();
        self
    }

    /// Pad the message and produce the 16-byte digest
    pub fn finalize(mut self) -> [u8; DIGEST_LENGTH] {
        let bit_length = self.length.wrapping_mul(8);

        // 0x80 then zeros up to 56 mod 64, then the bit length
        let pad_len = if self.buffered < 56 {
            56 - self.buffered
        } else {
            120 - self.buffered
        };
        let mut padding = [0u8; BLOCK_LENGTH + 8];
        padding[0] = 0x80;
        LittleEndian::write_u64(&mut padding[pad_len..pad_len + 8], bit_length);

        // update() would count the padding as message length
        let saved_length = self.length;
        self.update(&padding[..pad_len + 8]);
        self.length = saved_length;
        debug_assert_eq!(self.buffered, 0);

        let mut out = [0u8; DIGEST_LENGTH];
        LittleEndian::write_u32_into(&self.state, &mut out);
        out
    }

    fn compress(&mut self, block: &[u8]) {
        let mut words = [0u32; 16];
        LittleEndian::read_u32_into(block, &mut words);

        let [mut a, mut b, mut c, mut d] = self.state;

        for i in 0..64 {
            let (f, g) = match i {
                0..=15 => ((b & c) | (!b & d), i),
                16..=31 => ((b & d) | (c & !d), (5 * i + 1) % 16),
                32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };

            let f = f
                .wrapping_add(a)
                .wrapping_add(CONSTANTS[i])
                .wrapping_add(words[g]);
            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(f.rotate_left(SHIFTS[i]));
        }

        self.state[0] = self.state[0].wrapping_add(a);
        self.state[1] = self.state[1].wrapping_add(b);
        self.state[2] = self.state[2].wrapping_add(c);
        self.state[3] = self.state[3].wrapping_add(d);
    }
}

/// One-shot MD5 of `data`
pub fn digest(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher.finalize()
}
