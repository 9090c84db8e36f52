// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Streaming SHA-256 (FIPS 180-4) and the digest type it produces.
//!
//! Data is buffered in 64-byte blocks; every full block is compressed as soon
//! as it is complete, so the state never holds more than one pending block.

use core::fmt;

use heapless::String;
use serde::{Deserialize, Serialize};

/// Digest length in bytes.
pub const DIGEST_SIZE: usize = 32;
const BLOCK_SIZE: usize = 64;

const INITIAL_STATE: [u32; 8] = [
    0x6a09_e667, 0xbb67_ae85, 0x3c6e_f372, 0xa54f_f53a,
    0x510e_527f, 0x9b05_688c, 0x1f83_d9ab, 0x5be0_cd19,
];

const K: [u32; 64] = [
    0x428a_2f98, 0x7137_4491, 0xb5c0_fbcf, 0xe9b5_dba5, 0x3956_c25b, 0x59f1_11f1, 0x923f_82a4, 0xab1c_5ed5,
    0xd807_aa98, 0x1283_5b01, 0x2431_85be, 0x550c_7dc3, 0x72be_5d74, 0x80de_b1fe, 0x9bdc_06a7, 0xc19b_f174,
    0xe49b_69c1, 0xefbe_4786, 0x0fc1_9dc6, 0x240c_a1cc, 0x2de9_2c6f, 0x4a74_84aa, 0x5cb0_a9dc, 0x76f9_88da,
    0x983e_5152, 0xa831_c66d, 0xb003_27c8, 0xbf59_7fc7, 0xc6e0_0bf3, 0xd5a7_9147, 0x06ca_6351, 0x1429_2967,
    0x27b7_0a85, 0x2e1b_2138, 0x4d2c_6dfc, 0x5338_0d13, 0x650a_7354, 0x766a_0abb, 0x81c2_c92e, 0x9272_2c85,
    0xa2bf_e8a1, 0xa81a_664b, 0xc24b_8b70, 0xc76c_51a3, 0xd192_e819, 0xd699_0624, 0xf40e_3585, 0x106a_a070,
    0x19a4_c116, 0x1e37_6c08, 0x2748_774c, 0x34b0_bcb5, 0x391c_0cb3, 0x4ed8_aa4a, 0x5b9c_ca4f, 0x682e_6ff3,
    0x748f_82ee, 0x78a5_636f, 0x84c8_7814, 0x8cc7_0208, 0x90be_fffa, 0xa450_6ceb, 0xbef9_a3f7, 0xc671_78f2,
];

/// SHA-256 hashing state.
#[derive(Clone)]
pub struct Sha256 {
    state: [u32; 8],
    /// Total bytes absorbed so far.
    count: u64,
    buffer: [u8; BLOCK_SIZE],
}

impl Sha256 {
    pub const fn new() -> Self {
        Self {
            state: INITIAL_STATE,
            count: 0,
            buffer: [0; BLOCK_SIZE],
        }
    }

    /// Discard all absorbed data.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn update(&mut self, mut data: &[u8]) {
        let mut pos = (self.count % BLOCK_SIZE as u64) as usize;
        self.count = self.count.wrapping_add(data.len() as u64);

        while !data.is_empty() {
            let take = (BLOCK_SIZE - pos).min(data.len());
            self.buffer[pos..pos + take].copy_from_slice(&data[..take]);
            pos += take;
            data = &data[take..];

            if pos == BLOCK_SIZE {
                compress(&mut self.state, &self.buffer);
                pos = 0;
            }
        }
    }

    pub fn finalize(mut self) -> Digest {
        let bit_len = self.count.wrapping_mul(8);
        let mut pos = (self.count % BLOCK_SIZE as u64) as usize;

        self.buffer[pos] = 0x80;
        pos += 1;

        // No room left for the length: pad this block out and start another.
        if pos > BLOCK_SIZE - 8 {
            self.buffer[pos..].fill(0);
            compress(&mut self.state, &self.buffer);
            pos = 0;
        }

        self.buffer[pos..BLOCK_SIZE - 8].fill(0);
        self.buffer[BLOCK_SIZE - 8..].copy_from_slice(&bit_len.to_be_bytes());
        compress(&mut self.state, &self.buffer);

        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Digest(out)
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot digest of `data`.
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize()
}

fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_SIZE]) {
    let mut w = [0u32; 64];
    for (i, word) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    for i in 16..64 {
        let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
        let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
        w[i] = w[i - 16]
            .wrapping_add(s0)
            .wrapping_add(w[i - 7])
            .wrapping_add(s1);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
    for i in 0..64 {
        let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
        let ch = (e & f) ^ (!e & g);
        let t1 = h
            .wrapping_add(s1)
            .wrapping_add(ch)
            .wrapping_add(K[i])
            .wrapping_add(w[i]);
        let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
        let maj = (a & b) ^ (a & c) ^ (b & c);
        let t2 = s0.wrapping_add(maj);

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.wrapping_add(v);
    }
}

/// A 256-bit SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; DIGEST_SIZE]);

impl Digest {
    /// Parse a 64-character hex literal at compile time.
    ///
    /// Panics (a build error in const context) on malformed input.
    pub const fn from_hex(hex: &str) -> Self {
        let src = hex.as_bytes();
        assert!(src.len() == DIGEST_SIZE * 2, "digest literal must be 64 hex digits");

        let mut out = [0u8; DIGEST_SIZE];
        let mut i = 0;
        while i < DIGEST_SIZE {
            out[i] = (nibble(src[2 * i]) << 4) | nibble(src[2 * i + 1]);
            i += 1;
        }
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Lowercase hex rendering without allocation.
    pub fn to_hex(&self) -> String<{ DIGEST_SIZE * 2 }> {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut s = String::new();
        for byte in self.0 {
            // Capacity is exactly two characters per byte.
            let _ = s.push(HEX[(byte >> 4) as usize] as char);
            let _ = s.push(HEX[(byte & 0x0f) as usize] as char);
        }
        s
    }
}

const fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in digest literal"),
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}
