//! RC4 encryption/decryption for PDF.
//!
//! RC4 is the stream cipher behind the Standard Security Handler at V=1/R=2.
//! While cryptographically weak by modern standards, 40-bit RC4 is what that
//! handler revision prescribes.
//!
//! PDF Spec: Section 7.6.2 - General Encryption Algorithm

use crate::error::{Error, Result};

/// Simple RC4 cipher implementation.
struct Rc4Cipher {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4Cipher {
    /// Initialize RC4 cipher with a key (key-scheduling algorithm).
    fn new(key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::InvalidKeyLength(0));
        }

        let mut s = [0u8; 256];
        for (i, val) in s.iter_mut().enumerate() {
            *val = i as u8;
        }

        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }

        Ok(Self { s, i: 0, j: 0 })
    }

    /// Generate the next byte of keystream.
    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let k = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[k as usize]
    }

    fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.next_byte();
        }
    }
}

/// Encrypt or decrypt data using RC4.
///
/// RC4 is symmetric, so encryption and decryption are the same operation:
/// `rc4_crypt(key, &rc4_crypt(key, data)?)? == data`.
///
/// # Errors
///
/// Returns [`Error::InvalidKeyLength`] for an empty key.
pub fn rc4_crypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut cipher = Rc4Cipher::new(key)?;
    let mut result = data.to_vec();
    cipher.apply_keystream(&mut result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc4_symmetric() {
        let key = b"testkey";
        let plaintext = b"Hello, World!";

        let ciphertext = rc4_crypt(key, plaintext).unwrap();
        let decrypted = rc4_crypt(key, &ciphertext).unwrap();

        assert_eq!(plaintext, &decrypted[..]);
        assert_ne!(plaintext, &ciphertext[..]);
    }

    #[test]
    fn test_rc4_empty_data() {
        let result = rc4_crypt(b"testkey", b"").unwrap();
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_rc4_empty_key_rejected() {
        let result = rc4_crypt(b"", b"data");
        assert!(matches!(result, Err(Error::InvalidKeyLength(0))));
    }

    #[test]
    fn test_rc4_different_keys() {
        let plaintext = b"Secret message";

        let encrypted1 = rc4_crypt(b"key1", plaintext).unwrap();
        let encrypted2 = rc4_crypt(b"key2", plaintext).unwrap();

        assert_ne!(encrypted1, encrypted2);
    }

    #[test]
    fn test_rc4_known_vectors() {
        let cases: [(&[u8], &[u8], [u8; 14], usize); 3] = [
            (
                b"Key",
                b"Plaintext",
                [0xBB, 0xF3, 0x16, 0xE8, 0xD9, 0x40, 0xAF, 0x0A, 0xD3, 0, 0, 0, 0, 0],
                9,
            ),
            (b"Wiki", b"pedia", [0x10, 0x21, 0xBF, 0x04, 0x20, 0, 0, 0, 0, 0, 0, 0, 0, 0], 5),
            (
                b"Secret",
                b"Attack at dawn",
                [
                    0x45, 0xA0, 0x1F, 0x64, 0x5F, 0xC3, 0x5B, 0x38, 0x35, 0x52, 0x54, 0x4B, 0x9B,
                    0xF5,
                ],
                14,
            ),
        ];

        for (key, plaintext, expected, len) in cases {
            assert_eq!(rc4_crypt(key, plaintext).unwrap(), &expected[..len]);
        }
    }

    #[test]
    fn test_rc4_long_key_cycles() {
        // Keys longer than 256 bytes only use the first 256 during scheduling
        let long_key: Vec<u8> = (0..300).map(|i| i as u8).collect();
        let truncated = &long_key[..256];
        let data = b"cycle check";

        assert_eq!(
            rc4_crypt(&long_key, data).unwrap(),
            rc4_crypt(truncated, data).unwrap()
        );
    }
}
