use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use axum::http::{header, HeaderMap, HeaderValue};
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;

/// AES-256-GCM cookie sealing.
///
/// A sealed value is `base64url(nonce || ciphertext)`. GCM authenticates the
/// ciphertext, so a cookie that was altered or sealed under another key fails
/// to open instead of yielding garbage.
pub struct CookieSealer {
    cipher: Aes256Gcm,
}

impl CookieSealer {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let key = derive_key(secret)?;
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| anyhow::anyhow!("invalid key length: {:?}", e))?;
        Ok(Self { cipher })
    }

    pub fn seal(&self, plaintext: &[u8]) -> anyhow::Result<String> {
        let nonce_bytes = generate_nonce();
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|e| anyhow::anyhow!("cookie encryption failed: {}", e))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(out))
    }

    /// Returns `None` for anything that is not a value this sealer produced.
    pub fn open(&self, sealed: &str) -> Option<Vec<u8>> {
        let raw = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(sealed)
            .ok()?;
        if raw.len() <= NONCE_LEN {
            return None;
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        self.cipher.decrypt(Nonce::from_slice(nonce), ciphertext).ok()
    }
}

/// 64 hex chars are used as the raw key; any other secret is hashed.
fn derive_key(secret: &str) -> anyhow::Result<[u8; 32]> {
    if secret.is_empty() {
        anyhow::bail!("SESSION_SECRET must not be empty");
    }
    let mut key = [0u8; 32];
    if secret.len() == 64 {
        if let Ok(bytes) = hex::decode(secret) {
            key.copy_from_slice(&bytes);
            return Ok(key);
        }
    }
    key.copy_from_slice(&Sha256::digest(secret.as_bytes()));
    Ok(key)
}

fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Find a cookie by name across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Attributes shared by every cookie the portal sets.
pub fn build_cookie(name: &str, value: &str, max_age: u64, secure: bool) -> anyhow::Result<HeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    Ok(HeaderValue::from_str(&cookie)?)
}
