//! Time-based codes derived from the mobile authenticator secrets.
use crate::error::Error;
use crate::{Result, SteamId};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPublicKey};
use sha1::{Digest, Sha1};

type HmacSha1 = Hmac<Sha1>;

const CODE_ALPHABET: &[u8] = b"23456789BCDFGHJKMNPQRTVWXY";
const CODE_LENGTH: usize = 5;
const CODE_PERIOD: i64 = 30;

/// Login code for the 30 second window containing `time`.
pub fn two_factor_code(shared_secret: &str, time: i64) -> Result<String> {
    let window = (time / CODE_PERIOD) as u64;
    let digest = hmac_sha1(shared_secret, &window.to_be_bytes())?;

    let start = (digest[19] & 0x0f) as usize;
    let mut code_point = u32::from_be_bytes([
        digest[start],
        digest[start + 1],
        digest[start + 2],
        digest[start + 3],
    ]) & 0x7fff_ffff;

    let mut code = String::with_capacity(CODE_LENGTH);
    for _ in 0..CODE_LENGTH {
        let index = (code_point % CODE_ALPHABET.len() as u32) as usize;
        code.push(CODE_ALPHABET[index] as char);
        code_point /= CODE_ALPHABET.len() as u32;
    }
    Ok(code)
}

/// Key authorising one confirmation request. `tag` names the operation
/// (`list`, `allow`, `cancel`...).
pub fn confirmation_key(identity_secret: &str, time: i64, tag: &str) -> Result<String> {
    let mut message = (time as u64).to_be_bytes().to_vec();
    message.extend_from_slice(tag.as_bytes());
    Ok(STANDARD.encode(hmac_sha1(identity_secret, &message)?))
}

pub fn device_id(steam_id: SteamId) -> String {
    let hash = hex::encode(Sha1::digest(steam_id.to_string().as_bytes()));
    format!(
        "android:{}-{}-{}-{}-{}",
        &hash[0..8],
        &hash[8..12],
        &hash[12..16],
        &hash[16..20],
        &hash[20..32]
    )
}

pub fn encrypt_password(modulus_hex: &str, exponent_hex: &str, password: &str) -> Result<String> {
    let key = RsaPublicKey::new(
        BigUint::from_bytes_be(&hex::decode(modulus_hex)?),
        BigUint::from_bytes_be(&hex::decode(exponent_hex)?),
    )?;
    let encrypted = key.encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, password.as_bytes())?;
    Ok(STANDARD.encode(encrypted))
}

fn hmac_sha1(secret: &str, message: &[u8]) -> Result<Vec<u8>> {
    let key = STANDARD
        .decode(secret)
        .map_err(|e| Error::InvalidSecret(e.to_string()))?;
    let mut mac =
        HmacSha1::new_from_slice(&key).map_err(|e| Error::InvalidSecret(e.to_string()))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
