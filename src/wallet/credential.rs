//! Credential parsing.
//!
//! A credential string is tried against an ordered list of formats and the
//! first one that parses wins. A mnemonic phrase is the last resort.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bech32::Hrp;
use derive_more::Display;
use eyre::{bail, ensure, eyre, Result};

use super::keypair::{Keypair, ED25519_FLAG};
use super::mnemonic::secret_from_mnemonic;

/// Human readable part of Bech32 encoded Sui private keys
pub const SUI_PRIVATE_KEY_PREFIX: &str = "suiprivkey";

/// The format a credential was recognized as
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum KeyFormat {
    /// `suiprivkey1...` Bech32 string
    #[display("suiprivkey")]
    SuiPrivateKey,
    /// 64 hex characters
    #[display("hex")]
    Hex,
    /// `0x` followed by 64 hex characters
    #[display("0x-hex")]
    PrefixedHex,
    /// Base64 of 32 bytes
    #[display("base64")]
    Base64,
    /// BIP-39 phrase
    #[display("mnemonic")]
    Mnemonic,
}

/// A parser turning a credential into 32 secret bytes
type SecretParser = fn(&str) -> Result<[u8; 32]>;

/// Parsers in the order they are attempted
const PARSERS: [(KeyFormat, SecretParser); 5] = [
    (KeyFormat::SuiPrivateKey, parse_sui_private_key),
    (KeyFormat::Hex, parse_hex),
    (KeyFormat::PrefixedHex, parse_prefixed_hex),
    (KeyFormat::Base64, parse_base64),
    (KeyFormat::Mnemonic, secret_from_mnemonic),
];

/// A keypair tagged with the format it was parsed from
#[derive(Clone, Debug)]
pub struct ParsedCredential {
    /// Matched format
    pub format: KeyFormat,
    /// Derived keypair
    pub keypair: Keypair,
}

/// Parses a credential in any supported format.
///
/// # Errors
/// * If no format accepts the input. The message lists each format tried,
///   never the input itself.
pub fn parse_credential(input: &str) -> Result<ParsedCredential> {
    let input = input.trim();
    let mut failures = Vec::with_capacity(PARSERS.len());

    for (format, parser) in PARSERS {
        match parser(input) {
            Ok(secret) => {
                return Ok(ParsedCredential {
                    format,
                    keypair: Keypair::from_secret(&secret),
                })
            }
            Err(e) => failures.push(format!("{format}: {e}")),
        }
    }

    bail!("Unrecognized credential format ({})", failures.join("; "))
}

/// Bech32 `suiprivkey` string holding the scheme flag and the secret
fn parse_sui_private_key(input: &str) -> Result<[u8; 32]> {
    ensure!(
        input.starts_with(SUI_PRIVATE_KEY_PREFIX),
        "missing {SUI_PRIVATE_KEY_PREFIX} prefix"
    );
    let (hrp, data) = bech32::decode(input).map_err(|e| eyre!("invalid bech32: {e}"))?;
    ensure!(
        hrp == Hrp::parse_unchecked(SUI_PRIVATE_KEY_PREFIX),
        "unexpected prefix {hrp}"
    );

    let Some((&flag, secret)) = data.split_first() else {
        bail!("empty payload");
    };
    ensure!(flag == ED25519_FLAG, "unsupported signature scheme {flag:#04x}");
    to_secret(secret)
}

/// Exactly 64 hex characters
fn parse_hex(input: &str) -> Result<[u8; 32]> {
    ensure!(input.len() == 64, "expected 64 characters");
    let bytes = hex::decode(input).map_err(|e| eyre!("invalid hex: {e}"))?;
    to_secret(&bytes)
}

/// `0x` followed by 64 hex characters
fn parse_prefixed_hex(input: &str) -> Result<[u8; 32]> {
    ensure!(input.len() == 66, "expected 66 characters");
    let digits = input
        .strip_prefix("0x")
        .ok_or_else(|| eyre!("missing 0x prefix"))?;
    parse_hex(digits)
}

/// Standard base64 decoding to exactly 32 bytes
fn parse_base64(input: &str) -> Result<[u8; 32]> {
    let bytes = STANDARD
        .decode(input)
        .map_err(|e| eyre!("invalid base64: {e}"))?;
    to_secret(&bytes)
}

/// Checks the length of a decoded secret
fn to_secret(bytes: &[u8]) -> Result<[u8; 32]> {
    bytes
        .try_into()
        .map_err(|_| eyre!("expected 32 bytes, got {}", bytes.len()))
}
