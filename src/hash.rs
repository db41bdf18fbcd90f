use crate::{Error, Result};
use md5::Md5;
use sha2::digest::Digest;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

/// Available checksum types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hash {
    /// Sha224 sum
    SHA224(String),
    /// Sha256 sum
    SHA256(String),
    /// Sha384 sum
    SHA384(String),
    /// Sha512 sum
    SHA512(String),
    /// MD5 sum
    MD5(String),
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm(), self.expected())
    }
}

impl FromStr for Hash {
    type Err = Error;
    /// Parse `ALGO:HEX`, e.g. `sha256:039058c6...`
    fn from_str(s: &str) -> Result<Self> {
        let (algo, hex) = s
            .split_once(':')
            .ok_or_else(|| Error::BadChecksum(s.to_string()))?;
        let hex = hex.trim().to_ascii_lowercase();
        let (hash, len) = match algo.trim().to_ascii_lowercase().as_str() {
            "sha224" => (Self::SHA224(hex), 56),
            "sha256" => (Self::SHA256(hex), 64),
            "sha384" => (Self::SHA384(hex), 96),
            "sha512" => (Self::SHA512(hex), 128),
            "md5" => (Self::MD5(hex), 32),
            _ => return Err(Error::BadChecksum(s.to_string())),
        };
        let digits = hash.expected();
        if digits.len() != len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::BadChecksum(s.to_string()));
        }
        Ok(hash)
    }
}

enum Hasher {
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Md5(Md5),
}

impl Hasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha224(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
            Self::Md5(h) => h.update(data),
        }
    }
    fn hex(self) -> String {
        match self {
            Self::Sha224(h) => format!("{:x}", h.finalize()),
            Self::Sha256(h) => format!("{:x}", h.finalize()),
            Self::Sha384(h) => format!("{:x}", h.finalize()),
            Self::Sha512(h) => format!("{:x}", h.finalize()),
            Self::Md5(h) => format!("{:x}", h.finalize()),
        }
    }
}

impl Hash {
    pub fn new_sha256(sum: String) -> Self {
        Self::SHA256(sum.to_ascii_lowercase())
    }
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::SHA224(_) => "sha224",
            Self::SHA256(_) => "sha256",
            Self::SHA384(_) => "sha384",
            Self::SHA512(_) => "sha512",
            Self::MD5(_) => "md5",
        }
    }
    /// Expected hex digest
    pub fn expected(&self) -> &str {
        match self {
            Self::SHA224(val)
            | Self::SHA256(val)
            | Self::SHA384(val)
            | Self::SHA512(val)
            | Self::MD5(val) => val,
        }
    }
    fn hasher(&self) -> Hasher {
        match self {
            Self::SHA224(_) => Hasher::Sha224(Sha224::new()),
            Self::SHA256(_) => Hasher::Sha256(Sha256::new()),
            Self::SHA384(_) => Hasher::Sha384(Sha384::new()),
            Self::SHA512(_) => Hasher::Sha512(Sha512::new()),
            Self::MD5(_) => Hasher::Md5(Md5::new()),
        }
    }
    fn compare(&self, actual: String) -> Result<()> {
        debug!("{} sum: {}", self.algorithm(), actual);
        if actual.eq_ignore_ascii_case(self.expected()) {
            debug!("Checksum match!");
            Ok(())
        } else {
            Err(Error::Checksum {
                expected: self.expected().to_string(),
                actual,
            })
        }
    }
    pub fn verify(&self, data: &[u8]) -> Result<()> {
        let mut hasher = self.hasher();
        hasher.update(data);
        self.compare(hasher.hex())
    }
    /// Hash the file at `path` in `buffer_size` pieces and compare
    #[instrument(skip(self, path), fields(SHA=%self, path=%path.display()))]
    pub async fn verify_file(&self, path: &Path, buffer_size: usize) -> Result<()> {
        let mut file = File::open(path).await.map_err(Error::Verify)?;
        let mut buf = vec![0u8; buffer_size.max(1)];
        let mut hasher = self.hasher();
        loop {
            let n = file.read(&mut buf).await.map_err(Error::Verify)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        self.compare(hasher.hex())
    }
}
