use crate::error::RequestError;

use common::{ErrorLocation, RedactedPassword};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Encrypt,
    Decrypt,
}

impl OperationKind {
    /// Keyword the tool expects in its argument list.
    pub fn keyword(&self) -> &'static str {
        match self {
            OperationKind::Encrypt => "encrypt",
            OperationKind::Decrypt => "decrypt",
        }
    }

    /// Noun used in notifications, e.g. `Encryption Error`.
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Encrypt => "Encryption",
            OperationKind::Decrypt => "Decryption",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for OperationKind {
    type Err = RequestError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "encrypt" => Ok(OperationKind::Encrypt),
            "decrypt" => Ok(OperationKind::Decrypt),
            _ => Err(RequestError::UnknownOperation {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Blowfish,
    Aes,
    Des,
    DesEde,
    Rc2,
    Rca,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Blowfish,
        Algorithm::Aes,
        Algorithm::Des,
        Algorithm::DesEde,
        Algorithm::Rc2,
        Algorithm::Rca,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Algorithm::Blowfish => "Blowfish",
            Algorithm::Aes => "AES",
            Algorithm::Des => "DES",
            Algorithm::DesEde => "DESede",
            Algorithm::Rc2 => "RC2",
            Algorithm::Rca => "RCA",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Algorithm::Aes => "AES (default in docs)",
            other => other.token(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Algorithm {
    type Err = RequestError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.token().eq_ignore_ascii_case(s))
            .ok_or_else(|| RequestError::UnknownAlgorithm {
                value: s.to_string(),
                expected: join_tokens(Algorithm::ALL.iter().map(Algorithm::token)),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Cbc,
    Cfb,
    Ecb,
    Ofb,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Cbc, Mode::Cfb, Mode::Ecb, Mode::Ofb];

    pub fn token(&self) -> &'static str {
        match self {
            Mode::Cbc => "CBC",
            Mode::Cfb => "CFB",
            Mode::Ecb => "ECB",
            Mode::Ofb => "OFB",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Cbc => "CBC (default)",
            other => other.token(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Mode {
    type Err = RequestError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.token().eq_ignore_ascii_case(s))
            .ok_or_else(|| RequestError::UnknownMode {
                value: s.to_string(),
                expected: join_tokens(Mode::ALL.iter().map(Mode::token)),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(", ")
}

/// Parameters for one encrypt or decrypt call.
///
/// `use_random_iv` only affects encryption and `strip_wrapper` only affects
/// decryption; both are ignored for the other kind.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub input: String,
    pub password: Option<RedactedPassword>,
    pub algorithm: Algorithm,
    pub mode: Mode,
    pub use_random_iv: bool,
    pub strip_wrapper: bool,
}

impl OperationRequest {
    pub fn new(kind: OperationKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
            password: None,
            algorithm: Algorithm::default(),
            mode: Mode::default(),
            use_random_iv: false,
            strip_wrapper: true,
        }
    }

    pub fn encrypt(input: impl Into<String>) -> Self {
        Self::new(OperationKind::Encrypt, input)
    }

    pub fn decrypt(input: impl Into<String>) -> Self {
        Self::new(OperationKind::Decrypt, input)
    }

    /// Explicit per-call password. Empty strings count as absent.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = RedactedPassword::non_empty(password);
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_random_iv(mut self, use_random_iv: bool) -> Self {
        self.use_random_iv = use_random_iv;
        self
    }

    pub fn with_strip_wrapper(mut self, strip_wrapper: bool) -> Self {
        self.strip_wrapper = strip_wrapper;
        self
    }
}
