// src/cert/error.rs
use openssl::error::ErrorStack;
use std::{fmt, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to generate {role} key: {source}")]
    KeyGeneration {
        role: String,
        #[source]
        source: ErrorStack,
    },
    #[error("failed to issue {role} certificate: {source}")]
    CertificateIssuance {
        role: String,
        #[source]
        source: ErrorStack,
    },
    #[error("failed to encode {what}: {source}")]
    Encoding {
        what: &'static str,
        #[source]
        source: ErrorStack,
    },
    #[error("failed to decode {what}: {source}")]
    Decoding {
        what: &'static str,
        #[source]
        source: ErrorStack,
    },
    #[error("invalid input: {0}")]
    InputValidation(String),
}

impl TlsError {
    pub fn key_generation(role: &str) -> impl FnOnce(ErrorStack) -> TlsError + '_ {
        move |source| TlsError::KeyGeneration {
            role: role.to_string(),
            source,
        }
    }

    pub fn issuance(role: &str) -> impl FnOnce(ErrorStack) -> TlsError + '_ {
        move |source| TlsError::CertificateIssuance {
            role: role.to_string(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Master,
    ExternalEtcd,
    SelfHostedEtcd,
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suite::Master => write!(f, "master"),
            Suite::ExternalEtcd => write!(f, "external etcd"),
            Suite::SelfHostedEtcd => write!(f, "self-hosted etcd"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("building {suite} assets: {source}")]
    Suite {
        suite: Suite,
        #[source]
        source: TlsError,
    },
    #[error(transparent)]
    Tls(#[from] TlsError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl AssetError {
    pub fn in_suite(suite: Suite) -> impl FnOnce(TlsError) -> AssetError {
        move |source| AssetError::Suite { suite, source }
    }
}
