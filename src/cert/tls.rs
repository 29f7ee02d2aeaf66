// src/cert/tls.rs
use super::error::TlsError;
use super::types::{AltNames, CertConfig};
use openssl::asn1::{Asn1Integer, Asn1Time};
use openssl::bn::{BigNum, MsbOption};
use openssl::error::ErrorStack;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkey::{HasPublic, PKey, PKeyRef, Private};
use openssl::rsa::Rsa;
use openssl::x509::extension::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage,
    SubjectAlternativeName, SubjectKeyIdentifier,
};
use openssl::x509::{X509Builder, X509Name, X509Ref, X509};

pub const RSA_KEY_SIZE: u32 = 2048;
pub const CA_VALIDITY_DAYS: u32 = 3650;
pub const LEAF_VALIDITY_DAYS: u32 = 365;

const SERIAL_BITS: i32 = 128;

/// Generates a fresh RSA key. `role` is only used to label the error.
pub fn new_private_key(role: &str) -> Result<PKey<Private>, TlsError> {
    Rsa::generate(RSA_KEY_SIZE)
        .and_then(PKey::from_rsa)
        .map_err(TlsError::key_generation(role))
}

/// Builds a self-signed certificate that can sign other certificates.
pub fn new_self_signed_ca(config: &CertConfig, key: &PKeyRef<Private>) -> Result<X509, TlsError> {
    validate(config)?;
    build_ca(config, key).map_err(TlsError::issuance(&config.common_name))
}

/// Issues a leaf certificate for `key` signed by the CA. Every leaf carries
/// both serverAuth and clientAuth usages.
pub fn new_signed_certificate<T: HasPublic>(
    config: &CertConfig,
    key: &PKeyRef<T>,
    ca_cert: &X509Ref,
    ca_key: &PKeyRef<Private>,
) -> Result<X509, TlsError> {
    validate(config)?;
    build_leaf(config, key, ca_cert, ca_key).map_err(TlsError::issuance(&config.common_name))
}

fn validate(config: &CertConfig) -> Result<(), TlsError> {
    if config.common_name.trim().is_empty() {
        return Err(TlsError::InputValidation(
            "certificate common name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn build_ca(config: &CertConfig, key: &PKeyRef<Private>) -> Result<X509, ErrorStack> {
    let name = build_name(config)?;
    let mut builder = new_builder(&name, &name, CA_VALIDITY_DAYS)?;
    builder.set_pubkey(key)?;

    builder.append_extension(BasicConstraints::new().critical().ca().build()?)?;
    builder.append_extension(
        KeyUsage::new()
            .critical()
            .digital_signature()
            .key_encipherment()
            .key_cert_sign()
            .build()?,
    )?;
    let subject_key_id = SubjectKeyIdentifier::new().build(&builder.x509v3_context(None, None))?;
    builder.append_extension(subject_key_id)?;

    builder.sign(key, MessageDigest::sha256())?;
    Ok(builder.build())
}

fn build_leaf<T: HasPublic>(
    config: &CertConfig,
    key: &PKeyRef<T>,
    ca_cert: &X509Ref,
    ca_key: &PKeyRef<Private>,
) -> Result<X509, ErrorStack> {
    let name = build_name(config)?;
    let mut builder = new_builder(&name, ca_cert.subject_name(), LEAF_VALIDITY_DAYS)?;
    builder.set_pubkey(key)?;

    builder.append_extension(BasicConstraints::new().critical().build()?)?;
    builder.append_extension(
        KeyUsage::new()
            .critical()
            .digital_signature()
            .key_encipherment()
            .build()?,
    )?;
    builder.append_extension(ExtendedKeyUsage::new().server_auth().client_auth().build()?)?;

    let subject_key_id =
        SubjectKeyIdentifier::new().build(&builder.x509v3_context(Some(ca_cert), None))?;
    builder.append_extension(subject_key_id)?;
    let authority_key_id = AuthorityKeyIdentifier::new()
        .keyid(false)
        .issuer(false)
        .build(&builder.x509v3_context(Some(ca_cert), None))?;
    builder.append_extension(authority_key_id)?;

    if !config.alt_names.is_empty() {
        let san = build_alt_names(&config.alt_names)
            .build(&builder.x509v3_context(Some(ca_cert), None))?;
        builder.append_extension(san)?;
    }

    builder.sign(ca_key, MessageDigest::sha256())?;
    Ok(builder.build())
}

fn new_builder(
    subject: &X509Name,
    issuer: &openssl::x509::X509NameRef,
    validity_days: u32,
) -> Result<X509Builder, ErrorStack> {
    let mut builder = X509Builder::new()?;
    builder.set_version(2)?;
    let serial = random_serial()?;
    builder.set_serial_number(&serial)?;
    builder.set_subject_name(subject)?;
    builder.set_issuer_name(issuer)?;
    let not_before = Asn1Time::days_from_now(0)?;
    builder.set_not_before(&not_before)?;
    let not_after = Asn1Time::days_from_now(validity_days)?;
    builder.set_not_after(&not_after)?;
    Ok(builder)
}

fn build_name(config: &CertConfig) -> Result<X509Name, ErrorStack> {
    let mut name = X509Name::builder()?;
    name.append_entry_by_nid(Nid::COMMONNAME, &config.common_name)?;
    for org in &config.organization {
        name.append_entry_by_nid(Nid::ORGANIZATIONNAME, org)?;
    }
    Ok(name.build())
}

fn build_alt_names(alt_names: &AltNames) -> SubjectAlternativeName {
    let mut san = SubjectAlternativeName::new();
    for dns in &alt_names.dns_names {
        san.dns(dns);
    }
    for ip in &alt_names.ips {
        san.ip(&ip.to_string());
    }
    san
}

fn random_serial() -> Result<Asn1Integer, ErrorStack> {
    let mut serial = BigNum::new()?;
    serial.rand(SERIAL_BITS, MsbOption::MAYBE_ZERO, false)?;
    serial.to_asn1_integer()
}
