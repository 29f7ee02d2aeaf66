// src/cert/verification.rs
use super::error::TlsError;
use super::pem::decode_certificate_pem;
use super::types::{Asset, AssetName};
use openssl::error::ErrorStack;
use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::{X509Ref, X509StoreContext, X509};

/// Checks that a CA certificate is self-signed and usable as a trust anchor.
pub fn verify_self_signed(ca: &X509Ref) -> Result<bool, ErrorStack> {
    let key = ca.public_key()?;
    if !ca.verify(&key)? {
        return Ok(false);
    }
    verify_issued_by(ca, ca)
}

/// Runs a full chain check of `cert` with `ca` as the only trusted root.
pub fn verify_issued_by(cert: &X509Ref, ca: &X509Ref) -> Result<bool, ErrorStack> {
    let mut store = X509StoreBuilder::new()?;
    store.add_cert(ca.to_owned())?;
    let store = store.build();

    let chain: Stack<X509> = Stack::new()?;
    let mut context = X509StoreContext::new()?;
    context.init(&store, cert, &chain, |ctx| ctx.verify_cert())
}

/// The CA asset a certificate asset must chain to.
fn issuing_ca(name: AssetName) -> AssetName {
    match name {
        AssetName::EtcdCa
        | AssetName::EtcdServerCert
        | AssetName::EtcdPeerCert
        | AssetName::EtcdClientCert => AssetName::EtcdCa,
        _ => AssetName::CaCert,
    }
}

/// Checks every certificate in a generated set against the CA it is expected
/// to chain to. Catches supplied etcd client material that was not issued by
/// the supplied etcd CA.
pub fn verify_asset_chains(assets: &[Asset]) -> Result<(), TlsError> {
    let find = |name: AssetName| assets.iter().find(|a| a.name == name);
    let chain_error = |source| TlsError::Decoding {
        what: "certificate chain",
        source,
    };

    for asset in assets.iter().filter(|a| a.name.is_certificate()) {
        let Some(ca_asset) = find(issuing_ca(asset.name)) else {
            return Err(TlsError::InputValidation(format!(
                "{} has no {} to verify against",
                asset.name,
                issuing_ca(asset.name)
            )));
        };
        let ca = decode_certificate_pem(&ca_asset.data)?;
        let cert = decode_certificate_pem(&asset.data)?;
        let verified = if asset.name == ca_asset.name {
            verify_self_signed(&cert).map_err(chain_error)?
        } else {
            verify_issued_by(&cert, &ca).map_err(chain_error)?
        };
        if !verified {
            return Err(TlsError::InputValidation(format!(
                "{} does not chain to {}",
                asset.name, ca_asset.name
            )));
        }
    }
    Ok(())
}
