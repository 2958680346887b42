//! Compile request payload.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::bundle::ProjectBundle;
use super::named_address::NamedAddresses;

/// Address information attached to a compile request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressTarget {
    /// Serialized as `namedAddresses`.
    NamedAddresses(NamedAddresses),
    /// Serialized as `senderAddress`.
    SenderAddress(String),
}

/// Body of `POST /compile`.
///
/// Serializes to exactly three keys: `files`, `toml`, and either
/// `namedAddresses` or `senderAddress`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileRequest {
    pub bundle: ProjectBundle,
    pub target: AddressTarget,
}

/// Combine a collected bundle with its address information.
///
/// Callers check beforehand that the bundle is non-empty and, in sender
/// mode, that the address is non-empty.
pub fn build_compile_request(bundle: &ProjectBundle, target: AddressTarget) -> CompileRequest {
    CompileRequest {
        bundle: bundle.clone(),
        target,
    }
}

impl Serialize for CompileRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("files", &self.bundle.files)?;
        map.serialize_entry("toml", &self.bundle.manifest)?;
        match &self.target {
            AddressTarget::NamedAddresses(addresses) => {
                map.serialize_entry("namedAddresses", addresses)?
            }
            AddressTarget::SenderAddress(address) => map.serialize_entry("senderAddress", address)?,
        }
        map.end()
    }
}
