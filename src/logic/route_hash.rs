use crate::venues::VenueSelection;
use alloy_primitives::{Address, U256, hex};
use serde::{Deserialize, Serialize};
use sha2::digest::Update;
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Display};

/// SHA-256 identity of a concrete route: tokens, amount and every leg's venue.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct RouteHash(pub [u8; 32]);

impl Display for RouteHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode_prefixed(self.0))
    }
}

impl Debug for RouteHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RouteHash({})", hex::encode_prefixed(self.0))
    }
}

impl From<[u8; 32]> for RouteHash {
    fn from(hash: [u8; 32]) -> Self {
        RouteHash(hash)
    }
}

impl Serialize for RouteHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode_prefixed(self.0))
    }
}

impl<'de> Deserialize<'de> for RouteHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let hash: [u8; 32] = bytes.try_into().map_err(|_| serde::de::Error::custom("route hash must be 32 bytes"))?;
        Ok(RouteHash(hash))
    }
}

/// `tokens` is the full token sequence of the route, e.g. A -> I -> B -> A.
pub fn generate_route_hash(tokens: &[Address], amount_in: U256, legs: &[VenueSelection]) -> RouteHash {
    let mut hasher = Sha256::new();

    for token in tokens {
        Update::update(&mut hasher, token.as_slice());
    }
    Update::update(&mut hasher, &amount_in.to_be_bytes::<32>());
    for leg in legs {
        Update::update(&mut hasher, &[leg.venue.dex_id()]);
        Update::update(&mut hasher, &leg.fee_tier.unwrap_or(0).to_be_bytes());
    }

    let hash_slice: [u8; 32] = hasher.finalize().into();
    RouteHash(hash_slice)
}
