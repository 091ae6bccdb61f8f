//! Client identity derivation
//!
//! The rate limiters treat identity as an opaque string. This module turns a
//! request into one: the peer address, or the forwarded client address when
//! the peer is a trusted proxy. `X-Forwarded-For` from any other peer is
//! ignored because it is trivially spoofable.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Identity used when the transport exposes no peer address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the rate limiting identity for `req`.
pub fn client_identity(req: &Request, trusted_proxies: &[IpAddr]) -> String {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    match peer {
        Some(ip) => resolve_client_ip(ip, req.headers(), trusted_proxies).to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}

/// Walks `X-Forwarded-For` from the nearest hop outward, skipping trusted
/// proxies, and returns the first untrusted address.
fn resolve_client_ip(peer: IpAddr, headers: &HeaderMap, trusted_proxies: &[IpAddr]) -> IpAddr {
    if !trusted_proxies.contains(&peer) {
        return peer;
    }

    let hops: Vec<IpAddr> = headers
        .get_all(FORWARDED_FOR)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|hop| hop.trim().parse().ok())
        .collect();

    hops.iter()
        .rev()
        .find(|ip| !trusted_proxies.contains(ip))
        .or_else(|| hops.first())
        .copied()
        .unwrap_or(peer)
}
