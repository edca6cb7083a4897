//! HTTP facade approximating the online Pwned Passwords V2 API.
//!
//! Two routes are served over an open [`OfflineDatabase`]:
//!
//! - `GET /pwnedpassword/{password-or-hash}`: a 40-hex-character argument
//!   is treated as a SHA-1 hash, anything else is hashed first. Responds
//!   `200` with the appearance count when the password is compromised,
//!   `404` otherwise; the `X-Password-SHA1` header always carries the hash
//!   that was looked up.
//! - `GET /range/{prefix}`: the k-anonymity range endpoint. A 5-hex-char
//!   prefix selects a 20-bit bucket, and each matching hash is written as
//!   `SUFFIX:COUNT\r\n` with the 5 leading hex characters stripped.
//!
//! Queries run on the blocking thread pool; a cold page fault on the mapped
//! database must not stall the async runtime.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use sha1::{Digest, Sha1};
use tower_http::trace::TraceLayer;
use tracing::error;

use pwnedpass::{Error, OfflineDatabase};

/// Hex table for encoding response lines using capital letters, matching
/// the online API's formatting.
const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Builds the application router over an open database.
pub fn router(db: Arc<OfflineDatabase>) -> Router {
    Router::new()
        .route("/pwnedpassword/{*password}", get(pwnedpassword))
        .route("/range/{prefix}", get(range))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

async fn pwnedpassword(
    State(db): State<Arc<OfflineDatabase>>,
    Path(password): Path<String>,
) -> Response {
    // a 40-hex argument is already a hash; anything else is hashed now
    let hash = match decode_hash(password.as_bytes()) {
        Some(hash) => hash,
        None => {
            let mut hasher = Sha1::new();
            hasher.update(password.as_bytes());
            hasher.finalize().into()
        }
    };

    let sha1_hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();

    let lookup = tokio::task::spawn_blocking(move || db.pwned(&hash)).await;
    match lookup {
        Ok(Ok(0)) => (
            StatusCode::NOT_FOUND,
            [("X-Password-SHA1", sha1_hex)],
            "Password not compromised\n",
        )
            .into_response(),
        Ok(Ok(frequency)) => (
            StatusCode::OK,
            [("X-Password-SHA1", sha1_hex)],
            format!("{frequency}\n"),
        )
            .into_response(),
        Ok(Err(err)) => {
            error!(%err, "point lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            error!(%err, "lookup task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn range(State(db): State<Arc<OfflineDatabase>>, Path(prefix): Path<String>) -> Response {
    let Some((start, end)) = decode_prefix(prefix.as_bytes()) else {
        return (
            StatusCode::BAD_REQUEST,
            "The hash prefix was not in a valid format",
        )
            .into_response();
    };

    let scan = tokio::task::spawn_blocking(move || {
        let mut body = String::with_capacity(32 << 10);
        let mut hexhash = [0u8; 40];

        db.scan(start, end, |hash, count| {
            for (i, &v) in hash.iter().enumerate() {
                hexhash[i * 2] = HEX_CHARS[(v >> 4) as usize];
                hexhash[i * 2 + 1] = HEX_CHARS[(v & 0x0f) as usize];
            }

            // the response line carries only the 35 hex characters after
            // the queried prefix
            for &c in &hexhash[5..] {
                body.push(c as char);
            }
            body.push(':');
            body.push_str(&count.to_string());
            body.push_str("\r\n");

            false
        })?;

        Ok::<String, Error>(body)
    })
    .await;

    match scan {
        Ok(Ok(body)) => (StatusCode::OK, body).into_response(),
        Ok(Err(err @ Error::InvalidRange { .. })) => {
            error!(%err, "range scan rejected");
            StatusCode::BAD_REQUEST.into_response()
        }
        Ok(Err(err)) => {
            error!(%err, "range scan failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(err) => {
            error!(%err, "range scan task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Decodes a 40-hex-character SHA-1, upper or lower case.
fn decode_hash(s: &[u8]) -> Option<[u8; 20]> {
    if s.len() != 40 {
        return None;
    }

    let mut hash = [0u8; 20];
    for (i, pair) in s.chunks_exact(2).enumerate() {
        hash[i] = (hex_to_nibble(pair[0])? << 4) | hex_to_nibble(pair[1])?;
    }
    Some(hash)
}

/// Decodes a 5-hex-character prefix into inclusive 3-byte scan bounds, with
/// the low nibble padded to `0` and `F` respectively.
fn decode_prefix(s: &[u8]) -> Option<([u8; 3], [u8; 3])> {
    if s.len() != 5 {
        return None;
    }

    let mut nibbles = [0u8; 5];
    for (i, &c) in s.iter().enumerate() {
        nibbles[i] = hex_to_nibble(c)?;
    }

    let start = [
        (nibbles[0] << 4) | nibbles[1],
        (nibbles[2] << 4) | nibbles[3],
        nibbles[4] << 4,
    ];
    let end = [start[0], start[1], (nibbles[4] << 4) | 0x0F];
    Some((start, end))
}

fn hex_to_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}
