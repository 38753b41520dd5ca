//! UDP query protocol (full stat).
//!
//! A query is a two step exchange: a handshake returns a challenge token, which
//! must be echoed in the full stat request.

use std::collections::HashMap;

use log::debug;
use tokio::net::UdpSocket;

use crate::minecraft::{MinecraftError, QueryResponse};

const MAGIC: [u8; 2] = [0xFE, 0xFD];
const TYPE_HANDSHAKE: u8 = 0x09;
const TYPE_STAT: u8 = 0x00;
/// Session ids must only use the low nibble of each byte.
const SESSION_ID: i32 = 0x0102_0304 & 0x0F0F_0F0F;
const KV_PADDING: &[u8] = b"splitnum\x00\x80\x00";
const PLAYER_PADDING: &[u8] = b"\x01player_";
const MAX_DATAGRAM: usize = 65_535;

pub fn handshake_request(session_id: i32) -> Vec<u8> {
    let mut request = MAGIC.to_vec();
    request.push(TYPE_HANDSHAKE);
    request.extend_from_slice(&session_id.to_be_bytes());
    request
}

pub fn full_stat_request(session_id: i32, token: i32) -> Vec<u8> {
    let mut request = MAGIC.to_vec();
    request.push(TYPE_STAT);
    request.extend_from_slice(&session_id.to_be_bytes());
    request.extend_from_slice(&token.to_be_bytes());
    // Four padding bytes ask for the full stat instead of the basic one
    request.extend_from_slice(&[0x00; 4]);
    request
}

/// Checks the type byte and session id, returning the payload after them.
fn strip_header(data: &[u8], kind: u8, session_id: i32) -> Result<&[u8], MinecraftError> {
    if data.len() < 5 || data[0] != kind {
        return Err(MinecraftError::Protocol("unexpected query packet".to_owned()));
    }
    if data[1..5] != session_id.to_be_bytes() {
        return Err(MinecraftError::Protocol("session id mismatch".to_owned()));
    }
    Ok(&data[5..])
}

pub fn parse_handshake(data: &[u8], session_id: i32) -> Result<i32, MinecraftError> {
    let payload = strip_header(data, TYPE_HANDSHAKE, session_id)?;
    let token = payload.split(|b| *b == 0).next().unwrap_or_default();
    let token: i64 = String::from_utf8_lossy(token)
        .trim()
        .parse()
        .map_err(|_| MinecraftError::Protocol("invalid challenge token".to_owned()))?;

    // The token is sent back as its low 32 bits
    Ok(token as i32)
}

pub fn parse_full_stat(data: &[u8], session_id: i32) -> Result<QueryResponse, MinecraftError> {
    let truncated = || MinecraftError::Protocol("truncated full stat".to_owned());

    let payload = strip_header(data, TYPE_STAT, session_id)?;
    let payload = payload
        .strip_prefix(KV_PADDING)
        .ok_or_else(|| MinecraftError::Protocol("missing key/value padding".to_owned()))?;

    let mut parts = payload.split(|b| *b == 0);
    let mut values: HashMap<String, String> = HashMap::new();
    loop {
        let key = parts.next().ok_or_else(truncated)?;
        if key.is_empty() {
            break;
        }
        let value = parts.next().ok_or_else(truncated)?;
        values.insert(
            String::from_utf8_lossy(key).into_owned(),
            String::from_utf8_lossy(value).into_owned(),
        );
    }

    if parts.next() != Some(PLAYER_PADDING) || parts.next() != Some(&[][..]) {
        return Err(MinecraftError::Protocol("missing player padding".to_owned()));
    }

    let players: Vec<String> = parts
        .take_while(|name| !name.is_empty())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();

    let value = |key: &str| values.get(key).cloned().unwrap_or_default();
    let number = |key: &str| value(key).parse::<u32>().unwrap_or_default();

    Ok(QueryResponse {
        motd: value("hostname"),
        map: value("map"),
        version: value("version"),
        online: number("numplayers"),
        max: number("maxplayers"),
        players,
    })
}

pub async fn full_stat(host: &str, port: u16) -> Result<QueryResponse, MinecraftError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
    socket.connect((host, port)).await?;

    let mut buf = vec![0u8; MAX_DATAGRAM];

    socket.send(&handshake_request(SESSION_ID)).await?;
    let read = socket.recv(&mut buf).await?;
    let token = parse_handshake(&buf[..read], SESSION_ID)?;

    socket.send(&full_stat_request(SESSION_ID, token)).await?;
    let read = socket.recv(&mut buf).await?;
    let response = parse_full_stat(&buf[..read], SESSION_ID)?;

    debug!("query response {:?}", response);

    Ok(response)
}
