//! Server List Ping.

use log::debug;
use serde::Deserialize;
use serde_json::Value;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

use crate::minecraft::{
    MinecraftError, ServerStatus,
    codec::{decode_string, decode_varint, frame, read_varint, write_string, write_varint},
};

/// Protocol version sent in the handshake. Servers answer the status request whatever the value.
const PROTOCOL_VERSION: i32 = 47;
const HANDSHAKE_ID: i32 = 0x00;
const STATUS_ID: i32 = 0x00;
const NEXT_STATE_STATUS: i32 = 1;
const MAX_RESPONSE_LEN: i32 = 1 << 21;

#[derive(Deserialize)]
struct StatusResponse {
    version: Version,
    players: Players,
    #[serde(default)]
    description: Value,
}

#[derive(Deserialize)]
struct Version {
    name: String,
}

#[derive(Deserialize)]
struct Players {
    online: u32,
    max: u32,
}

pub fn handshake_packet(host: &str, port: u16) -> Vec<u8> {
    let mut payload = Vec::new();
    write_varint(&mut payload, HANDSHAKE_ID);
    write_varint(&mut payload, PROTOCOL_VERSION);
    write_string(&mut payload, host);
    payload.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut payload, NEXT_STATE_STATUS);
    frame(&payload)
}

fn status_request_packet() -> Vec<u8> {
    let mut payload = Vec::new();
    write_varint(&mut payload, STATUS_ID);
    frame(&payload)
}

/// Extracts the plain text of a description, which is either a string or a chat component.
fn motd(description: &Value) -> String {
    match description {
        Value::String(text) => text.clone(),
        Value::Object(component) => {
            let mut text = component
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            if let Some(extra) = component.get("extra").and_then(Value::as_array) {
                extra.iter().for_each(|part| text.push_str(&motd(part)));
            }
            text
        }
        _ => String::new(),
    }
}

pub fn parse_status_packet(packet: &[u8]) -> Result<ServerStatus, MinecraftError> {
    let (packet_id, read) = decode_varint(packet)?;
    if packet_id != STATUS_ID {
        return Err(MinecraftError::Protocol(format!(
            "unexpected packet id {}",
            packet_id
        )));
    }

    let (json, _) = decode_string(&packet[read..])?;
    let response: StatusResponse = serde_json::from_str(&json)
        .map_err(|e| MinecraftError::Protocol(format!("invalid status json: {}", e)))?;

    Ok(ServerStatus {
        online: response.players.online,
        max: response.players.max,
        version: response.version.name,
        motd: motd(&response.description),
    })
}

pub async fn fetch_status(host: &str, port: u16) -> Result<ServerStatus, MinecraftError> {
    let mut stream = TcpStream::connect((host, port)).await?;

    stream.write_all(&handshake_packet(host, port)).await?;
    stream.write_all(&status_request_packet()).await?;

    let length = read_varint(&mut stream).await?;
    if length <= 0 || length > MAX_RESPONSE_LEN {
        return Err(MinecraftError::Protocol(format!(
            "invalid packet length {}",
            length
        )));
    }

    let mut packet = vec![0u8; length as usize];
    stream.read_exact(&mut packet).await?;

    let status = parse_status_packet(&packet)?;
    debug!("server status {:?}", status);

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn status_packet(json: &str) -> Vec<u8> {
        let mut payload = Vec::new();
        write_varint(&mut payload, STATUS_ID);
        write_string(&mut payload, json);
        frame(&payload)
    }

    async fn spawn_server(response: Vec<u8>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();

            // Handshake then status request
            let length = read_varint(&mut stream).await.unwrap();
            let mut handshake = vec![0u8; length as usize];
            stream.read_exact(&mut handshake).await.unwrap();
            let length = read_varint(&mut stream).await.unwrap();
            let mut request = vec![0u8; length as usize];
            stream.read_exact(&mut request).await.unwrap();
            assert_eq!(request, vec![0x00]);

            stream.write_all(&response).await.unwrap();
        });

        port
    }

    #[test]
    fn test_handshake_packet_layout() {
        let packet = handshake_packet("mc", 25565);

        assert_eq!(
            packet,
            vec![0x08, 0x00, 0x2F, 0x02, b'm', b'c', 0x63, 0xDD, 0x01]
        );
    }

    #[test]
    fn test_motd_from_chat_component() {
        let description: Value =
            serde_json::from_str(r#"{"text": "A ", "extra": [{"text": "server"}]}"#).unwrap();

        assert_eq!(motd(&description), "A server");
        assert_eq!(motd(&Value::String("plain".to_owned())), "plain");
    }

    #[tokio::test]
    async fn test_fetch_status() {
        let json = r#"{"version": {"name": "1.20.4", "protocol": 765}, "players": {"max": 20, "online": 3}, "description": "Chikis"}"#;
        let port = spawn_server(status_packet(json)).await;

        let status = fetch_status("127.0.0.1", port).await.unwrap();

        assert_eq!(
            status,
            ServerStatus {
                online: 3,
                max: 20,
                version: "1.20.4".to_owned(),
                motd: "Chikis".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_status_invalid_json() {
        let port = spawn_server(status_packet("not json")).await;

        let result = fetch_status("127.0.0.1", port).await;

        assert!(matches!(result, Err(MinecraftError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_fetch_status_wrong_packet_id() {
        let mut payload = Vec::new();
        write_varint(&mut payload, 0x01);
        write_string(&mut payload, "{}");
        let port = spawn_server(frame(&payload)).await;

        let result = fetch_status("127.0.0.1", port).await;

        assert!(matches!(result, Err(MinecraftError::Protocol(_))));
    }
}
