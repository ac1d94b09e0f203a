use anyhow::{anyhow, Result};
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_PORT: u16 = 21;

/// `host:port` for an address written as `host`, `host:port`, `ip`,
/// `[ipv6]` or `[ipv6]:port`. The FTP control port is used when none is
/// given.
pub fn endpoint(address: &str) -> Result<String> {
    let address = address.trim();
    if address.is_empty() {
        return Err(anyhow!("empty FTP address"));
    }
    if let Ok(socket) = address.parse::<SocketAddr>() {
        return Ok(socket.to_string());
    }
    let bare = address
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(address);
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT).to_string());
    }
    match address.rsplit_once(':') {
        Some((host, port)) => {
            let port: u16 = port
                .parse()
                .map_err(|_| anyhow!("invalid port in address: {address}"))?;
            Ok(format!("{host}:{port}"))
        }
        None => Ok(format!("{address}:{DEFAULT_PORT}")),
    }
}

/// NLST names arrive decoded as lossy UTF-8. A name that lost bytes in
/// that decoding cannot be sent back in RETR or RNFR, so it is refused here.
pub fn check_listed_names(names: Vec<String>) -> Result<Vec<String>> {
    if let Some(name) = names.iter().find(|name| name.contains(char::REPLACEMENT_CHARACTER)) {
        return Err(anyhow!(
            "remote entry '{name}' is not valid UTF-8 and cannot be fetched by name"
        ));
    }
    Ok(names)
}
