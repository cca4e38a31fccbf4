pub mod access_code;
pub mod config;
pub mod error;
pub mod gate_session;
pub mod intake;
pub mod invite_token;
pub mod model;
pub mod notify;
pub mod routes;
pub mod schema;
pub mod server;
pub mod store;
pub mod r#trait;
pub mod validate;

///percent-encodes a single URI component, keeping the RFC 3986 unreserved set
pub fn percent_encode_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_encoding_matches_encode_uri_component() {
        assert_eq!(percent_encode_component("IC-1234"), "IC-1234");
        assert_eq!(percent_encode_component("Ava Stone"), "Ava%20Stone");
        assert_eq!(percent_encode_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(percent_encode_component("café"), "caf%C3%A9");
    }
}
