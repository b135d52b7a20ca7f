use crate::db::models::Quote;
use serde::{Deserialize, Serialize};

/// "Re: Quote Request - Mario Service", percent-encoded for a mailto query.
const REPLY_SUBJECT: &str = "Re%3A%20Quote%20Request%20-%20Mario%20Service";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLinks {
    pub mailto: String,
    pub tel: String,
}

impl ContactLinks {
    pub fn for_quote(quote: &Quote) -> Self {
        Self {
            mailto: mailto_link(&quote.email),
            tel: tel_link(&quote.phone),
        }
    }
}

pub fn mailto_link(email: &str) -> String {
    format!("mailto:{}?subject={}", encode_address(email.trim()), REPLY_SUBJECT)
}

/// Percent-encodes everything outside the unreserved set and `@`, so stored
/// addresses cannot add `mailto:` header fields.
fn encode_address(address: &str) -> String {
    let mut out = String::with_capacity(address.len());
    for byte in address.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'@' | b'+' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Whitespace is dropped; digits and a leading `+` are kept.
pub fn tel_link(phone: &str) -> String {
    let number: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{number}")
}
