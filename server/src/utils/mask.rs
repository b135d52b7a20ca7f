/// Masks personal data for log lines, keeping the first and last two
/// characters. Values of four characters or fewer are fully masked.
pub fn mask_sensitive(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();
    if len <= 4 {
        return "*".repeat(len);
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[len - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(len - 4), tail)
}

/// Masks the local part of an address and keeps the domain readable.
pub fn mask_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", mask_sensitive(local), domain),
        None => mask_sensitive(email),
    }
}
