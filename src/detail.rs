use crate::symbology::Symbology;

// Format details
//------------------------------------------------------------------------------
// Informational notes attached to results. Never authoritative: a mismatched
// check digit or an unrecognized payload shape does not invalidate a hit.

pub(crate) fn describe(symbology: Symbology, text: &str) -> Option<String> {
    if symbology.has_check_digit() {
        return Some(check_digit_note(text));
    }
    if symbology.is_matrix() {
        return Some(classify_payload(text));
    }
    None
}

// Check digit
//------------------------------------------------------------------------------

/// Recomputes the trailing mod-10 check digit over the leading digits and
/// notes whether it matches the payload's final digit.
fn check_digit_note(data: &str) -> String {
    let digits: Vec<u32> = data.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != data.len() || digits.len() < 8 {
        return format!("GTIN: {data} (not a numeric GTIN)");
    }

    let sum: u32 = digits[..digits.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    let check = (10 - sum % 10) % 10;

    let verdict = if check == digits[digits.len() - 1] { "valid" } else { "mismatch" };
    format!("GTIN: {data}, check digit {check} ({verdict})")
}

// Payload classification
//------------------------------------------------------------------------------

/// Lightweight content classification for matrix payloads: URL, contact card,
/// network credential, commerce application identifiers, or plain text.
fn classify_payload(data: &str) -> String {
    if data.starts_with("http://") || data.starts_with("https://") {
        return format!("URL: {data}");
    }

    if data.contains("BEGIN:VCARD") {
        let mut note = String::from("Contact card");
        for line in data.lines() {
            if let Some(name) = line.strip_prefix("FN:") {
                note.push_str(&format!(", name {name}"));
            } else if let Some(tel) = line.strip_prefix("TEL:") {
                note.push_str(&format!(", phone {tel}"));
            } else if let Some(mail) = line.strip_prefix("EMAIL:") {
                note.push_str(&format!(", email {mail}"));
            }
        }
        return note;
    }

    if let Some(fields) = data.strip_prefix("WIFI:") {
        let mut note = String::from("Network credential");
        for field in fields.split(';') {
            if let Some(ssid) = field.strip_prefix("S:") {
                note.push_str(&format!(", ssid {ssid}"));
            } else if let Some(sec) = field.strip_prefix("T:") {
                note.push_str(&format!(", security {sec}"));
            }
        }
        return note;
    }

    if data.starts_with("(01)") || data.starts_with("(10)") || data.starts_with("(21)") {
        let ais: Vec<&str> = data
            .split('(')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.split(')').next())
            .collect();
        return format!("GS1 application identifiers: {}", ais.join(", "));
    }

    format!("Text: {data}")
}
