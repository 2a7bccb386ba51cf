//! Provider text normalization.

/// Normalizes free text coming from the provider.
///
/// Broadcast titles, synopses and person names arrive HTML-entity escaped
/// and occasionally carry embedded newlines, both literal and as the
/// two-character `\n` escape. Entities and markup are decoded, newlines
/// removed, surrounding whitespace trimmed.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let decoded = nanohtml2text::html2text(raw);
    decoded
        .replace("\\n", "")
        .replace(['\n', '\r'], "")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_named_entities() {
        // Arrange & Act & Assert
        assert_eq!(sanitize("Stra&szlig;e"), "Straße");
        assert_eq!(sanitize("M&uuml;nchen"), "München");
        assert_eq!(sanitize("&quot;Tatort&quot;"), "\"Tatort\"");
    }

    #[test]
    fn test_decodes_numeric_entities() {
        // Arrange & Act & Assert
        assert_eq!(sanitize("it&#39;s"), "it's");
    }

    #[test]
    fn test_strips_whitespace_and_newlines() {
        // Arrange & Act & Assert
        assert_eq!(sanitize(" text\n "), "text");
        assert_eq!(sanitize("first\\nsecond"), "firstsecond");
        assert_eq!(sanitize("a\r\nb"), "ab");
    }

    #[test]
    fn test_empty_input_stays_empty() {
        // Arrange & Act & Assert
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("   "), "");
    }
}
