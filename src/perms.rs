/// Opaque permission value attached to an entry.
///
/// Built from the symbolic rights column of a listing (`"drwxr-xr-x"` or the
/// bare nine-character `"rwxr-xr-x"`); anything else degrades to no
/// permissions. Consumers only see the two accessors the wire protocol
/// needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permissions {
    code: String,
}

impl Permissions {
    pub fn from_rights(rights: &str) -> Self {
        // Rights come straight from the server; only ASCII codes are
        // meaningful, and the ASCII check keeps the slice below on a char
        // boundary.
        let code = match rights.len() {
            // Leading file-type character from `ls -l` style output.
            10 if rights.is_ascii() => rights[1..].to_string(),
            9 if rights.is_ascii() => rights.to_string(),
            _ => "---------".to_string(),
        };
        Self { code }
    }

    /// Symbolic form, e.g. `rwxr-xr-x`.
    pub fn to_code(&self) -> String {
        self.code.clone()
    }

    /// Octal form, e.g. `755`.
    pub fn to_octal(&self) -> String {
        self.code
            .as_bytes()
            .chunks(3)
            .map(|triad| {
                let mut digit = 0u8;
                if triad[0] != b'-' {
                    digit += 4;
                }
                if triad.len() > 1 && triad[1] != b'-' {
                    digit += 2;
                }
                if triad.len() > 2 && triad[2] != b'-' {
                    digit += 1;
                }
                char::from(b'0' + digit)
            })
            .collect()
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::from_rights("")
    }
}
