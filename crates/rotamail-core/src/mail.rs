use crate::error::Result;
use std::fmt;

/// A fully formed notification, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    /// HTML body, sent as-is.
    pub body: String,
}

impl Message {
    /// The `To` header as it appears on the wire.
    pub fn to_header(&self) -> String {
        self.to.join(",")
    }
}

/// Something that can deliver a [`Message`].
pub trait MailTransport {
    fn send(&self, message: &Message) -> Result<()>;
}

/// Fill `%s` slots in order with `args`. `%%` renders as `%`; slots beyond
/// the supplied arguments are left as written.
pub fn render_subject(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') => {
                chars.next();
                match args.next() {
                    Some(arg) => out.push_str(arg),
                    None => out.push_str("%s"),
                }
            }
            _ => out.push('%'),
        }
    }
    out
}

/// A credential that never shows up in logs or `Debug` output.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_fills_slots_in_order() {
        assert_eq!(
            render_subject("On call: %s and %s", &["alice", "dan"]),
            "On call: alice and dan"
        );
    }

    #[test]
    fn subject_handles_escapes_and_extra_slots() {
        assert_eq!(
            render_subject("100%% %s / %s / %s", &["a", "b"]),
            "100% a / b / %s"
        );
        assert_eq!(render_subject("50% off %d", &["a"]), "50% off %d");
        assert_eq!(render_subject("ends with %", &[]), "ends with %");
    }

    #[test]
    fn to_header_is_comma_joined() {
        let msg = Message {
            from: "rota@example.com".into(),
            to: vec!["a@example.com".into(), "b@example.com".into()],
            cc: vec![],
            subject: String::new(),
            body: String::new(),
        };
        assert_eq!(msg.to_header(), "a@example.com,b@example.com");
    }

    #[test]
    fn secret_debug_is_redacted() {
        let s = Secret::new("hunter2");
        assert_eq!(format!("{s:?}"), "Secret(***)");
        assert_eq!(s.expose(), "hunter2");
    }
}
