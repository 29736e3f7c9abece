use std::borrow::Cow;

use pce_model::Service;

/// Name for well-known IP protocol numbers, the numeral otherwise.
pub fn protocol_name(proto: u16) -> Cow<'static, str> {
    match proto {
        6 => Cow::Borrowed("tcp"),
        17 => Cow::Borrowed("udp"),
        1 => Cow::Borrowed("icmp"),
        other => Cow::Owned(other.to_string()),
    }
}

/// `proto/port`, or an empty string when there is no service or no meaningful port.
pub fn classify_service(service: Option<&Service>) -> String {
    match service {
        Some(Service {
            proto,
            port: Some(port),
        }) if *port != 0 => format!("{}/{}", protocol_name(*proto), port),
        _ => String::new(),
    }
}
