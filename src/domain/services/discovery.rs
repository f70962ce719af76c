//! Desired-Service Discovery
//!
//! Maps a container's label set to a DesiredService. A service is only
//! discovered when all three labels are present and the port parses.

use crate::domain::entities::DesiredService;
use std::collections::HashMap;

/// Label carrying the public frontend rule/name.
pub const FRONTEND_LABEL: &str = "registrar.frontend.rule";
/// Label carrying the backend pool name.
pub const BACKEND_LABEL: &str = "registrar.backend";
/// Label carrying the service port.
pub const PORT_LABEL: &str = "registrar.port";

/// Build a DesiredService from a container label map.
///
/// Returns None when any label is missing or empty, or when the port
/// does not parse as a valid port number.
pub fn desired_service_from_labels(labels: &HashMap<String, String>) -> Option<DesiredService> {
    let frontend = labels.get(FRONTEND_LABEL).filter(|v| !v.is_empty())?;
    let backend = labels.get(BACKEND_LABEL).filter(|v| !v.is_empty())?;
    let port = labels.get(PORT_LABEL).filter(|v| !v.is_empty())?;

    let port: u16 = match port.parse() {
        Ok(port) => port,
        Err(err) => {
            tracing::warn!(
                "ignoring service with frontend {}: bad port {:?}: {}",
                frontend,
                port,
                err
            );
            return None;
        }
    };

    Some(DesiredService {
        frontend: frontend.clone(),
        backend: backend.clone(),
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_labels_present() {
        let labels = labels(&[
            (FRONTEND_LABEL, "web"),
            (BACKEND_LABEL, "web-pool"),
            (PORT_LABEL, "8080"),
        ]);

        let service = desired_service_from_labels(&labels).unwrap();
        assert_eq!(service.frontend, "web");
        assert_eq!(service.backend, "web-pool");
        assert_eq!(service.port, 8080);
    }

    #[test]
    fn test_missing_label_yields_none() {
        let labels = labels(&[(FRONTEND_LABEL, "web"), (PORT_LABEL, "8080")]);
        assert!(desired_service_from_labels(&labels).is_none());
    }

    #[test]
    fn test_empty_label_yields_none() {
        let labels = labels(&[
            (FRONTEND_LABEL, "web"),
            (BACKEND_LABEL, ""),
            (PORT_LABEL, "8080"),
        ]);
        assert!(desired_service_from_labels(&labels).is_none());
    }

    #[test]
    fn test_unparsable_port_yields_none() {
        let labels = labels(&[
            (FRONTEND_LABEL, "web"),
            (BACKEND_LABEL, "web-pool"),
            (PORT_LABEL, "eighty"),
        ]);
        assert!(desired_service_from_labels(&labels).is_none());
    }

    #[test]
    fn test_out_of_range_port_yields_none() {
        let labels = labels(&[
            (FRONTEND_LABEL, "web"),
            (BACKEND_LABEL, "web-pool"),
            (PORT_LABEL, "70000"),
        ]);
        assert!(desired_service_from_labels(&labels).is_none());
    }

    #[test]
    fn test_unrelated_labels_ignored() {
        let labels = labels(&[
            (FRONTEND_LABEL, "web"),
            (BACKEND_LABEL, "web-pool"),
            (PORT_LABEL, "8080"),
            ("com.example.other", "value"),
        ]);
        assert!(desired_service_from_labels(&labels).is_some());
    }
}
