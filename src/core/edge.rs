use serde::Serialize;

pub const HTTPS_PORT: u16 = 443;
pub const HTTP_PORT: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostedZoneRef {
    pub zone_id: String,
    pub zone_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CertificateValidation {
    Dns,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub domain_name: String,
    pub validation: CertificateValidation,
    pub validation_zone_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpsListener {
    pub port: u16,
    pub redirect_http: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasRecord {
    /// Fully qualified record name, without the trailing dot.
    pub name: String,
    pub zone_id: String,
    pub zone_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeBinding {
    pub certificate: Certificate,
    pub listener: HttpsListener,
    pub alias_record: AliasRecord,
}

impl EdgeBinding {
    pub fn new(zone: &HostedZoneRef, certificate_domain_name: &str, record_name: &str) -> Self {
        Self {
            certificate: Certificate {
                domain_name: certificate_domain_name.to_string(),
                validation: CertificateValidation::Dns,
                validation_zone_id: zone.zone_id.clone(),
            },
            listener: HttpsListener {
                port: HTTPS_PORT,
                redirect_http: true,
            },
            alias_record: AliasRecord {
                name: qualified_record_name(record_name, &zone.zone_name),
                zone_id: zone.zone_id.clone(),
                zone_name: zone.zone_name.clone(),
            },
        }
    }
}

/// `api` in `example.com` becomes `api.example.com`; names already inside
/// the zone (or empty, meaning the apex) are kept.
pub fn qualified_record_name(record_name: &str, zone_name: &str) -> String {
    let zone = zone_name.trim_end_matches('.');
    let record = record_name.trim_end_matches('.');

    if record.is_empty() {
        return zone.to_string();
    }
    if record == zone || record.ends_with(&format!(".{}", zone)) {
        return record.to_string();
    }
    format!("{}.{}", record, zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_record_name() {
        assert_eq!(qualified_record_name("api", "example.com"), "api.example.com");
        assert_eq!(
            qualified_record_name("api.example.com", "example.com"),
            "api.example.com"
        );
        assert_eq!(
            qualified_record_name("api.example.com.", "example.com."),
            "api.example.com"
        );
        assert_eq!(qualified_record_name("", "example.com"), "example.com");
        // 不是同一個 zone 的後綴
        assert_eq!(
            qualified_record_name("myexample.com", "example.com"),
            "myexample.com.example.com"
        );
    }

    #[test]
    fn test_edge_binding_uses_zone_for_validation_and_record() {
        let zone = HostedZoneRef {
            zone_id: "Z123".to_string(),
            zone_name: "example.com".to_string(),
        };
        let edge = EdgeBinding::new(&zone, "api.example.com", "api");

        assert_eq!(edge.certificate.validation, CertificateValidation::Dns);
        assert_eq!(edge.certificate.validation_zone_id, "Z123");
        assert_eq!(edge.listener.port, 443);
        assert!(edge.listener.redirect_http);
        assert_eq!(edge.alias_record.name, "api.example.com");
        assert_eq!(edge.alias_record.zone_id, "Z123");
    }
}
