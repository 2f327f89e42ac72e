//! Content-based hashing for report IDs.

use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn compute_report_id<T: Serialize>(request: &T, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let request_json = serde_json::to_string(request).unwrap_or_default();
    hasher.update(request_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Hex SHA-256 over `parts`, each prefixed with its length.
pub fn content_digest(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Req {
        variable: &'static str,
        participants: Vec<&'static str>,
    }

    #[test]
    fn hash_stability() {
        let req = Req {
            variable: "SpeciesConc_O3",
            participants: vec!["a", "b"],
        };
        assert_eq!(compute_report_id(&req, "v1"), compute_report_id(&req, "v1"));
        assert_eq!(compute_report_id(&req, "v1").len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = Req {
            variable: "SpeciesConc_O3",
            participants: vec!["a", "b"],
        };
        let b = Req {
            variable: "SpeciesConc_CO",
            participants: vec!["a", "b"],
        };
        assert_ne!(compute_report_id(&a, "v1"), compute_report_id(&b, "v1"));
        assert_ne!(compute_report_id(&a, "v1"), compute_report_id(&a, "v2"));
    }

    #[test]
    fn digest_respects_part_boundaries() {
        assert_eq!(content_digest(&[b"ab", b"c"]), content_digest(&[b"ab", b"c"]));
        assert_ne!(content_digest(&[b"ab", b"c"]), content_digest(&[b"a", b"bc"]));
    }
}
