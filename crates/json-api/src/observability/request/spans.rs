//! Route labels for spans and metrics.

use uuid::Uuid;

/// Request path with identifier segments collapsed, so labels stay low-cardinality.
pub(super) fn route_template(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut template = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            template.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            template.push_str("{uuid}");
        } else {
            template.push_str(segment);
        }
    }

    template
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_uuid_segments() {
        let path = format!("/orders/{}/history", Uuid::now_v7());

        assert_eq!(route_template(&path), "/orders/{uuid}/history");
    }

    #[test]
    fn keeps_static_segments() {
        assert_eq!(route_template("/"), "/");
        assert_eq!(route_template("/coupons/validate"), "/coupons/validate");
        assert_eq!(route_template("/payments/callback"), "/payments/callback");
    }
}
