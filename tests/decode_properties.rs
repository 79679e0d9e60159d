//! Property tests for decoding and validation
//!
//! Covers the zero-means-unset convention, decode/encode stability and the
//! closed set of accepted upstream kinds.

use asg_sync::config::{self, Config, Upstream, UpstreamKind};
use asg_sync::error::ValidationError;
use proptest::prelude::*;
use std::time::Duration;

fn document(kind_literal: &str, extra: &str) -> String {
    format!(
        "region: us-west-2
upstream_conf_endpoint: http://127.0.0.1:8080/upstream_conf
status_endpoint: http://127.0.0.1:8080/status
sync_interval_in_seconds: 5
upstreams:
  - name: backend1
    autoscaling_group: backend-group
    port: 80
    kind: {kind_literal}
{extra}"
    )
}

#[test]
fn test_explicit_zero_equals_omitted() {
    let explicit = document("http", "    max_conns: 0\n    max_fails: 0\n    slow_start: \"\"\n");
    let omitted = document("http", "");

    let explicit = config::decode(explicit.as_bytes()).unwrap();
    let omitted = config::decode(omitted.as_bytes()).unwrap();
    assert_eq!(explicit, omitted);
    assert_eq!(explicit.upstreams[0].extra_params(), "");
}

#[test]
fn test_accepted_kinds() {
    for (literal, kind) in [("http", UpstreamKind::Http), ("stream", UpstreamKind::Stream)] {
        let config = Config::from_slice(document(literal, "").as_bytes())
            .unwrap_or_else(|e| panic!("kind {literal} should be accepted: {e}"));
        assert_eq!(config.upstreams[0].kind(), Some(kind));
    }
}

fn upstream_strategy() -> impl Strategy<Value = Upstream> {
    (
        "[a-z][a-z0-9-]{0,10}",
        "[a-z][a-z0-9-]{0,10}",
        any::<u16>(),
        prop_oneof![Just(UpstreamKind::Http), Just(UpstreamKind::Stream)],
        prop_oneof![Just(0u32), any::<u32>()],
        "([0-9]{1,3}s)?",
        prop_oneof![Just(0u32), any::<u32>()],
        "([0-9]{1,3}s)?",
    )
        .prop_map(
            |(name, group, port, kind, max_conns, slow_start, max_fails, fail_timeout)| {
                Upstream::new(name, group, port, kind)
                    .with_max_conns(max_conns)
                    .with_slow_start(slow_start)
                    .with_max_fails(max_fails)
                    .with_fail_timeout(fail_timeout)
            },
        )
}

proptest! {
    #[test]
    fn decode_encode_decode_is_stable(
        region in "[a-z]{2}-[a-z]{4,9}-[1-9]",
        interval in any::<u32>(),
        upstreams in prop::collection::vec(upstream_strategy(), 0..4),
    ) {
        let original = Config {
            region,
            upstream_conf_endpoint: "http://127.0.0.1:8080/upstream_conf".to_string(),
            status_endpoint: "http://127.0.0.1:8080/status".to_string(),
            sync_interval: Duration::from_secs(u64::from(interval)),
            upstreams,
        };

        let yaml = serde_yaml::to_string(&original).unwrap();
        let decoded = config::decode(yaml.as_bytes()).unwrap();
        prop_assert_eq!(&decoded, &original);

        let again = config::decode(serde_yaml::to_string(&decoded).unwrap().as_bytes()).unwrap();
        prop_assert_eq!(again, decoded);
    }

    #[test]
    fn kind_rejects_everything_but_exact_literals(
        kind in "[a-zA-Z ]{0,8}".prop_filter("accepted literal", |k| k != "http" && k != "stream"),
    ) {
        let literal = serde_json::to_string(&kind).unwrap();
        let err = Config::from_slice(document(&literal, "").as_bytes()).unwrap_err();
        prop_assert_eq!(
            err.to_string(),
            format!(
                "Invalid config <bytes>: {}",
                ValidationError::InvalidUpstreamKind("backend1".to_string())
            )
        );
    }
}
