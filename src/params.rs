//! Per-upstream tuning parameters for upstream configuration requests
//!
//! The sync driver appends the fragment built here to the URL it sends to
//! `upstream_conf_endpoint` when adding servers to an upstream.

use crate::config::Upstream;
use std::fmt::Display;

/// Build the query-string fragment for the tuning fields that are set
///
/// Fields are emitted in a fixed order: `max_conns`, `slow_start`,
/// `max_fails`, `fail_timeout`. Each one is prefixed with `&`; unset fields
/// (zero or empty) are skipped and an upstream with none set yields `""`.
/// Values are written as-is without URL encoding.
///
/// # Examples
///
/// ```
/// use asg_sync::config::{Upstream, UpstreamKind};
/// use asg_sync::params::encode_extra_params;
///
/// let upstream = Upstream::new("backend1", "backend-group", 80, UpstreamKind::Http)
///     .with_max_conns(3)
///     .with_fail_timeout("10s");
/// assert_eq!(encode_extra_params(&upstream), "&max_conns=3&fail_timeout=10s");
/// ```
pub fn encode_extra_params(upstream: &Upstream) -> String {
    let mut params = String::new();

    if upstream.max_conns() != 0 {
        push_param(&mut params, "max_conns", upstream.max_conns());
    }
    if !upstream.slow_start().is_empty() {
        push_param(&mut params, "slow_start", upstream.slow_start());
    }
    if upstream.max_fails() != 0 {
        push_param(&mut params, "max_fails", upstream.max_fails());
    }
    if !upstream.fail_timeout().is_empty() {
        push_param(&mut params, "fail_timeout", upstream.fail_timeout());
    }

    params
}

fn push_param(params: &mut String, name: &str, value: impl Display) {
    params.push_str(&format!("&{name}={value}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamKind;

    fn upstream() -> Upstream {
        Upstream::new("backend1", "backend-group", 80, UpstreamKind::Http)
    }

    #[test]
    fn test_no_params_is_empty() {
        assert_eq!(encode_extra_params(&upstream()), "");
    }

    #[test]
    fn test_max_conns_only() {
        assert_eq!(
            encode_extra_params(&upstream().with_max_conns(3)),
            "&max_conns=3"
        );
    }

    #[test]
    fn test_skips_unset_fields_between_set_ones() {
        let ups = upstream().with_max_conns(3).with_fail_timeout("10s");
        assert_eq!(encode_extra_params(&ups), "&max_conns=3&fail_timeout=10s");
    }

    #[test]
    fn test_all_params_in_fixed_order() {
        // Builder order differs from output order on purpose
        let ups = upstream()
            .with_fail_timeout("10s")
            .with_max_fails(2)
            .with_slow_start("30s")
            .with_max_conns(3);
        assert_eq!(
            encode_extra_params(&ups),
            "&max_conns=3&slow_start=30s&max_fails=2&fail_timeout=10s"
        );
    }

    #[test]
    fn test_zero_values_are_unset() {
        let ups = upstream()
            .with_max_conns(0)
            .with_max_fails(0)
            .with_slow_start("");
        assert_eq!(encode_extra_params(&ups), "");
    }

    #[test]
    fn test_values_are_not_url_encoded() {
        let ups = upstream().with_slow_start("1m 30s");
        assert_eq!(ups.extra_params(), "&slow_start=1m 30s");
    }
}
