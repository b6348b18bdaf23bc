mod common;

use std::sync::Arc;

use common::{GraphOp, NodeKind, RecordingHost};
use widewave::{BiquadKind, EngineConfig, Link, RoutingState, SignalRouter};

/// Test live reconfiguration of the shared post-summation chain
#[cfg(test)]
mod router_tests {
    use super::*;

    fn routing(high_pass_enabled: bool, equalizer_enabled: bool) -> RoutingState {
        RoutingState {
            enabled_globally: true,
            high_pass_enabled,
            equalizer_enabled,
        }
    }

    fn build_router(config: &EngineConfig) -> (Arc<RecordingHost>, SignalRouter) {
        let host = Arc::new(RecordingHost::new(48000));
        let router = SignalRouter::build(host.clone(), config).expect("router construction");
        (host, router)
    }

    fn high_pass_node_count(host: &RecordingHost) -> usize {
        host.count_nodes(|kind| {
            matches!(kind, NodeKind::Biquad(params)
                if params.kind == BiquadKind::Highpass && params.frequency_hz == 200.0)
        })
    }

    #[test]
    fn test_default_state_routes_sum_through_eq_to_limiter() {
        let (host, router) = build_router(&EngineConfig::default());

        let links = router.applied_links();
        assert_eq!(links.len(), 3);
        assert_eq!(
            links[0],
            Link {
                from: router.summing_node(),
                to: router.equalizer().input()
            }
        );
        assert_eq!(
            links[1],
            Link {
                from: router.equalizer().output(),
                to: router.limiter().input()
            }
        );
        assert_eq!(
            links[2],
            Link {
                from: router.limiter().output(),
                to: host.destination_node()
            }
        );
    }

    #[test]
    fn test_both_optional_stages_disabled_goes_straight_to_limiter() {
        let (host, mut router) = build_router(&EngineConfig::default());
        router.apply(routing(false, false)).unwrap();

        let links = router.applied_links();
        assert_eq!(links.len(), 2);
        assert!(host.has_link(router.summing_node(), router.limiter().input()));
        assert!(!host.has_link(router.summing_node(), router.equalizer().input()));
    }

    #[test]
    fn test_all_four_toggle_states() {
        let (host, mut router) = build_router(&EngineConfig::default());

        for &(hp, eq) in &[(false, false), (true, false), (false, true), (true, true)] {
            router.apply(routing(hp, eq)).unwrap();
            let expected_len = 2 + usize::from(hp) + usize::from(eq);
            assert_eq!(router.applied_links().len(), expected_len);

            // The chain always terminates limiter -> destination
            assert!(host.has_link(router.limiter().output(), host.destination_node()));

            let hp_node = router.high_pass_node();
            if hp {
                assert!(host.has_link(router.summing_node(), hp_node.unwrap()));
            } else if let Some(hp_node) = hp_node {
                assert!(host.outputs_of(hp_node).is_empty(), "bypassed stage stays unlinked");
            }
        }
    }

    #[test]
    fn test_reapplying_same_state_is_idempotent() {
        let (host, mut router) = build_router(&EngineConfig::default());
        let state = routing(true, true);
        router.apply(state).unwrap();

        let links_before = host.link_count();
        let applied_before = router.applied_links().to_vec();
        host.clear_ops();

        router.apply(state).unwrap();

        assert_eq!(host.link_count(), links_before);
        assert_eq!(router.applied_links(), applied_before.as_slice());
        assert!(host.ops().is_empty(), "second application must emit no operations");
    }

    #[test]
    fn test_toggle_emits_minimal_diff() {
        let (host, mut router) = build_router(&EngineConfig::default());
        host.clear_ops();

        // eq-on -> eq-on + hp-on: one disconnect, two connects
        router.apply(routing(true, true)).unwrap();
        let ops = host.ops();
        assert_eq!(ops.len(), 3);

        let terminal = GraphOp::Disconnect(router.limiter().output(), host.destination_node());
        assert!(
            !ops.contains(&terminal),
            "untouched links must not be torn down"
        );
    }

    #[test]
    fn test_high_pass_created_lazily_and_reused() {
        let (host, mut router) = build_router(&EngineConfig::default());
        assert_eq!(high_pass_node_count(&host), 0);
        assert!(router.high_pass_node().is_none());

        router.apply(routing(true, true)).unwrap();
        assert_eq!(high_pass_node_count(&host), 1);
        let first = router.high_pass_node().unwrap();

        router.apply(routing(false, true)).unwrap();
        assert_eq!(high_pass_node_count(&host), 1, "bypassed, never destroyed");

        router.apply(routing(true, true)).unwrap();
        assert_eq!(high_pass_node_count(&host), 1);
        assert_eq!(router.high_pass_node().unwrap(), first);
    }

    #[test]
    fn test_initial_config_with_high_pass_enabled() {
        let config = EngineConfig {
            hp_enabled: true,
            ..EngineConfig::default()
        };
        let (host, router) = build_router(&config);
        assert_eq!(high_pass_node_count(&host), 1);
        assert_eq!(router.applied_links().len(), 4);
    }
}
