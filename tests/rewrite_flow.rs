//! End-to-end rewrite behavior through compiled rule tables.

use rewrite_gateway::config::{GatewayConfig, HostMapConfig, RuleConfig};
use rewrite_gateway::urltemplate::expander::{expand, expand_to_string};
use rewrite_gateway::urltemplate::params::{BasicParams, ChainedParams};
use rewrite_gateway::urltemplate::parser::{parse_literal, parse_template};
use rewrite_gateway::urltemplate::rewriter::rewrite;
use rewrite_gateway::RuleTable;

fn config(rules: &[(&str, &str, &str)]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    for (name, source, target) in rules {
        config.rules.push(RuleConfig {
            name: name.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        });
    }
    config
}

fn run(table: &RuleTable, url: &str) -> Option<String> {
    let input = parse_literal(url);
    let matched = table.match_inbound(&input)?;
    let rule = matched.value().clone();
    let params = ChainedParams::new(matched.params(), None);
    expand(&rule.target, &params, Some(table.functions()))
        .ok()
        .map(|uri| uri.to_string())
}

#[test]
fn webhdfs_style_rewrite() {
    let table = RuleTable::from_config(&config(&[(
        "webhdfs",
        "/webhdfs/v1/{path=**}?{**}",
        "http://namenode:50070/webhdfs/v1/{path}?{**}",
    )]));

    assert_eq!(
        run(&table, "/webhdfs/v1/tmp/file?op=OPEN&offset=4").as_deref(),
        Some("http://namenode:50070/webhdfs/v1/tmp/file?op=OPEN&offset=4")
    );
}

#[test]
fn deeper_static_rule_wins_over_glob() {
    // Registration order must not matter when one rule is more specific.
    for order in [[0usize, 1], [1, 0]] {
        let rules = [
            ("catchall", "/svc/{rest=**}", "/generic/{rest}"),
            ("status", "/svc/admin/status", "/special"),
        ];
        let picked = [rules[order[0]], rules[order[1]]];
        let table = RuleTable::from_config(&config(&picked));

        assert_eq!(run(&table, "/svc/admin/status").as_deref(), Some("/special"));
        assert_eq!(
            run(&table, "/svc/data/x").as_deref(),
            Some("/generic/data/x")
        );
    }
}

#[test]
fn equally_specific_rules_resolve_to_first_registered() {
    let table = RuleTable::from_config(&config(&[
        ("first", "/svc/{a=*}", "/one/{a}"),
        ("second", "/svc/{b=*}", "/two/{b}"),
    ]));
    assert_eq!(run(&table, "/svc/x").as_deref(), Some("/one/x"));
}

#[test]
fn naked_authority_template_matches_host_port_input() {
    // "{host}:{port}" parses as host and port, not as scheme and path.
    let table = RuleTable::from_config(&config(&[(
        "authority",
        "{host}:{port}",
        "http://{host}:{port}/",
    )]));
    assert_eq!(
        run(&table, "nn.internal:50070").as_deref(),
        Some("http://nn.internal:50070/")
    );
}

#[test]
fn valueless_and_empty_query_values_stay_distinct() {
    let table = RuleTable::from_config(&config(&[(
        "flags",
        "/svc?{**}",
        "http://backend/svc?{**}",
    )]));

    assert_eq!(
        run(&table, "/svc?flag&empty=").as_deref(),
        Some("http://backend/svc?flag&empty=")
    );
}

#[test]
fn hostmap_applies_during_expansion() {
    let mut config = config(&[(
        "mapped",
        "http://{host}:8443/{path=**}",
        "http://{$hostmap_in(host)}:50070/{path}",
    )]);
    config.hostmap.push(HostMapConfig {
        external: "gateway.example.com".to_string(),
        internal: "namenode.internal".to_string(),
    });
    let table = RuleTable::from_config(&config);

    assert_eq!(
        run(&table, "http://gateway.example.com:8443/webhdfs/v1").as_deref(),
        Some("http://namenode.internal:50070/webhdfs/v1")
    );
    // Unmapped hosts pass through unchanged.
    assert_eq!(
        run(&table, "http://other.host:8443/x").as_deref(),
        Some("http://other.host:50070/x")
    );
}

#[test]
fn federated_namenode_selection_is_deterministic() {
    // Several namenode values can arrive for one rewrite; a single-value
    // target position always picks the first one.
    let table = RuleTable::from_config(&config(&[(
        "federated",
        "/webhdfs/v1/{path=**}?namenode={nn=**}",
        "http://{nn}:50070/webhdfs/v1/{path}",
    )]));

    assert_eq!(
        run(
            &table,
            "/webhdfs/v1/tmp?namenode=nn1.internal&namenode=nn2.internal"
        )
        .as_deref(),
        Some("http://nn1.internal:50070/webhdfs/v1/tmp")
    );
}

#[test]
fn literal_round_trip_is_idempotent() {
    let urls = [
        "http://host:8080/a/b/c?x=1&y=2",
        "https://user:pw@host:443/root/file#frag",
        "/relative/path",
        "http://host/dir/",
    ];
    let params = BasicParams::new();
    for url in urls {
        let parsed = parse_literal(url);
        assert_eq!(expand_to_string(&parsed, &params, None), url);
    }
}

#[test]
fn rewriter_shorthand_covers_source_to_target() {
    let source = parse_template("/gateway/{service}/{path=**}?{**}");
    let target = parse_template("http://upstream/{service}/{path}?{**}");

    let out = rewrite(
        "/gateway/hdfs/webhdfs/v1/tmp?op=LISTSTATUS",
        &source,
        &target,
        None,
        None,
    )
    .unwrap();
    assert_eq!(
        out.to_string(),
        "http://upstream/hdfs/webhdfs/v1/tmp?op=LISTSTATUS"
    );
}

#[test]
fn response_direction_uses_its_own_rules() {
    let mut config = GatewayConfig::default();
    config.responses.push(RuleConfig {
        name: "redirect".to_string(),
        source: "http://{host}:50070/{path=**}".to_string(),
        target: "https://gateway:8443/proxy/{path}".to_string(),
    });
    let table = RuleTable::from_config(&config);

    let input = parse_literal("http://dn1:50070/webhdfs/data");
    let matched = table.match_outbound(&input).unwrap();
    assert_eq!(matched.value().name, "redirect");
    // Inbound table is empty, so request-direction matching fails.
    assert!(table.match_inbound(&input).is_none());
}
