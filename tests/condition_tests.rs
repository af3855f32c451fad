mod common;

use common::{TestResult, init_logger, interfaces_data, ntp_data, schema};
use yangcond::{
    ConditionError, ConditionKind, DataNode, EvalConfig, Evaluator, FailReason, InMemoryStore,
    NoStore, SchemaTree, parse, process_condition,
};

const ETH0: &str = "/interfaces/interface/eth0";
const ETH0_MTU: &str = "/interfaces/interface/eth0/mtu";

fn holds(expr: &str, path: &str, data: &DataNode) -> bool {
    let schema = schema();
    process_condition(expr, path, data, schema.root(), &NoStore)
}

#[test]
fn test_arithmetic_follows_precedence() -> TestResult {
    init_logger();
    let schema = SchemaTree::new();
    let data = DataNode::new("/");
    let evaluator = Evaluator::new(schema.root(), &NoStore);
    let value = |expr: &str| {
        parse(expr).and_then(|ast| evaluator.outcome(&ast, "/", &data).value().map(str::to_string))
    };
    assert_eq!(value("1 + 2 * 3").as_deref(), Some("7"));
    assert_eq!(value("(1 + 2) * 3").as_deref(), Some("9"));
    assert_eq!(value("- 1 + 2").as_deref(), Some("1"));
    assert_eq!(value("10 - 2 - 3").as_deref(), Some("5"));
    Ok(())
}

#[test]
fn test_expressions_ending_in_number_literal() -> TestResult {
    init_logger();
    let schema = SchemaTree::new();
    let data = DataNode::new("/");
    let evaluator = Evaluator::new(schema.root(), &NoStore);
    let ast = parse("7").ok_or("number literal did not parse")?;
    assert_eq!(evaluator.outcome(&ast, "/", &data).value(), Some("7"));
    assert!(holds("7", "/", &data));
    assert!(holds("1 = 1", "/", &data));
    assert!(!holds("1 div 0", "/", &data));

    let interfaces = interfaces_data();
    assert!(holds("count(current()/address) = 2", ETH0, &interfaces));
    assert!(!holds("count(current()/address) = 3", ETH0, &interfaces));
    Ok(())
}

#[test]
fn test_deeply_nested_expressions_are_false() {
    init_logger();
    let data = DataNode::new("/");
    let parens = format!("{}1 = 1{}", "(".repeat(100_000), ")".repeat(100_000));
    assert!(!holds(&parens, "/", &data));
    let sum = format!("1{} = 1", " + 0".repeat(100_000));
    assert!(!holds(&sum, "/", &data));
    assert!(holds(&format!("1{} = 1", " + 0".repeat(50)), "/", &data));
}

#[test]
fn test_logical_operators() {
    init_logger();
    let data = DataNode::new("/");
    assert!(holds("1 = 1 and 2 = 2", "/", &data));
    assert!(holds("1 = 2 or 2 = 2", "/", &data));
    assert!(!holds("1 = 2 and 2 = 2", "/", &data));
    assert!(holds("not(1 = 2)", "/", &data));
}

#[test]
fn test_current_child_comparison_without_schema() {
    init_logger();
    let schema = SchemaTree::new();
    let data = DataNode::new("/").with_child(DataNode::new("a").with_child(DataNode::leaf("b", "x")));
    assert!(process_condition("current()/b = 'x'", "/a", &data, schema.root(), &NoStore));
    assert!(!process_condition("current()/b = 'y'", "/a", &data, schema.root(), &NoStore));
    assert!(!process_condition("current()/c = 'x'", "/a", &data, schema.root(), &NoStore));
}

#[test]
fn test_sibling_references() {
    init_logger();
    let data = interfaces_data();
    assert!(holds("../type = 'ianaift:ethernetCsmacd'", ETH0_MTU, &data));
    assert!(holds("../name = 'eth0'", ETH0_MTU, &data));
    assert!(holds("current()/../name != 'eth1'", ETH0_MTU, &data));
    assert!(!holds("../missing = 'eth0'", ETH0_MTU, &data));
}

#[test]
fn test_enumerations_compare_through_value_table() {
    init_logger();
    let data = interfaces_data();
    assert!(holds("../enabled = 'true'", ETH0_MTU, &data));
    assert!(!holds("../enabled = 'false'", ETH0_MTU, &data));
}

#[test]
fn test_absolute_paths_and_predicates() {
    init_logger();
    let data = interfaces_data();
    assert!(holds("/interfaces/interface/eth0/mtu = '1500'", "/interfaces", &data));
    assert!(holds("/interfaces/interface/eth0[name = 'eth0']", "/interfaces", &data));
    assert!(!holds("/interfaces/interface/eth0[name = 'eth1']", "/interfaces", &data));
    assert!(!holds("/interfaces/interface/eth9", "/interfaces", &data));
}

#[test]
fn test_count() {
    init_logger();
    let data = interfaces_data();
    assert!(holds("count(child::address) = 2", ETH0, &data));
    assert!(holds("count(current()/address) < 8", ETH0, &data));
    assert!(holds("count(current()/vlan) = 0", ETH0, &data));
}

#[test]
fn test_derived_from() {
    init_logger();
    let data = interfaces_data();
    let path = "/interfaces/interface/eth0/type";
    assert!(holds("derived-from(current(), 'ianaift:type')", path, &data));
    assert!(!holds("derived-from(current(), 'sys:type')", path, &data));
    assert!(holds("derived-from-or-self(current(), 'sys:type')", path, &data));
    assert!(!holds("derived-from(current())", path, &data));
}

#[test]
fn test_if_feature() {
    init_logger();
    let data = ntp_data("1");
    assert!(holds("if-feature('ntp')", "/system/ntp", &data));
    assert!(holds("if-feature(ntp or radius)", "/system/ntp", &data));
    assert!(!holds("if-feature(ntp and radius)", "/system/ntp", &data));
    assert!(!holds("if-feature('radius')", "/system/radius", &data));
    assert!(!holds("if-feature('ntp')", "/interfaces", &data));
}

#[test]
fn test_current_compares_stored_value() {
    init_logger();
    let data = ntp_data("1");
    assert!(holds("current() = 'core1'", "/system/hostname", &data));
    assert!(!holds("current() = 'core2'", "/system/hostname", &data));
}

#[test]
fn test_store_fallback() -> TestResult {
    init_logger();
    let schema = schema();
    let data = DataNode::new("/");
    let store = InMemoryStore::new();
    store.set("/system/hostname", "core1")?;

    let evaluator = Evaluator::new(schema.root(), &store);
    assert!(evaluator.process_condition("/system/hostname = 'core1'", "/system", &data));
    assert!(evaluator.process_condition("current() = 'core1'", "/system/hostname", &data));

    let evaluator = evaluator.with_config(EvalConfig::from_json(r#"{ "store-fallback": false }"#)?);
    assert!(!evaluator.process_condition("/system/hostname = 'core1'", "/system", &data));
    Ok(())
}

#[test]
fn test_malformed_and_unsupported_expressions_are_false() {
    init_logger();
    let data = interfaces_data();
    for expr in [
        "",
        "1 +",
        "'a' =",
        "1 div 0",
        "1 mod 0",
        "9223372036854775807 + 1",
        "name | type",
        "ancestor::interfaces",
        "$mtu = 1500",
        "frobnicate(1)",
        "true()",
    ] {
        assert!(!holds(expr, ETH0, &data), "'{expr}' should not hold");
    }
}

#[test]
fn test_outcome_keeps_reason() {
    init_logger();
    let schema = schema();
    let data = interfaces_data();
    let evaluator = Evaluator::new(schema.root(), &NoStore);
    let outcome = |expr: &str| parse(expr).map(|ast| evaluator.outcome(&ast, ETH0, &data));

    assert_eq!(
        outcome("1 div 0").and_then(|o| o.reason().cloned()),
        Some(FailReason::DivisionByZero)
    );
    assert_eq!(
        outcome("current()/vlan").and_then(|o| o.reason().cloned()),
        Some(FailReason::PathNotFound(format!("{ETH0}/vlan")))
    );
    assert_eq!(
        outcome("current()/mtu").and_then(|o| o.step_value().map(str::to_string)),
        Some("1500".to_string())
    );
}

#[test]
fn test_apply_conditions_on_valid_trees() -> TestResult {
    init_logger();
    let schema = schema();
    let evaluator = Evaluator::new(schema.root(), &NoStore);
    evaluator.apply_conditions(&interfaces_data())?;
    evaluator.apply_conditions(&ntp_data("1"))?;
    Ok(())
}

#[test]
fn test_apply_conditions_reports_when_violation() {
    init_logger();
    let schema = schema();
    let evaluator = Evaluator::new(schema.root(), &NoStore);
    let err = evaluator.apply_conditions(&ntp_data("0")).unwrap_err();
    let ConditionError::Violated {
        path,
        kind,
        expression,
        reason,
    } = err
    else {
        panic!("expected a violation");
    };
    assert_eq!(path, "/system/ntp/server");
    assert_eq!(kind, ConditionKind::When);
    assert_eq!(expression, "../enabled = 'true'");
    assert_eq!(reason, FailReason::NotSatisfied);
}

#[test]
fn test_apply_conditions_reports_must_violation() {
    init_logger();
    let schema = schema();
    let evaluator = Evaluator::new(schema.root(), &NoStore);
    let mut data = interfaces_data();
    assert!(data.insert(&format!("{ETH0}/type"), "softwareLoopback"));

    let err = evaluator.apply_conditions(&data).unwrap_err();
    assert!(matches!(
        err,
        ConditionError::Violated { kind: ConditionKind::Must, ref path, .. } if path == ETH0_MTU
    ));
    assert_eq!(
        err.to_string(),
        "must condition '../type = 'ianaift:ethernetCsmacd'' failed at \
         '/interfaces/interface/eth0/mtu': condition does not hold"
    );
}

#[test]
fn test_apply_conditions_reports_disabled_feature() {
    init_logger();
    let schema = schema();
    let evaluator = Evaluator::new(schema.root(), &NoStore);
    let data = DataNode::new("/").with_child(
        DataNode::new("system")
            .with_child(DataNode::new("radius").with_child(DataNode::leaf("server", "10.0.0.9"))),
    );
    let err = evaluator.apply_conditions(&data).unwrap_err();
    assert!(matches!(
        err,
        ConditionError::Violated { kind: ConditionKind::IfFeature, ref path, .. } if path == "/system/radius"
    ));
}
