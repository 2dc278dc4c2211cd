use refindex::ConfError;
use refindex::litepath;
use refindex::pattern::PathPattern;
use refindex::shortcut::{self, Shortcut};

const DEVICE_NAME: &str = "/dicomConfigurationRoot/dicomDevicesRoot/*[_.uuid='d-1']/dicomDeviceName";
const DEVICE_UUID: &str = "/dicomConfigurationRoot/dicomDevicesRoot/*[.//_.uuid='ae-1']/_.uuid";
const DEVICE_BY_AE: &str = "/dicomConfigurationRoot/dicomDevicesRoot/*[dicomNetworkAE/*[_.uuid='ae-1']]/dicomDeviceName";

#[test]
fn each_template_recognizes_its_query() {
    let cases = [
        (DEVICE_UUID, Shortcut::DeviceUuidByAnyUuid, "UUID", "ae-1"),
        (DEVICE_NAME, Shortcut::DeviceNameByUuid, "deviceUUID", "d-1"),
        (DEVICE_BY_AE, Shortcut::DeviceNameByAeUuid, "aeUUID", "ae-1"),
    ];
    for (query, expected, param, uuid) in cases {
        let (template, bindings) = shortcut::match_str(query).expect("valid").expect("recognized");
        assert_eq!(template.shortcut(), expected, "{query}");
        assert_eq!(template.param(), param);
        assert_eq!(bindings.get(param).map(String::as_str), Some(uuid));
    }
}

#[test]
fn at_most_one_template_matches() {
    let queries = [DEVICE_NAME, DEVICE_UUID, DEVICE_BY_AE, "/dicomConfigurationRoot/dicomDevicesRoot/*"];
    for query in queries {
        let parsed = litepath::parse(query).expect("valid");
        let hits = shortcut::templates().iter().filter(|t| t.pattern().matches(&parsed).is_some()).count();
        assert!(hits <= 1, "{query} matched {hits} templates");
    }
}

#[test]
fn templates_are_tried_in_priority_order() {
    let order: Vec<_> = shortcut::templates().iter().map(|t| t.shortcut()).collect();
    assert_eq!(order, vec![Shortcut::DeviceUuidByAnyUuid, Shortcut::DeviceNameByUuid, Shortcut::DeviceNameByAeUuid]);
    for shortcut in order {
        assert_eq!(shortcut.template().shortcut(), shortcut);
    }
}

#[test]
fn matching_ignores_quoting_and_whitespace() {
    let query = "/dicomConfigurationRoot / dicomDevicesRoot / *[ _.uuid = \"d-1\" ] / dicomDeviceName";
    let (template, bindings) = shortcut::match_str(query).expect("valid").expect("recognized");
    assert_eq!(template.shortcut(), Shortcut::DeviceNameByUuid);
    assert_eq!(bindings["deviceUUID"], "d-1");
}

#[test]
fn near_misses_do_not_match() {
    let misses = [
        "/dicomConfigurationRoot/dicomDevicesRoot/*[_.uuid='d-1']/dicomDeviceName/extra",
        "/dicomConfigurationRoot/dicomDevicesRoot/*[_.uuid='d-1']/dicomDescription",
        "/dicomConfigurationRoot/otherRoot/*[_.uuid='d-1']/dicomDeviceName",
        "/dicomConfigurationRoot/dicomDevicesRoot/*[_.uuid='d-1'][1]/dicomDeviceName",
        "/dicomConfigurationRoot/dicomDevicesRoot/dev1[_.uuid='d-1']/dicomDeviceName",
        "dicomConfigurationRoot/dicomDevicesRoot/*[_.uuid='d-1']/dicomDeviceName",
        "/dicomConfigurationRoot/dicomDevicesRoot/*[_.uuid='d-1' and dicomInstalled]/dicomDeviceName",
        "/dicomConfigurationRoot/dicomDevicesRoot/*[dicomNetworkAE/*[_.uuid='ae-1']]/_.uuid",
    ];
    for query in misses {
        match shortcut::match_str(query) {
            Ok(None) | Err(ConfError::IllegalQuery { .. }) => {}
            Ok(Some((t, _))) => panic!("{query} unexpectedly matched {}", t.shortcut()),
            Err(e) => panic!("{query}: {e}"),
        }
    }
}

#[test]
fn malformed_query_is_an_error_not_a_miss() {
    assert!(matches!(shortcut::match_str("/dicomConfigurationRoot/["), Err(ConfError::IllegalQuery { .. })));
}

#[test]
fn fill_produces_matching_queries() {
    for shortcut in [Shortcut::DeviceUuidByAnyUuid, Shortcut::DeviceNameByUuid, Shortcut::DeviceNameByAeUuid] {
        let uuid = "it's {odd} & quoted";
        let query = shortcut.query(uuid).expect("filled");
        let (template, bindings) = shortcut::match_str(&query).expect("valid").expect("recognized");
        assert_eq!(template.shortcut(), shortcut);
        assert_eq!(bindings[template.param()], uuid);
    }
    assert_eq!(
        Shortcut::DeviceNameByUuid.query("d-1").expect("filled"),
        "/dicomConfigurationRoot/dicomDevicesRoot/*[_.uuid='d-1']/dicomDeviceName"
    );
}

#[test]
fn pattern_with_repeated_slot_requires_equal_values() {
    let pattern = PathPattern::compile("/a/*[x='{id}' or y='{id}']/b").expect("template");
    assert_eq!(pattern.params(), &["id".to_string()]);
    assert!(pattern.parse_if_matches("/a/*[x='1' or y='1']/b").expect("valid").is_some());
    assert!(pattern.parse_if_matches("/a/*[x='1' or y='2']/b").expect("valid").is_none());
}

#[test]
fn fill_reports_unbound_parameters() {
    let pattern = PathPattern::compile("/a/*[x='{first}' and y='{second}']").expect("template");
    match pattern.fill(&[("first", "1")]) {
        Err(ConfError::UnboundParameter(name)) => assert_eq!(name, "second"),
        other => panic!("expected UnboundParameter, got {other:?}"),
    }
    assert_eq!(pattern.fill(&[("first", "1"), ("second", "2")]).expect("filled"), "/a/*[x='1' and y='2']");
}
