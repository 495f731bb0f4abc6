use retrofit_savings::input::Input;
use schemars::schema_for;

#[test]
fn test_generate_json_schema() {
    let schema = schema_for!(Input);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap();

    for bundle in ["building", "interventions", "cost_factors", "selection"] {
        assert!(schema_json.contains(bundle), "schema is missing {bundle}");
    }
}
