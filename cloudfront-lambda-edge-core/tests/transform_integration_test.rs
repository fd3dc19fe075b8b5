use cloudfront_lambda_edge_core::{
    Diagnostic, EdgeAssociationError, FunctionDefinitions, ServerlessNaming, Severity, Template,
    TemplateTransformer, EDGE_LOG_ACTIONS,
};
use serde_json::{json, Value};

const COMPILED_TEMPLATE: &str = include_str!("fixtures/compiled-template.json");

fn load_template() -> Template {
    Template::from_json(COMPILED_TEMPLATE).expect("fixture template should parse")
}

fn functions(raw: Value) -> FunctionDefinitions {
    serde_json::from_value(raw).expect("function definitions should parse")
}

fn resource(template: &Template, logical_id: &str) -> Value {
    serde_json::to_value(&template.resources[logical_id]).expect("resource should serialize")
}

fn run(
    template: &mut Template,
    functions: &FunctionDefinitions,
    log: &mut Vec<Diagnostic>,
) -> Result<cloudfront_lambda_edge_core::TransformReport, EdgeAssociationError> {
    let naming = ServerlessNaming;
    let stage = "dev";
    TemplateTransformer::new(&naming, &stage).transform(template, functions, log)
}

#[test]
fn test_full_transformation_of_compiled_template() {
    let mut template = load_template();
    let functions = functions(json!({
        "rewrite": {
            "handler": "src/rewrite.handler",
            "lambdaAtEdge": {"eventType": "origin-request", "distribution": "WebsiteDistribution"}
        },
        "headers": {
            "handler": "src/headers.handler",
            "lambdaAtEdge": [
                {"eventType": "viewer-response", "distribution": "WebsiteDistribution", "pathPattern": "/docs/*"},
                {"eventType": "origin-response", "distribution": "WebsiteDistribution"}
            ]
        }
    }));
    let mut log = Vec::new();

    let report = run(&mut template, &functions, &mut log).expect("transformation should succeed");

    assert!(report.role_found);
    assert_eq!(report.trust_statements_updated, 1);
    assert_eq!(report.bindings.len(), 3);
    assert_eq!(report.bindings[0].removed_environment_variables, 1);
    assert_eq!(report.warnings().count(), 0);

    let role = resource(&template, "IamRoleLambdaExecution");
    assert_eq!(
        role["Properties"]["AssumeRolePolicyDocument"]["Statement"][0]["Principal"]["Service"],
        json!(["lambda.amazonaws.com", "edgelambda.amazonaws.com"])
    );
    let statements = role["Properties"]["Policies"][0]["PolicyDocument"]["Statement"]
        .as_array()
        .expect("statement list");
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[2]["Action"], json!(EDGE_LOG_ACTIONS));

    let rewrite = resource(&template, "RewriteLambdaFunction");
    assert!(rewrite["Properties"].get("Environment").is_none());
    assert_eq!(rewrite["DependsOn"], json!(["RewriteLogGroup"]));

    let config = &resource(&template, "WebsiteDistribution")["Properties"]["DistributionConfig"];
    assert_eq!(
        config["DefaultCacheBehavior"]["LambdaFunctionAssociations"],
        json!([
            {"EventType": "origin-request", "LambdaFunctionARN": {"Ref": "RewriteLambdaVersionQzWd3Jx9Ok2Y"}},
            {"EventType": "origin-response", "LambdaFunctionARN": {"Ref": "HeadersLambdaVersionM9v0CC2pYw"}}
        ])
    );
    assert_eq!(
        config["CacheBehaviors"][0]["LambdaFunctionAssociations"],
        json!([
            {"EventType": "origin-request", "LambdaFunctionARN": "arn:aws:lambda:us-east-1:123456789012:function:legacy-docs:7"},
            {"EventType": "viewer-response", "LambdaFunctionARN": {"Ref": "HeadersLambdaVersionM9v0CC2pYw"}}
        ])
    );
    assert_eq!(config["DefaultRootObject"], json!("index.html"));
}

#[test]
fn test_untouched_parts_survive_round_trip() {
    let mut template = load_template();
    let original: Value = serde_json::from_str(COMPILED_TEMPLATE).expect("fixture is json");
    let mut log = Vec::new();

    run(&mut template, &FunctionDefinitions::new(), &mut log).expect("role update only");

    let transformed = serde_json::to_value(&template).expect("template should serialize");
    assert_eq!(transformed["Outputs"], original["Outputs"]);
    assert_eq!(
        transformed["Resources"]["WebsiteDistribution"],
        original["Resources"]["WebsiteDistribution"]
    );
    assert_eq!(
        transformed["Resources"]["RewriteLambdaFunction"],
        original["Resources"]["RewriteLambdaFunction"]
    );
    assert_eq!(transformed["Description"], original["Description"]);

    let keys: Vec<&String> = template.resources.keys().collect();
    assert_eq!(keys.first().map(|k| k.as_str()), Some("ServerlessDeploymentBucket"));
    assert_eq!(keys.last().map(|k| k.as_str()), Some("WebsiteDistribution"));
}

#[test]
fn test_missing_path_pattern_aborts_without_touching_behaviors() {
    let mut template = load_template();
    let before = serde_json::to_value(&template.resources["WebsiteDistribution"]).expect("json");
    let functions = functions(json!({
        "headers": {
            "lambdaAtEdge": {"eventType": "viewer-request", "distribution": "WebsiteDistribution", "pathPattern": "/missing/*"}
        }
    }));
    let mut log = Vec::new();

    let err = run(&mut template, &functions, &mut log).expect_err("unknown path pattern");
    assert_eq!(
        err.to_string(),
        "Distribution 'WebsiteDistribution' has no cache behavior with path pattern '/missing/*'"
    );
    assert_eq!(resource(&template, "WebsiteDistribution"), before);
    // The role update ran before the failing bind and is not rolled back.
    assert!(log
        .iter()
        .any(|d| d.severity == Severity::Info && d.message.contains("assume role policy")));
}

#[test]
fn test_export_only_mode_uses_stage_in_export_names() {
    let mut template = load_template();
    let functions = functions(json!({
        "rewrite": {"lambdaAtEdge": {"eventType": "viewer-request"}}
    }));
    let naming = ServerlessNaming;
    let stage = String::from("prod");
    let mut log: Vec<Diagnostic> = Vec::new();

    TemplateTransformer::new(&naming, &stage)
        .transform(&mut template, &functions, &mut log)
        .expect("export-only binding should succeed");

    let outputs = serde_json::to_value(&template.outputs).expect("json");
    assert_eq!(
        outputs["RewriteLambdaFunctionQualifiedArn"]["Export"]["Name"],
        json!("RewriteLambdaFunction:prod-ARN")
    );
    assert_eq!(
        outputs["RewriteLambdaFunctionEventType"]["Export"]["Name"],
        json!("RewriteLambdaFunction:prod-EventType")
    );
    assert!(resource(&template, "WebsiteDistribution")["Properties"]["DistributionConfig"]
        ["DefaultCacheBehavior"]
        .get("LambdaFunctionAssociations")
        .is_none());
}
