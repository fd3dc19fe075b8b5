//! Binding one association spec of one function into the template

use crate::error::{EdgeAssociationError, EdgeAssociationResult};
use crate::logging::LogSink;
use crate::naming::{NamingResolver, StageProvider};
use crate::template::cloudfront::{
    push_association, DistributionProperties, LambdaFunctionAssociation,
    DISTRIBUTION_RESOURCE_TYPE,
};
use crate::template::lambda::FunctionProperties;
use crate::template::{Export, Output, Template, VersionRef};
use crate::types::{AssociationSpec, BindingSummary, EventType};
use crate::validation::validate_event_type;

/// Where a validated spec will be written.
enum Target {
    /// Append to a cache behavior of this distribution.
    Distribution {
        logical_id: String,
        properties: DistributionProperties,
    },
    /// No distribution named: only stamp exports on the function's outputs.
    Exports,
}

/// Binds one association spec of `function_name` into `template`.
///
/// Every precondition is checked before the template is touched, so an error
/// leaves the template exactly as it was. On success the function loses its
/// environment variables (Lambda@Edge rejects them) and either the selected
/// cache behavior gains one association entry or, when the spec names no
/// distribution, the function's outputs get stage-scoped export names.
pub fn bind_association(
    template: &mut Template,
    function_name: &str,
    spec: &AssociationSpec,
    naming: &dyn NamingResolver,
    stage: &dyn StageProvider,
    log: &mut dyn LogSink,
) -> EdgeAssociationResult<BindingSummary> {
    let event_type = validate_event_type(&spec.event_type)?;

    let function_id = naming.function_logical_id(function_name);
    let mut function_properties: FunctionProperties = template
        .resources
        .get(&function_id)
        .ok_or_else(|| EdgeAssociationError::FunctionResourceNotFound {
            function: function_name.to_string(),
            logical_id: function_id.clone(),
        })?
        .typed_properties(&function_id)?;

    let output_id = naming.version_output_logical_id(function_name);
    let version = template
        .outputs
        .get(&output_id)
        .and_then(Output::version_reference)
        .ok_or_else(|| EdgeAssociationError::VersionOutputNotFound(output_id.clone()))?;

    let target = match &spec.distribution {
        Some(distribution_id) => {
            let properties =
                prepare_distribution(template, distribution_id, spec, &version, event_type)?;
            Target::Distribution {
                logical_id: distribution_id.clone(),
                properties,
            }
        }
        None => {
            if let Some(path_pattern) = &spec.path_pattern {
                log.warn(format!(
                    "WARNING: pathPattern \"{path_pattern}\" on function {function_name} is ignored because no distribution is named"
                ));
            }
            Target::Exports
        }
    };

    // Preconditions hold; mutate from here on.
    let removed = function_properties.strip_environment_variables();
    if removed > 0 {
        log.info(format!(
            "Removing {removed} environment variables from function {function_id} because Lambda@Edge does not support environment variables"
        ));
        if let Some(resource) = template.resources.get_mut(&function_id) {
            resource.set_typed_properties(&function_id, &function_properties)?;
        }
    }

    let distribution = match target {
        Target::Distribution {
            logical_id,
            properties,
        } => {
            if let Some(resource) = template.resources.get_mut(&logical_id) {
                resource.set_typed_properties(&logical_id, &properties)?;
            }
            let on_path = spec
                .path_pattern
                .as_ref()
                .map(|p| format!(" on path pattern \"{p}\""))
                .unwrap_or_default();
            log.info(format!(
                "Added \"{event_type}\" Lambda@Edge association to distribution {logical_id}{on_path} for version: {version}"
            ));
            Some(logical_id)
        }
        Target::Exports => {
            stamp_exports(template, &function_id, &output_id, event_type.as_str(), stage.stage());
            log.info(format!(
                "Added \"{event_type}\" Lambda@Edge association for version: {version}"
            ));
            log.info(format!(
                "Reminder: if you reference this ARN anywhere you need to reference the new value now: {version}"
            ));
            None
        }
    };

    Ok(BindingSummary {
        function: function_name.to_string(),
        function_logical_id: function_id,
        event_type,
        version: version.to_string(),
        path_pattern: distribution.as_ref().and(spec.path_pattern.clone()),
        distribution,
        removed_environment_variables: removed,
    })
}

/// Validates the named distribution and returns its properties with the new
/// association already appended to the selected behavior.
fn prepare_distribution(
    template: &Template,
    distribution_id: &str,
    spec: &AssociationSpec,
    version: &VersionRef,
    event_type: EventType,
) -> EdgeAssociationResult<DistributionProperties> {
    let resource = template
        .resources
        .get(distribution_id)
        .ok_or_else(|| EdgeAssociationError::DistributionNotFound(distribution_id.to_string()))?;

    if resource.resource_type != DISTRIBUTION_RESOURCE_TYPE {
        return Err(EdgeAssociationError::NotADistribution {
            logical_id: distribution_id.to_string(),
            found: resource.resource_type.clone(),
            expected: DISTRIBUTION_RESOURCE_TYPE.to_string(),
        });
    }

    let mut properties: DistributionProperties = resource.typed_properties(distribution_id)?;

    let missing_behavior = || match &spec.path_pattern {
        Some(path_pattern) => EdgeAssociationError::CacheBehaviorNotFound {
            distribution: distribution_id.to_string(),
            path_pattern: path_pattern.clone(),
        },
        None => EdgeAssociationError::MissingDefaultCacheBehavior(distribution_id.to_string()),
    };

    let selector = properties
        .config
        .select_behavior(spec.path_pattern.as_deref())
        .ok_or_else(missing_behavior)?;
    let association =
        serde_json::to_value(LambdaFunctionAssociation::new(event_type, version.to_value()))
            .map_err(|e| EdgeAssociationError::malformed(distribution_id, e))?;
    let behavior = properties
        .config
        .behavior_mut(selector)
        .ok_or_else(missing_behavior)?;
    push_association(behavior, association)
        .map_err(|reason| EdgeAssociationError::malformed(distribution_id, reason))?;

    Ok(properties)
}

/// Export-only binding: publishes the event type and version ARN as
/// stage-scoped stack exports.
fn stamp_exports(
    template: &mut Template,
    function_id: &str,
    output_id: &str,
    event_type: &str,
    stage: &str,
) {
    let mut event_output = Output::new(serde_json::Value::String(event_type.to_string()));
    event_output.description = Some("The event type for this function".to_string());
    event_output.export = Some(Export::named(format!("{function_id}:{stage}-EventType")));
    template
        .outputs
        .insert(format!("{function_id}EventType"), event_output);

    if let Some(version_output) = template.outputs.get_mut(output_id) {
        version_output.export = Some(Export::named(format!("{function_id}:{stage}-ARN")));
    }
}
